use std::pin::Pin;
use std::time::Duration;

use async_stream::stream;
use futures::{Stream, StreamExt};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::types::{GenerationChunk, GenerationRequest};


pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<GenerationChunk, RelayError>> + Send>>;


/// Client for the inference server's streaming generate endpoint.
#[derive(Clone)]
pub struct GenerateClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GenerateClient {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: config.backend_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the request and waits for the response headers. Connection
    /// failures and non-2xx replies surface here, before any chunk is read.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<ChunkStream, RelayError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RelayError::BackendStatus { status, body });
        }

        Ok(chunk_stream(response))
    }
}


// one decoded chunk per NDJSON line; the first error ends the stream
fn chunk_stream(response: reqwest::Response) -> ChunkStream {
    Box::pin(stream! {
        let mut bytes = response.bytes_stream();
        let mut buffer = LineBuffer::default();

        loop {
            let (lines, finished) = match bytes.next().await {
                Some(Ok(chunk)) => (buffer.push(&chunk), false),
                Some(Err(err)) => {
                    yield Err(RelayError::from(err));
                    return;
                }
                None => (buffer.finish(), true),
            };

            for line in lines {
                let decoded = decode_chunk(&line);
                let failed = decoded.is_err();
                yield decoded;
                if failed {
                    return;
                }
            }

            if finished {
                return;
            }
        }
    })
}

// invalid UTF-8 inside the line is a decode error, not replaced
fn decode_chunk(line: &[u8]) -> Result<GenerationChunk, RelayError> {
    Ok(serde_json::from_slice(line)?)
}


/// Reassembles raw lines from arbitrarily split body chunks. Blank lines are
/// dropped and a trailing `\r` is stripped. Bytes are left undecoded.
#[derive(Default)]
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(chunk);
        self.drain_lines(false)
    }

    /// Flushes a final line that had no terminating newline.
    pub fn finish(&mut self) -> Vec<Vec<u8>> {
        self.drain_lines(true)
    }

    fn drain_lines(&mut self, flush: bool) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        let mut start = 0;

        while let Some(offset) = self.buffer[start..].iter().position(|b| *b == b'\n') {
            let newline = start + offset;
            push_line(&mut lines, &self.buffer[start..newline]);
            start = newline + 1;
        }

        if flush {
            push_line(&mut lines, &self.buffer[start..]);
            self.buffer.clear();
        } else if start > 0 {
            self.buffer.drain(..start);
        }

        lines
    }
}

fn push_line(lines: &mut Vec<Vec<u8>>, raw: &[u8]) {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if !raw.iter().all(u8::is_ascii_whitespace) {
        lines.push(raw.to_vec());
    }
}
