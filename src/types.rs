use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;


/// Inbound body of `POST /api/chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<Message>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}


// Ollama generate API request
#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

// one NDJSON line of the generate response
#[derive(Debug, Default, Deserialize)]
pub struct GenerationChunk {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}


#[derive(Debug, Serialize)]
pub struct OutboundEvent {
    pub text: String,
}

impl OutboundEvent {
    /// Encodes the SSE payload as `{"text": "..."}`, with a space after each
    /// separator. Non-ASCII text is written as raw UTF-8 on purpose, not as
    /// `\uXXXX` escapes; both decode to the same JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = Vec::with_capacity(self.text.len() + 12);
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// Compact JSON, except `", "` between items and `": "` after keys.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}


#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}


#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub is_healthy: bool,
    pub status: String,
}
