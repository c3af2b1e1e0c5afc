use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
    routing::{get, post},
    Json, Router,
};
use futures::Stream;
use tokio_stream::StreamExt;

use crate::AppState;
use crate::backend::ChunkStream;
use crate::error::RelayError;
use crate::prompt::flatten_prompt;
use crate::types::{ChatRequest, GenerationRequest, HealthResponse, OutboundEvent};


pub async fn healthy(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        is_healthy: true,
        status: "OK".to_string(),
    })
}


/// `POST /api/chat`: flattens the conversation, opens a streaming generate
/// call and relays every text fragment as one SSE frame.
///
/// Everything up to the backend's response headers is checked before the
/// first byte goes out, so a failure there is a plain JSON error. Once
/// streaming has started, errors only end the stream.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, RelayError> {
    let Json(req) = payload?;

    let prompt = match req.prompt.as_deref() {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => return Err(RelayError::MissingPrompt),
    };
    let history = req.history.unwrap_or_default();
    let model = req
        .model
        .unwrap_or_else(|| state.config.default_model.clone());

    tracing::info!(%model, history_len = history.len(), "relaying chat request");

    let generation = GenerationRequest {
        model,
        prompt: flatten_prompt(&history, prompt),
        stream: true,
    };
    let chunks = state.backend.generate(&generation).await?;

    let sse = Sse::new(relay_events(chunks));
    let response = match state.config.keep_alive_secs {
        Some(secs) => sse
            .keep_alive(
                KeepAlive::new()
                    .interval(Duration::from_secs(secs))
                    .text("keep-alive"),
            )
            .into_response(),
        None => sse.into_response(),
    };

    Ok(response)
}


// backend chunk -> at most one SSE frame, in arrival order
fn relay_events(mut chunks: ChunkStream) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let mut frames = 0usize;

        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    tracing::warn!(error = %err, frames, "backend stream failed, closing relay stream");
                    return;
                }
            };

            if let Some(error) = &chunk.error {
                tracing::warn!(%error, "backend reported an error");
            }
            if chunk.done {
                tracing::debug!(frames, "backend finished generating");
            }

            let Some(text) = chunk.response else {
                continue;
            };

            match (OutboundEvent { text }).to_json() {
                Ok(json) => {
                    frames += 1;
                    yield Ok(Event::default().data(json));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to encode event, closing relay stream");
                    return;
                }
            }
        }

        tracing::debug!(frames, "relay stream complete");
    }
}


pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/health", get(healthy))
}
