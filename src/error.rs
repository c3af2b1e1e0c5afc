use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::types::ErrorBody;


#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("No prompt provided")]
    MissingPrompt,

    #[error("Invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    #[error("{0}")]
    Backend(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    BackendStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid backend chunk: {0}")]
    ChunkDecode(#[from] serde_json::Error),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingPrompt | RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Backend(_)
            | RelayError::BackendStatus { .. }
            | RelayError::ChunkDecode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = if status.is_client_error() {
            self.to_string()
        } else {
            tracing::error!(error = %self, "chat request failed");
            format!("Server error: {}", self)
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
