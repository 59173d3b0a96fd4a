use crate::dbs::DbError;
use crate::generation::GenerationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::models::{ErrorBody, ErrorKind};
use thiserror::Error;

/// Every way a character search can fail.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Invalid search term")]
    InvalidSearch,
    #[error("OpenAI API key is missing")]
    ConfigurationMissing,
    #[error("Failed to get a valid AI response after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error("Failed to generate a valid image for the character: {0}")]
    ImageGeneration(GenerationError),
    #[error("Storage error: {0}")]
    Store(#[from] DbError),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl LookupError {
    /// Classifies an image-generation failure. Only a reply without a usable
    /// asset URL is a generation failure; transport errors, error statuses and
    /// timeouts are unexpected.
    pub fn from_image(err: GenerationError) -> Self {
        match err {
            GenerationError::NoImageUrl | GenerationError::MalformedResponse(_) => {
                LookupError::ImageGeneration(err)
            }
            other => LookupError::Unexpected(other.to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::InvalidSearch => ErrorKind::ClientInput,
            LookupError::ConfigurationMissing => ErrorKind::ConfigurationMissing,
            LookupError::GenerationExhausted { .. } => ErrorKind::GenerationExhausted,
            LookupError::ImageGeneration(_) => ErrorKind::GenerationFailed,
            LookupError::Store(_) | LookupError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::ClientInput | ErrorKind::GenerationFailed => StatusCode::BAD_REQUEST,
            ErrorKind::ConfigurationMissing
            | ErrorKind::GenerationExhausted
            | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to clients.
    fn public_message(&self) -> String {
        match self {
            LookupError::ImageGeneration(_) => {
                "Failed to generate a valid image for the character.".to_string()
            }
            LookupError::Store(_) | LookupError::Unexpected(_) => {
                "Failed to fetch or generate character details".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = %self.kind(), "Character search failed: {}", self);
        } else {
            tracing::warn!(kind = %self.kind(), "Character search rejected: {}", self);
        }

        let body = ErrorBody {
            error: self.public_message(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
