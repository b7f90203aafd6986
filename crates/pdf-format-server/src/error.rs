use crate::storage::StorageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdf_manuscript::ManuscriptError;
use pdf_typeset::TypesetError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Could not read manuscript: {0}")]
    Extraction(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ServiceError {
    /// Status code and machine-readable kind sent to clients
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, "InvalidInput"),
            Self::Extraction(_) => (StatusCode::UNPROCESSABLE_ENTITY, "ExtractionFailure"),
            Self::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RenderFailure"),
            Self::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "StorageFailure"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            Self::Config(_) | Self::Io(_) | Self::TaskJoin(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError")
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            log::error!("{}: {}", kind, self);
        } else {
            log::info!("Rejected request ({}): {}", kind, self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

impl From<ManuscriptError> for ServiceError {
    fn from(err: ManuscriptError) -> Self {
        match err {
            ManuscriptError::InvalidInput(msg) => Self::InvalidInput(msg),
            ManuscriptError::TaskJoin(e) => Self::TaskJoin(e),
            ManuscriptError::Extraction(msg) => Self::Extraction(msg),
            other => Self::Extraction(other.to_string()),
        }
    }
}

impl From<TypesetError> for ServiceError {
    fn from(err: TypesetError) -> Self {
        match err {
            TypesetError::InvalidInput(msg) | TypesetError::Config(msg) => Self::InvalidInput(msg),
            TypesetError::TaskJoin(e) => Self::TaskJoin(e),
            other => Self::Render(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
