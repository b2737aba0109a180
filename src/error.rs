use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::{debug, error};

pub const INVALID_NAME_ERROR: &str = "Invalid counter name";
pub const INVALID_NAME_MESSAGE: &str = "Counter name must contain only alphanumeric characters, hyphens, and underscores (max 100 characters)";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid counter name: {0:?}")]
    InvalidName(String),

    #[error("load counters from {path} failed: {reason}")]
    Load { path: String, reason: String },

    #[error("save counters failed: {0}")]
    Save(#[from] std::io::Error),

    #[error("serialize counters failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("counter {0} overflowed")]
    Overflow(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidName(_) => StatusCode::BAD_REQUEST,
            Self::Load { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Save(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Overflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match &self {
            Self::InvalidName(_) => {
                debug!("{}", self);
                serde_json::json!({"error": INVALID_NAME_ERROR, "message": INVALID_NAME_MESSAGE})
            }
            // internal detail goes to the log only
            _ => {
                error!("error incrementing counter: {}", self);
                serde_json::json!({"error": INTERNAL_ERROR})
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::InvalidName("a b".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Overflow("visits".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(AppError::from(io).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
