use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {}", .body.detail().unwrap_or("no detail"))]
    Status {
        status: u16,
        code: ErrorCode,
        body: ApiError,
    },
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0} has no id assigned")]
    MissingId(&'static str),
}

impl ServiceError {
    pub fn status(status: u16, body: ApiError) -> Self {
        Self::Status {
            status,
            code: ErrorCode::from_status(status),
            body,
        }
    }

    /// Message meant for the user, present only when the backend sent one in
    /// the error body. Transport and decode details stay in the logs.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Status { body, .. } => body.detail().map(str::to_string),
            Self::Transport(_) | Self::Decode(_) | Self::MissingId(_) => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Status { code, .. } => *code,
            Self::Transport(err) if err.is_timeout() || err.is_connect() => ErrorCode::Unavailable,
            Self::Transport(_) => ErrorCode::Unknown,
            Self::Decode(_) => ErrorCode::Internal,
            Self::MissingId(_) => ErrorCode::Validation,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
