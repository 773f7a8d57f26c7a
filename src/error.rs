use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{dto::FieldErrors, repository::RepositoryError};

/// Failure of an RPC procedure, as seen by the caller.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid input")]
    Validation(FieldErrors),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Not found")]
    NotFound,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RpcError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Validation(_) | Self::MalformedInput(_) => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::Unexpected(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for RpcError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<RepositoryError> for RpcError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Store(e) => Self::Unexpected(e.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Machine-readable kind
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Validation messages per input field
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub field_errors: Option<FieldErrors>,
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let (message, field_errors) = match self {
            Self::Unexpected(detail) => {
                tracing::error!("rpc call failed: {detail}");
                ("Something went wrong".to_string(), None)
            }
            Self::Validation(errors) => {
                tracing::debug!("rpc input rejected: {errors:?}");
                ("Invalid input".to_string(), Some(errors))
            }
            other => (other.to_string(), None),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                field_errors,
            },
        };

        (status, Json(body)).into_response()
    }
}
