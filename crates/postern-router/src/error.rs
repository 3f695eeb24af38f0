//! Error taxonomy and the structured error payload.

use serde::Serialize;
use thiserror::Error;

/// A failure escaping a handler chain.
///
/// Never caught inside [`Router::handle`](crate::Router::handle); the
/// hosting transport pattern-matches on the kind and issues exactly one
/// response.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A handler signaled that the requested operation does not exist.
    /// The transport maps this to a structured 404 payload.
    #[error("unimplemented: {detail}")]
    Unimplemented { detail: String },

    /// Any other handler failure. Mapped to a generic 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// The wire shape of every error response:
/// `{"errors":[{"code","status","detail"}]}`.
#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub errors: Vec<ErrorDetail>,
}

/// One element of the `errors` array.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Short machine token, e.g. `unimplemented`.
    pub code: String,
    /// Numeric HTTP status.
    pub status: u16,
    /// Human-readable message.
    pub detail: String,
}

impl ErrorPayload {
    /// The 404-class payload for the default handler and for
    /// [`HandlerError::Unimplemented`].
    pub fn unimplemented(detail: &str) -> Self {
        Self {
            errors: vec![ErrorDetail {
                code: "unimplemented".to_string(),
                status: 404,
                detail: detail.to_string(),
            }],
        }
    }

    /// The fixed payload for any other escaping failure.
    pub fn internal_server_error() -> Self {
        Self {
            errors: vec![ErrorDetail {
                code: "INTERNAL_SERVER_ERROR".to_string(),
                status: 500,
                detail: "Internal Server Error".to_string(),
            }],
        }
    }

    /// Serialize to a JSON value for a [`ResponseWriter`](crate::ResponseWriter).
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("payload of plain strings and numbers serializes")
    }
}
