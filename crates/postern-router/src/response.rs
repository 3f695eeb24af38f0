//! The response capability consumed by the router and its handlers.

use http::StatusCode;
use serde_json::Value;

/// Collects the status code and JSON body a handler (or the default
/// fallback) wants to send. The hosting transport drains it into an
/// actual HTTP response after dispatch completes.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    body: Option<Value>,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response status.
    pub fn status(&mut self, code: StatusCode) -> &mut Self {
        self.status = Some(code);
        self
    }

    /// Set the JSON response body.
    pub fn json(&mut self, value: Value) -> &mut Self {
        self.body = Some(value);
        self
    }

    /// The status to send; 200 unless a handler set one.
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Consume the writer into `(status, body)`.
    pub fn into_parts(self) -> (StatusCode, Option<Value>) {
        (self.status.unwrap_or(StatusCode::OK), self.body)
    }
}
