//! The request capability consumed by the router and its handlers.

use std::collections::HashMap;

use bytes::Bytes;
use http::Method;
use serde_json::Value;

/// The request body as seen by handlers.
///
/// Starts out [`BodyValue::Raw`] (or [`BodyValue::Empty`]); body
/// negotiation replaces it with a decoded variant before any handler
/// runs when the declared content type is recognized.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    /// No body was supplied.
    Empty,
    /// Undecoded bytes (unrecognized or absent content type).
    Raw(Bytes),
    /// `text/html` or `text/plain`.
    Text(String),
    /// `application/json`. Malformed input decodes to an empty object.
    Json(Value),
    /// `application/x-www-form-urlencoded`.
    Form(HashMap<String, String>),
}

/// An inbound HTTP request, detached from any transport.
///
/// The router populates `params` before invoking the matched chain;
/// handlers read parameters from the request instance, not from a
/// return value.
#[derive(Debug)]
pub struct RouterRequest {
    pub method: Method,
    pub path: String,
    /// Header map with lowercased names.
    pub headers: HashMap<String, String>,
    pub body: BodyValue,
    /// Path parameters bound by the matched template.
    pub params: HashMap<String, String>,
}

impl RouterRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: BodyValue::Empty,
            params: HashMap::new(),
        }
    }

    /// Set a header, lowercasing the name.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: BodyValue) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// A bound path parameter, if the matched template captured it.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
