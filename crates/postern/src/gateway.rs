//! The transport boundary between hyper and the routing core.
//!
//! Converts an inbound hyper request into the core's request
//! capability, runs dispatch, and converts the outcome back into an
//! HTTP response. Every request yields exactly one JSON response: the
//! writer contents on success, a structured 404 for an `unimplemented`
//! failure, and a fixed 500 payload for anything else.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use serde_json::Value;

use postern_router::{
    BodyValue, DispatchOutcome, ErrorPayload, HandlerError, ResponseWriter, Router, RouterRequest,
};
use postern_telemetry::events;

/// Shared serving state: the read-only router behind an `Arc`.
pub struct Gateway {
    router: Router,
}

impl Gateway {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Handle one inbound HTTP request.
    ///
    /// Generic over the body type so tests can drive it with
    /// `Full<Bytes>` instead of a live hyper connection.
    pub async fn handle_request<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let path = req.uri().path().to_string();
        let method = req.method().clone();

        let headers: HashMap<String, String> = req
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                Some((k.as_str().to_ascii_lowercase(), v.to_str().ok()?.to_string()))
            })
            .collect();

        let body_bytes = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::error!(
                    event = events::DISPATCH_ERROR,
                    method = %method,
                    path = %path,
                    error = %e,
                    "failed to read request body"
                );
                return json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ErrorPayload::internal_server_error().to_value(),
                );
            }
        };

        let mut router_req = RouterRequest::new(method.clone(), path.clone());
        router_req.headers = headers;
        router_req.body = if body_bytes.is_empty() {
            BodyValue::Empty
        } else {
            BodyValue::Raw(body_bytes)
        };

        let mut writer = ResponseWriter::new();
        match self.router.handle(&mut router_req, &mut writer).await {
            Ok(outcome) => {
                let (status, body) = writer.into_parts();
                let matched = outcome == DispatchOutcome::Completed;
                tracing::info!(
                    event = events::REQUEST_COMPLETED,
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    matched,
                );
                json_response(status, &body.unwrap_or(Value::Null))
            }
            Err(HandlerError::Unimplemented { detail }) => {
                tracing::info!(
                    event = events::REQUEST_COMPLETED,
                    method = %method,
                    path = %path,
                    status = 404_u16,
                    matched = false,
                );
                json_response(
                    StatusCode::NOT_FOUND,
                    &ErrorPayload::unimplemented(&detail).to_value(),
                )
            }
            Err(err) => {
                tracing::error!(
                    event = events::DISPATCH_ERROR,
                    method = %method,
                    path = %path,
                    error = %err,
                );
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &ErrorPayload::internal_server_error().to_value(),
                )
            }
        }
    }
}

/// Build a JSON response.
fn json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
