//! Postern routing core.
//!
//! Maps an incoming method + path to a registered ordered chain of
//! handlers, extracting named and wildcard path parameters along the
//! way, and optionally decoding the request body according to its
//! declared content type.
//!
//! # Features
//!
//! - Path templates with literal, `:name`, and `*` segments
//! - First-match-wins dispatch in registration order
//! - Sequential async handler chains with a designated default fallback
//! - Total (never-failing) body content negotiation

#![warn(unsafe_code)]

pub mod body;
pub mod error;
pub mod handler;
pub mod pattern;
pub mod request;
pub mod response;
pub mod router;

pub use error::{ErrorDetail, ErrorPayload, HandlerError};
pub use handler::{Chain, Handler, HandlerFn};
pub use pattern::{compile, CompiledPattern, WILDCARD_PARAM};
pub use request::{BodyValue, RouterRequest};
pub use response::ResponseWriter;
pub use router::{DispatchOutcome, Router};
