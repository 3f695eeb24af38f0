//! Handler units, chains, and the designated default fallback.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::request::RouterRequest;
use crate::response::ResponseWriter;

/// One unit of a handler chain.
///
/// A unit may suspend (perform asynchronous work) before returning; the
/// router awaits each unit to completion before invoking the next.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(
        &self,
        req: &mut RouterRequest,
        res: &mut ResponseWriter,
    ) -> Result<(), HandlerError>;
}

/// Adapter turning a synchronous closure into a [`Handler`].
pub struct HandlerFn<F>(pub F);

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut RouterRequest, &mut ResponseWriter) -> Result<(), HandlerError> + Send + Sync,
{
    async fn call(
        &self,
        req: &mut RouterRequest,
        res: &mut ResponseWriter,
    ) -> Result<(), HandlerError> {
        (self.0)(req, res)
    }
}

/// The chain installed for one (template, method) pair.
#[derive(Clone)]
pub enum Chain {
    /// The designated fallback, distinguishable from user registrations.
    /// Installed when a registration supplies zero handlers, and
    /// resolved at dispatch time for "no template matched" and
    /// "template matched, method unregistered".
    Default,
    /// User-registered units, executed strictly in order.
    Handlers(Vec<Arc<dyn Handler>>),
}

impl Chain {
    /// Build a chain from supplied handlers; an empty list falls back
    /// to [`Chain::Default`].
    pub fn from_handlers(handlers: Vec<Arc<dyn Handler>>) -> Self {
        if handlers.is_empty() {
            Chain::Default
        } else {
            Chain::Handlers(handlers)
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Chain::Default)
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Default => f.write_str("Chain::Default"),
            Chain::Handlers(handlers) => {
                write!(f, "Chain::Handlers(len={})", handlers.len())
            }
        }
    }
}
