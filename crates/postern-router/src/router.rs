//! The route table, registration, and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};

use crate::body;
use crate::error::{ErrorPayload, HandlerError};
use crate::handler::{Chain, Handler};
use crate::pattern::{compile, CompiledPattern};
use crate::request::RouterRequest;
use crate::response::ResponseWriter;

/// One registered template: its compiled pattern plus the chain
/// installed for each method.
#[derive(Debug)]
struct RouteEntry {
    template: String,
    pattern: CompiledPattern,
    methods: HashMap<Method, Chain>,
}

/// How a dispatch resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A registered chain ran to completion.
    Completed,
    /// No template matched the path, or the matched template had no
    /// chain for the method; the default fallback reported not-found.
    NoMatch,
}

/// The request router.
///
/// Entries are kept in an explicit ordered list: registration order is
/// the dispatch tie-break order, first match wins. The table is built
/// once at construction time and read-only thereafter; serving shares
/// it through `Arc` without locking.
#[derive(Debug, Default)]
pub struct Router {
    entries: Vec<RouteEntry>,
}

impl Router {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler chain for a method and path template.
    ///
    /// Re-registering the same template under a different method merges
    /// into the existing entry; re-registering the same
    /// (template, method) pair replaces only that chain. An empty
    /// handler list installs the default fallback chain. Never fails:
    /// malformed templates are accepted permissively by the compiler.
    pub fn add<I>(&mut self, method: Method, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        let chain = Chain::from_handlers(handlers.into_iter().collect());

        if let Some(entry) = self.entries.iter_mut().find(|e| e.template == template) {
            entry.methods.insert(method, chain);
            return;
        }

        let mut methods = HashMap::new();
        methods.insert(method, chain);
        self.entries.push(RouteEntry {
            template: template.to_string(),
            pattern: compile(template),
            methods,
        });
    }

    pub fn get<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::GET, template, handlers);
    }

    pub fn post<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::POST, template, handlers);
    }

    pub fn put<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::PUT, template, handlers);
    }

    pub fn delete<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::DELETE, template, handlers);
    }

    pub fn patch<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::PATCH, template, handlers);
    }

    pub fn options<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::OPTIONS, template, handlers);
    }

    pub fn head<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::HEAD, template, handlers);
    }

    pub fn connect<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::CONNECT, template, handlers);
    }

    pub fn trace<I>(&mut self, template: &str, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn Handler>>,
    {
        self.add(Method::TRACE, template, handlers);
    }

    /// Dispatch one inbound request.
    ///
    /// Decodes the body per its declared content type, scans the table
    /// in registration order for the first matching template, binds
    /// captured parameters onto the request, and runs the resolved
    /// chain strictly in sequence. When no chain is registered for the
    /// resolved match the default fallback writes a structured 404
    /// payload and the dispatch yields [`DispatchOutcome::NoMatch`].
    ///
    /// # Errors
    ///
    /// The first failure raised by a chain unit aborts the chain and is
    /// returned unchanged; the hosting transport is responsible for
    /// converting it into a response.
    pub async fn handle(
        &self,
        req: &mut RouterRequest,
        res: &mut ResponseWriter,
    ) -> Result<DispatchOutcome, HandlerError> {
        body::negotiate(req);

        let mut resolved: Option<&Chain> = None;
        for entry in &self.entries {
            if let Some(captures) = entry.pattern.captures(&req.path) {
                // Zip truncates on either side, so a capture-count
                // mismatch never panics; unmatched names get no binding.
                req.params = entry
                    .pattern
                    .keys()
                    .iter()
                    .cloned()
                    .zip(captures)
                    .collect();
                resolved = entry.methods.get(&req.method);
                break;
            }
        }

        match resolved {
            Some(Chain::Handlers(handlers)) => {
                for handler in handlers {
                    handler.call(req, res).await?;
                }
                Ok(DispatchOutcome::Completed)
            }
            Some(Chain::Default) | None => {
                res.status(StatusCode::NOT_FOUND).json(
                    ErrorPayload::unimplemented("no handler registered for this route")
                        .to_value(),
                );
                Ok(DispatchOutcome::NoMatch)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerFn;
    use http::Method;
    use serde_json::json;

    fn ok_handler(tag: &'static str) -> Arc<dyn Handler> {
        Arc::new(HandlerFn(move |_req: &mut RouterRequest, res: &mut ResponseWriter| {
            res.status(StatusCode::OK).json(json!({ "tag": tag }));
            Ok(())
        }))
    }

    async fn dispatch(
        router: &Router,
        method: Method,
        path: &str,
    ) -> (RouterRequest, ResponseWriter, DispatchOutcome) {
        let mut req = RouterRequest::new(method, path);
        let mut res = ResponseWriter::new();
        let outcome = router.handle(&mut req, &mut res).await.expect("no handler error");
        (req, res, outcome)
    }

    // === Registration tests ===

    #[tokio::test]
    async fn registration_order_is_match_priority() {
        let mut router = Router::new();
        router.get("/:anything", vec![ok_handler("param")]);
        router.get("/users", vec![ok_handler("literal")]);

        // The less specific template wins because it was registered first.
        let (_, res, _) = dispatch(&router, Method::GET, "/users").await;
        assert_eq!(res.body(), Some(&json!({ "tag": "param" })));
    }

    #[tokio::test]
    async fn merge_keeps_other_methods_on_same_template() {
        let mut router = Router::new();
        router.get("/api/test", vec![ok_handler("get")]);
        router.post("/api/test", vec![ok_handler("post")]);

        let (_, res, outcome) = dispatch(&router, Method::GET, "/api/test").await;
        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(res.body(), Some(&json!({ "tag": "get" })));

        let (_, res, outcome) = dispatch(&router, Method::POST, "/api/test").await;
        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(res.body(), Some(&json!({ "tag": "post" })));
    }

    #[tokio::test]
    async fn same_template_and_method_replaces_the_chain() {
        let mut router = Router::new();
        router.get("/api/test", vec![ok_handler("first")]);
        router.get("/api/test", vec![ok_handler("second")]);

        let (_, res, _) = dispatch(&router, Method::GET, "/api/test").await;
        assert_eq!(res.body(), Some(&json!({ "tag": "second" })));
    }

    #[tokio::test]
    async fn zero_handlers_installs_the_default_chain() {
        let mut router = Router::new();
        router.get("/unimplemented", vec![]);

        let (_, res, outcome) = dispatch(&router, Method::GET, "/unimplemented").await;
        assert_eq!(outcome, DispatchOutcome::NoMatch);
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    // === Dispatch tests ===

    #[tokio::test]
    async fn named_param_binds_one_segment() {
        let mut router = Router::new();
        router.get("/users/:id", vec![ok_handler("user")]);

        let (req, _, outcome) = dispatch(&router, Method::GET, "/users/42").await;
        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(req.param("id"), Some("42"));

        let (_, _, outcome) = dispatch(&router, Method::GET, "/users/42/extra").await;
        assert_eq!(outcome, DispatchOutcome::NoMatch);
    }

    #[tokio::test]
    async fn wildcard_binds_remainder_under_wild() {
        let mut router = Router::new();
        router.get("/files/*", vec![ok_handler("file")]);

        let (req, _, outcome) = dispatch(&router, Method::GET, "/files/a/b/c.txt").await;
        assert_eq!(outcome, DispatchOutcome::Completed);
        assert_eq!(req.param("wild"), Some("a/b/c.txt"));
    }

    #[tokio::test]
    async fn multiple_params_bind_in_template_order() {
        let mut router = Router::new();
        router.get("/api/users/:id/export/:format/test", vec![ok_handler("export")]);

        let (req, _, _) = dispatch(&router, Method::GET, "/api/users/42/export/csv/test").await;
        assert_eq!(req.params.len(), 2);
        assert_eq!(req.param("id"), Some("42"));
        assert_eq!(req.param("format"), Some("csv"));
    }

    #[tokio::test]
    async fn trailing_slash_on_request_path_matches() {
        let mut router = Router::new();
        router.get("/api/test", vec![ok_handler("test")]);

        let (_, _, outcome) = dispatch(&router, Method::GET, "/api/test/").await;
        assert_eq!(outcome, DispatchOutcome::Completed);
    }

    #[tokio::test]
    async fn unregistered_method_falls_back_to_default() {
        let mut router = Router::new();
        router.get("/api/test", vec![ok_handler("get")]);

        let (_, res, outcome) = dispatch(&router, Method::DELETE, "/api/test").await;
        assert_eq!(outcome, DispatchOutcome::NoMatch);
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unmatched_path_reaches_default_with_empty_params() {
        let mut router = Router::new();
        router.get("/", vec![ok_handler("root")]);

        let (req, res, outcome) = dispatch(&router, Method::GET, "/unimplemented").await;
        assert_eq!(outcome, DispatchOutcome::NoMatch);
        assert!(req.params.is_empty());
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        let body = res.body().expect("default writes a payload");
        assert_eq!(body["errors"][0]["code"], "unimplemented");
        assert_eq!(body["errors"][0]["status"], 404);
    }

    #[tokio::test]
    async fn params_are_bound_even_when_method_is_unregistered() {
        let mut router = Router::new();
        router.get("/users/:id", vec![ok_handler("get")]);

        let (req, _, outcome) = dispatch(&router, Method::POST, "/users/7").await;
        assert_eq!(outcome, DispatchOutcome::NoMatch);
        assert_eq!(req.param("id"), Some("7"));
    }

    #[tokio::test]
    async fn handler_error_propagates_uncaught() {
        let mut router = Router::new();
        router.get(
            "/boom",
            vec![Arc::new(HandlerFn(
                |_req: &mut RouterRequest, _res: &mut ResponseWriter| {
                    Err(HandlerError::Internal(anyhow::anyhow!("boom")))
                },
            )) as Arc<dyn Handler>],
        );

        let mut req = RouterRequest::new(Method::GET, "/boom");
        let mut res = ResponseWriter::new();
        let err = router.handle(&mut req, &mut res).await.expect_err("handler failed");
        assert!(matches!(err, HandlerError::Internal(_)));
    }
}
