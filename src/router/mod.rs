//! Request routing — map URL patterns and HTTP methods to handler functions.
//!
//! [`Router`] dispatches incoming requests to handlers based on the request
//! method and URL path. Two pattern styles are supported:
//!
//! | Pattern                    | Example match      | Captured params      |
//! |----------------------------|--------------------|----------------------|
//! | `/get-by-name`             | `/get-by-name`     | *(none)*             |
//! | `/get-student/:student_id` | `/get-student/2`   | `student_id → "2"`   |
//!
//! Trailing slashes are normalized on both patterns and incoming paths, so
//! `/get-by-name/` and `/get-by-name` are treated as equivalent.
//!
//! Routes are matched in registration order; the first route whose method and
//! pattern both match wins. No route matching → `404 Not Found`.

use std::pin::Pin;
use std::sync::Arc;

use crate::context::{Context, PathParams};
use crate::{Method, Response, StatusCode};

/// Type-erased, heap-allocated async handler that processes a [`Context`] and
/// returns a [`Response`].
///
/// Handlers are stored behind `Arc<dyn Fn(…)>` so they can be shared across
/// tasks without copying the underlying closure. Use [`Router::get`],
/// [`Router::post`], and the other method-specific helpers rather than
/// constructing this type directly.
pub type Handler =
    Arc<dyn Fn(Context) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static>;

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this automatically.
pub trait IntoHandler: Send + Sync + 'static {
    /// Call the handler with the given context, boxing the returned future.
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin((self)(ctx))
    }
}

// A single path segment: a literal string or a named capture (`:name`).
#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Capture(String),
}

// Compiled representation of a route pattern string.
#[derive(Debug, Clone)]
enum Pattern {
    // Matches one exact path string, e.g. `/get-by-name`.
    Exact(String),
    // Matches a fixed number of segments where some are named captures,
    // e.g. `/get-student/:student_id`.
    Captures(Vec<Segment>),
}

impl Pattern {
    // Parse a route pattern string. A trailing slash (other than on the root
    // `/`) is stripped first so `/x/` and `/x` compile identically.
    fn parse(pattern: &str) -> Self {
        let pattern = normalize(pattern);

        if pattern.contains(':') {
            let segments = pattern
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| match s.strip_prefix(':') {
                    Some(name) => Segment::Capture(name.to_owned()),
                    None => Segment::Literal(s.to_owned()),
                })
                .collect();
            return Pattern::Captures(segments);
        }

        Pattern::Exact(pattern.to_owned())
    }

    // Try to match `path` against this pattern, returning extracted
    // [`PathParams`] on success.
    fn matches(&self, path: &str) -> Option<PathParams> {
        let path = normalize(path);

        match self {
            Pattern::Exact(p) => (p == path).then(PathParams::new),
            Pattern::Captures(segments) => {
                let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
                if segments.len() != path_segments.len() {
                    return None;
                }

                let mut params = PathParams::new();
                for (seg, path_seg) in segments.iter().zip(path_segments) {
                    match seg {
                        Segment::Literal(s) => {
                            if s != path_seg {
                                return None;
                            }
                        }
                        Segment::Capture(name) => {
                            params.insert(name.clone(), path_seg.to_owned());
                        }
                    }
                }
                Some(params)
            }
        }
    }
}

fn normalize(path: &str) -> &str {
    if path != "/" && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

// A registered route binding a method + pattern to a handler.
struct Route {
    method: Method,
    pattern: Pattern,
    handler: Handler,
}

impl Route {
    fn new(method: Method, pattern: &str, handler: Handler) -> Self {
        Self {
            method,
            pattern: Pattern::parse(pattern),
            handler,
        }
    }

    // `Some(params)` when both the method and path pattern match.
    fn matches(&self, method: &Method, path: &str) -> Option<PathParams> {
        if &self.method == method {
            self.pattern.matches(path)
        } else {
            None
        }
    }
}

/// HTTP request router for the directory's six routes (or any others).
///
/// # Examples
///
/// ```rust,no_run
/// use rosterd::{Router, Response, StatusCode};
/// use rosterd::context::Context;
///
/// let mut router = Router::new();
///
/// router.get("/", |_ctx| async {
///     Response::json(StatusCode::Ok, &serde_json::json!({"name": "First Data"}))
/// });
///
/// router.get("/get-student/:student_id", |ctx: Context| async move {
///     let id = ctx.params().get("student_id").unwrap_or("?").to_owned();
///     Response::new(StatusCode::Ok).body(id)
/// });
/// ```
pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates a new, empty `Router`.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a handler for `GET` requests matching `path`.
    pub fn get(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Get, path, handler);
    }

    /// Registers a handler for `POST` requests matching `path`.
    pub fn post(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Post, path, handler);
    }

    /// Registers a handler for `PUT` requests matching `path`.
    pub fn put(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Put, path, handler);
    }

    /// Registers a handler for `DELETE` requests matching `path`.
    pub fn delete(&mut self, path: &str, handler: impl IntoHandler) {
        self.add_route(Method::Delete, path, handler);
    }

    // Erase the concrete handler type and store it as a `Handler` trait object.
    fn add_route(&mut self, method: Method, path: &str, handler: impl IntoHandler) {
        let handler: Handler = Arc::new(move |ctx| handler.call(ctx));
        self.routes.push(Route::new(method, path, handler));
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes have been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches `ctx` to the first matching route and returns its response.
    ///
    /// Routes are tested in registration order. The matched route's captures
    /// are injected into a fresh [`Context`] before the handler runs. When no
    /// route matches, a `404 Not Found` response is returned.
    pub async fn dispatch(&self, ctx: Context) -> Response {
        let request = ctx.into_request();
        let path = request.path().to_owned();

        for route in &self.routes {
            if let Some(params) = route.matches(request.method(), &path) {
                let ctx = Context::with_params(request, params);
                return (route.handler)(ctx).await;
            }
        }

        Response::new(StatusCode::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;

    fn make_context(method: &str, path: &str) -> Context {
        let raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let (req, _) = Request::parse(raw.as_bytes()).unwrap();
        Context::new(req)
    }

    // ── Pattern ───────────────────────────────────────────────────────────────

    #[test]
    fn pattern_root_is_exact() {
        assert!(matches!(Pattern::parse("/"), Pattern::Exact(s) if s == "/"));
    }

    #[test]
    fn pattern_trailing_slash_stripped() {
        assert!(matches!(
            Pattern::parse("/get-by-name/"),
            Pattern::Exact(s) if s == "/get-by-name"
        ));
    }

    #[test]
    fn pattern_capture_segments() {
        let pat = Pattern::parse("/get-student/:student_id");
        match pat {
            Pattern::Captures(segments) => {
                assert_eq!(segments.len(), 2);
                assert!(matches!(&segments[0], Segment::Literal(s) if s == "get-student"));
                assert!(matches!(&segments[1], Segment::Capture(s) if s == "student_id"));
            }
            other => panic!("expected Captures, got {other:?}"),
        }
    }

    #[test]
    fn pattern_exact_hit_and_miss() {
        let pat = Pattern::parse("/get-by-name");
        assert!(pat.matches("/get-by-name").is_some());
        assert!(pat.matches("/get-by-name/").is_some());
        assert!(pat.matches("/get-student").is_none());
    }

    #[test]
    fn pattern_capture_extracts_value() {
        let pat = Pattern::parse("/get-student/:student_id");
        let params = pat.matches("/get-student/2").unwrap();
        assert_eq!(params.get("student_id"), Some("2"));
    }

    #[test]
    fn pattern_capture_wrong_segment_count() {
        let pat = Pattern::parse("/get-student/:student_id");
        assert!(pat.matches("/get-student").is_none());
        assert!(pat.matches("/get-student/2/extra").is_none());
    }

    #[test]
    fn pattern_capture_wrong_literal() {
        let pat = Pattern::parse("/get-student/:student_id");
        assert!(pat.matches("/delete-student/2").is_none());
    }

    // ── Router ────────────────────────────────────────────────────────────────

    #[test]
    fn router_starts_empty() {
        let router = Router::new();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
    }

    #[tokio::test]
    async fn empty_router_returns_404() {
        let router = Router::new();
        let res = router.dispatch(make_context("GET", "/")).await;
        assert_eq!(res.status(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn get_matches_registered_path() {
        let mut router = Router::new();
        router.get("/", |_ctx| async { Response::new(StatusCode::Ok) });
        let res = router.dispatch(make_context("GET", "/")).await;
        assert_eq!(res.status(), StatusCode::Ok);
    }

    #[tokio::test]
    async fn method_mismatch_returns_404() {
        let mut router = Router::new();
        router.get("/get-by-name", |_ctx| async { Response::new(StatusCode::Ok) });
        let res = router.dispatch(make_context("POST", "/get-by-name")).await;
        assert_eq!(res.status(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn unregistered_path_returns_404() {
        let mut router = Router::new();
        router.get("/get-by-name", |_ctx| async { Response::new(StatusCode::Ok) });
        let res = router.dispatch(make_context("GET", "/nope")).await;
        assert_eq!(res.status(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn first_matching_route_wins() {
        let mut router = Router::new();
        router.get("/r", |_ctx| async { Response::new(StatusCode::Ok) });
        router.get("/r", |_ctx| async { Response::new(StatusCode::NoContent) });
        let res = router.dispatch(make_context("GET", "/r")).await;
        assert_eq!(res.status(), StatusCode::Ok);
    }

    #[tokio::test]
    async fn captured_param_reaches_handler() {
        let mut router = Router::new();
        router.get("/get-student/:student_id", |ctx: Context| async move {
            let id = ctx.params().get("student_id").unwrap_or("").to_owned();
            Response::new(StatusCode::Ok).body(id)
        });
        let res = router.dispatch(make_context("GET", "/get-student/42")).await;
        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.body_as_bytes(), b"42");
    }

    #[tokio::test]
    async fn put_and_delete_dispatch() {
        let mut router = Router::new();
        router.put("/update-student/:student_id", |_ctx| async {
            Response::new(StatusCode::Ok)
        });
        router.delete("/delete-student/:student_id", |_ctx| async {
            Response::new(StatusCode::Ok)
        });
        assert_eq!(router.len(), 2);
        assert_eq!(
            router
                .dispatch(make_context("PUT", "/update-student/1"))
                .await
                .status(),
            StatusCode::Ok
        );
        assert_eq!(
            router
                .dispatch(make_context("DELETE", "/delete-student/1"))
                .await
                .status(),
            StatusCode::Ok
        );
    }
}
