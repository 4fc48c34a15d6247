//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. A path
//! that no tree knows goes to the fallback handler; a path that another
//! method's tree knows gets `405 Method Not Allowed`.
//!
//! Matching runs on the raw path, so `%2F` inside a segment never splits it.
//! Captured parameters are percent-decoded afterwards; one that does not
//! decode to UTF-8 gets `400 Bad Request`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Middleware, Next};
use crate::request::{Request, percent_decode};
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup, wrap it in an `Arc`, and hand it to
/// [`Server::serve`](crate::Server::serve). Every builder method returns
/// `self` so registrations chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    fallback: Option<BoxedHandler>,
    // Outermost layer first.
    pub(crate) middleware: Vec<Arc<dyn Middleware>>,
}

/// Outcome of matching a method + path against the route trees.
pub(crate) enum Route {
    Found(BoxedHandler, HashMap<String, String>),
    BadRequest,
    MethodNotAllowed,
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), fallback: None, middleware: Vec::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax and are read back with
    /// `req.param("name")`; `{*name}` captures the rest of the path.
    ///
    /// # Panics
    ///
    /// Panics if the path is not a valid route or conflicts with one already
    /// registered for the same method. Routes are fixed at startup, so this
    /// is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    /// Handler for paths no route matches under any method.
    /// Without one those requests get `404 Not Found`.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    /// Wrap everything registered so far, and every earlier layer, in `layer`.
    pub fn layer(mut self, layer: impl Middleware) -> Self {
        self.middleware.insert(0, Arc::new(layer));
        self
    }

    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Route {
        if let Some(matched) = self.routes.get(method).and_then(|tree| tree.at(path).ok()) {
            let params: Option<HashMap<_, _>> = matched.params.iter()
                .map(|(k, v)| Some((k.to_owned(), percent_decode(v)?)))
                .collect();
            return match params {
                Some(params) => Route::Found(Arc::clone(matched.value), params),
                None => Route::BadRequest,
            };
        }

        let known_elsewhere = self.routes.iter()
            .any(|(m, tree)| m != method && tree.at(path).is_ok());
        if known_elsewhere {
            Route::MethodNotAllowed
        } else {
            Route::NotFound
        }
    }

    /// Dispatches to a route without running any middleware.
    pub(crate) fn route(&self, mut req: Request) -> BoxFuture {
        match self.lookup(req.method(), req.path()) {
            Route::Found(handler, params) => {
                req.set_params(params);
                handler.call(req)
            }
            Route::BadRequest => {
                debug!(path = req.path(), "path parameter is not UTF-8");
                Box::pin(async { Response::status(Status::BadRequest) })
            }
            Route::MethodNotAllowed => {
                Box::pin(async { Response::status(Status::MethodNotAllowed) })
            }
            Route::NotFound => match &self.fallback {
                Some(fallback) => fallback.call(req),
                None => Box::pin(async { Response::status(Status::NotFound) }),
            },
        }
    }

    /// Runs one request through the middleware chain and the routes.
    ///
    /// This is what the server calls per request; tests call it directly
    /// without opening a socket. The body is dropped unread.
    pub fn oneshot<B>(self: &Arc<Self>, req: http::Request<B>) -> BoxFuture {
        let req = Request::new(&req.into_parts().0);
        debug!(method = %req.method(), path = req.path(), "dispatch");
        Next::new(Arc::clone(self)).run(req)
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    async fn ok(_req: Request) -> Response {
        Response::text("ok")
    }

    async fn echo_version(req: Request) -> String {
        req.param("version").unwrap_or_default().to_owned()
    }

    fn get(path: &str) -> http::Request<Bytes> {
        http::Request::get(path).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn captures_a_single_segment() {
        let app = Arc::new(Router::new().get("/api/mirrorlist/{version}/json", echo_version));

        let res = app.oneshot(get("/api/mirrorlist/v5/json")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"v5");

        let res = app.oneshot(get("/api/mirrorlist/a/b/json")).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn params_are_percent_decoded_after_matching() {
        let app = Arc::new(Router::new().get("/api/mirrorlist/{version}/json", echo_version));

        let res = app.oneshot(get("/api/mirrorlist/v%C3%A9/json")).await;
        assert_eq!(res.body(), "vé".as_bytes());

        // An escaped slash stays inside its segment.
        let res = app.oneshot(get("/api/mirrorlist/v%2F1/json")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"v/1");
    }

    #[tokio::test]
    async fn non_utf8_param_is_400() {
        let app = Arc::new(Router::new().get("/api/mirrorlist/{version}/json", echo_version));
        let res = app.oneshot(get("/api/mirrorlist/v%FF/json")).await;
        assert_eq!(res.status_code(), 400);
    }

    #[tokio::test]
    async fn known_path_with_wrong_method_is_405() {
        let app = Arc::new(Router::new().get("/", ok));
        let req = http::Request::post("/").body(Bytes::new()).unwrap();
        assert_eq!(app.oneshot(req).await.status_code(), 405);
    }

    #[tokio::test]
    async fn unmatched_path_goes_to_fallback() {
        let app = Arc::new(Router::new()
            .get("/", ok)
            .fallback(|req: Request| async move { format!("fallback {}", req.path()) }));

        let res = app.oneshot(get("/js/background.js")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"fallback /js/background.js");
    }

    #[tokio::test]
    async fn unmatched_path_without_fallback_is_404() {
        let app = Arc::new(Router::new().get("/", ok));
        assert_eq!(app.oneshot(get("/nope")).await.status_code(), 404);
    }

    #[tokio::test]
    async fn extension_method_on_known_path_is_405() {
        let app = Arc::new(Router::new().get("/", ok));
        let req = http::Request::builder()
            .method(http::Method::from_bytes(b"PURGE").unwrap())
            .uri("/")
            .body(Bytes::new())
            .unwrap();
        assert_eq!(app.oneshot(req).await.status_code(), 405);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new().get("/{a}", ok).get("/{b}", ok);
    }
}
