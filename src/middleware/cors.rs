//! Cross-origin headers and preflight handling.

use crate::handler::BoxFuture;
use crate::method::Method;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Attaches CORS headers to every response and answers preflights itself.
///
/// `OPTIONS` requests never reach the routes: they get `200 OK` with an empty
/// body, whatever the path. There is no per-origin allow-list.
#[derive(Clone, Debug)]
pub struct Cors {
    allow_origin: String,
    allow_methods: String,
    allow_headers: String,
}

impl Cors {
    /// `*` origin; `GET, POST, OPTIONS, PUT, DELETE`; `Content-Type, Authorization`.
    pub fn permissive() -> Self {
        Self::new(
            "*",
            &[Method::Get, Method::Post, Method::Options, Method::Put, Method::Delete],
            &["Content-Type", "Authorization"],
        )
    }

    pub fn new(origin: &str, methods: &[Method], headers: &[&str]) -> Self {
        Self {
            allow_origin: origin.to_owned(),
            allow_methods: methods.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", "),
            allow_headers: headers.join(", "),
        }
    }

    fn apply(&self, res: &mut Response) {
        res.set_header("access-control-allow-origin", &self.allow_origin);
        res.set_header("access-control-allow-methods", &self.allow_methods);
        res.set_header("access-control-allow-headers", &self.allow_headers);
    }
}

impl Default for Cors {
    fn default() -> Self { Self::permissive() }
}

impl Middleware for Cors {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let cors = self.clone();
        Box::pin(async move {
            let mut res = if *req.method() == Method::Options {
                Response::status(Status::Ok)
            } else {
                next.run(req).await
            };
            cors.apply(&mut res);
            res
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::router::Router;

    fn app() -> Arc<Router> {
        Arc::new(Router::new()
            .get("/", |_req: Request| async { "routed" })
            .layer(Cors::permissive()))
    }

    fn request(method: http::Method, path: &str) -> http::Request<Bytes> {
        http::Request::builder().method(method).uri(path).body(Bytes::new()).unwrap()
    }

    fn assert_cors(res: &Response) {
        assert_eq!(res.header("access-control-allow-origin"), Some("*"));
        assert_eq!(
            res.header("access-control-allow-methods"),
            Some("GET, POST, OPTIONS, PUT, DELETE"),
        );
        assert_eq!(
            res.header("access-control-allow-headers"),
            Some("Content-Type, Authorization"),
        );
    }

    #[tokio::test]
    async fn preflight_short_circuits_on_any_path() {
        for path in ["/", "/does/not/exist", "/api/mirrorlist/v1/json"] {
            let res = app().oneshot(request(http::Method::OPTIONS, path)).await;
            assert_eq!(res.status_code(), 200);
            assert!(res.body().is_empty());
            assert_cors(&res);
        }
    }

    #[tokio::test]
    async fn forwarded_requests_get_headers() {
        let res = app().oneshot(request(http::Method::GET, "/")).await;
        assert_eq!(res.body(), b"routed");
        assert_cors(&res);
    }

    #[tokio::test]
    async fn error_responses_get_headers() {
        let res = app().oneshot(request(http::Method::GET, "/missing")).await;
        assert_eq!(res.status_code(), 404);
        assert_cors(&res);

        let res = app().oneshot(request(http::Method::DELETE, "/")).await;
        assert_eq!(res.status_code(), 405);
        assert_cors(&res);
    }
}
