//! Static front-end assets.
//!
//! Files come from one root directory. Paths are percent-decoded before the
//! lookup; anything that then resolves outside the root (`..`, `%2e%2e`,
//! symlinks) is treated as missing, as are unreadable files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const INDEX_FILE: &str = "index.html";

/// Serves files below `root`.
#[derive(Clone, Debug)]
pub struct StaticFiles {
    root: Arc<PathBuf>,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: Arc::new(root.into()) }
    }

    /// `GET /` — the root document.
    pub fn index(&self) -> impl Handler + use<> {
        let files = self.clone();
        move |_req: Request| {
            let files = files.clone();
            async move { files.serve(INDEX_FILE).await }
        }
    }

    /// `GET /static/{*path}` — the captured rest of the path, prefix stripped.
    pub fn assets(&self) -> impl Handler + use<> {
        let files = self.clone();
        move |req: Request| {
            let files = files.clone();
            async move { files.serve(req.param("path").unwrap_or_default()).await }
        }
    }

    /// Any unmatched path, looked up relative to the root.
    pub fn fallback(&self) -> impl Handler + use<> {
        let files = self.clone();
        move |req: Request| {
            let files = files.clone();
            async move {
                match req.decoded_path() {
                    Some(path) => files.serve(&path).await,
                    None => Response::status(Status::BadRequest),
                }
            }
        }
    }

    async fn serve(&self, path: &str) -> Response {
        match self.load(path).await {
            Some((content, content_type)) => Response::builder().raw(&content_type, content),
            None => Response::builder().status(Status::NotFound).text("not found"),
        }
    }

    async fn load(&self, path: &str) -> Option<(Vec<u8>, String)> {
        let relative = path.trim_start_matches('/');
        let root = match tokio::fs::canonicalize(self.root.as_path()).await {
            Ok(root) => root,
            Err(e) => {
                warn!(root = %self.root.display(), "static directory unavailable: {e}");
                return None;
            }
        };

        let mut file = root.join(relative);
        if relative.is_empty() || tokio::fs::metadata(&file).await.ok()?.is_dir() {
            file = file.join(INDEX_FILE);
        }

        // Missing files are ordinary 404s and not worth a log line.
        let file = tokio::fs::canonicalize(&file).await.ok()?;
        if !file.starts_with(&root) {
            warn!(path, resolved = %file.display(), "path traversal blocked");
            return None;
        }

        let content = tokio::fs::read(&file).await.ok()?;
        Some((content, content_type(&file)))
    }
}

fn content_type(file: &Path) -> String {
    let mime = mime_guess::from_path(file).first_or_octet_stream();
    if mime.type_() == mime_guess::mime::TEXT {
        format!("{mime}; charset=utf-8")
    } else {
        mime.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use bytes::Bytes;

    use super::*;
    use crate::router::Router;

    fn site() -> (tempfile::TempDir, Arc<Router>) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("static");
        fs::create_dir_all(root.join("js")).unwrap();
        fs::write(root.join("index.html"), "<html><body>mirrors</body></html>").unwrap();
        fs::write(root.join("js/background.js"), "particlesJS();").unwrap();
        fs::write(dir.path().join("secret.txt"), "nope").unwrap();

        let files = StaticFiles::new(&root);
        let app = Router::new()
            .get("/", files.index())
            .get("/static/{*path}", files.assets())
            .fallback(files.fallback());
        (dir, Arc::new(app))
    }

    fn get(path: &str) -> http::Request<Bytes> {
        http::Request::get(path).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn root_serves_index() {
        let (_dir, app) = site();
        let res = app.oneshot(get("/")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(res.body().starts_with(b"<html"));
    }

    #[tokio::test]
    async fn static_prefix_is_stripped() {
        let (_dir, app) = site();
        let res = app.oneshot(get("/static/js/background.js")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"particlesJS();");
        assert!(res.header("content-type").unwrap().contains("javascript"));
    }

    #[tokio::test]
    async fn unmatched_paths_are_looked_up_from_root() {
        let (_dir, app) = site();
        let res = app.oneshot(get("/js/background.js")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"particlesJS();");
    }

    #[tokio::test]
    async fn directories_resolve_to_index() {
        let (dir, app) = site();
        fs::create_dir(dir.path().join("static/docs")).unwrap();
        fs::write(dir.path().join("static/docs/index.html"), "<html>docs</html>").unwrap();

        let res = app.oneshot(get("/docs/")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"<html>docs</html>");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let (_dir, app) = site();
        assert_eq!(app.oneshot(get("/static/missing.css")).await.status_code(), 404);
        assert_eq!(app.oneshot(get("/missing.css")).await.status_code(), 404);
    }

    #[tokio::test]
    async fn traversal_outside_root_is_404() {
        let (_dir, app) = site();
        assert_eq!(app.oneshot(get("/static/../secret.txt")).await.status_code(), 404);
        assert_eq!(app.oneshot(get("/../secret.txt")).await.status_code(), 404);
    }

    #[tokio::test]
    async fn escaped_file_names_are_decoded() {
        let (dir, app) = site();
        fs::write(dir.path().join("static/my file.css"), "body {}").unwrap();

        for path in ["/static/my%20file.css", "/my%20file.css"] {
            let res = app.oneshot(get(path)).await;
            assert_eq!(res.status_code(), 200, "{path}");
            assert_eq!(res.body(), b"body {}");
        }
    }

    #[tokio::test]
    async fn encoded_traversal_is_404() {
        let (_dir, app) = site();
        for path in ["/static/%2e%2e/secret.txt", "/%2e%2e/secret.txt", "/%2E%2E%2Fsecret.txt"] {
            assert_eq!(app.oneshot(get(path)).await.status_code(), 404, "{path}");
        }
    }

    #[tokio::test]
    async fn non_utf8_path_is_400() {
        let (_dir, app) = site();
        assert_eq!(app.oneshot(get("/%FF.css")).await.status_code(), 400);
        assert_eq!(app.oneshot(get("/static/%FF.css")).await.status_code(), 400);
    }

    #[tokio::test]
    async fn missing_root_document_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = Arc::new(Router::new().get("/", StaticFiles::new(dir.path()).index()));
        assert_eq!(app.oneshot(get("/")).await.status_code(), 404);
    }
}
