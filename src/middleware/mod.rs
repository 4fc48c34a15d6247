//! Middleware layer.
//!
//! Middleware sees every request before the router does and every response
//! after it. Each layer decides whether to call [`Next::run`] (pass through)
//! or to answer on its own (short-circuit).
//!
//! Layers are attached with [`Router::layer`](crate::Router::layer). The layer
//! added last is the outermost one and runs first:
//!
//! ```rust,no_run
//! use mirrorlist::Router;
//! use mirrorlist::middleware::{Cors, Embed};
//!
//! # fn main() -> Result<(), mirrorlist::Error> {
//! // request → Cors → Embed → routes
//! let app = Router::new()
//!     .layer(Embed::discord()?)
//!     .layer(Cors::permissive());
//! # Ok(()) }
//! ```

pub mod cors;
pub mod embed;

use std::sync::Arc;

use crate::handler::BoxFuture;
use crate::request::Request;
use crate::router::Router;

pub use cors::Cors;
pub use embed::{
    ClientClass, Classifier, Embed, EmbedStrategy, LinkPreview, PreviewMeta, UserAgentClassifier,
};

/// A request/response interceptor.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: Request, next: Next) -> BoxFuture;
}

/// The rest of the chain after the current middleware.
///
/// Consumed by [`run`](Next::run), so a layer forwards a request at most once.
pub struct Next {
    router: Arc<Router>,
    index: usize,
}

impl Next {
    pub(crate) fn new(router: Arc<Router>) -> Self {
        Self { router, index: 0 }
    }

    /// Hands the request to the next layer, or to the routes once the chain
    /// is exhausted.
    pub fn run(self, req: Request) -> BoxFuture {
        let layer = self.router.middleware.get(self.index).cloned();
        match layer {
            Some(layer) => {
                let next = Self { router: self.router, index: self.index + 1 };
                layer.handle(req, next)
            }
            None => self.router.route(req),
        }
    }
}
