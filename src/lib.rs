//! # mirrorlist
//!
//! Publishes a list of download mirrors as a versioned JSON API and serves
//! the static front end next to it.
//!
//! ## Request path
//!
//! ```text
//! request ─► Cors ─► Embed ─► Router ─┬─► /api/mirrorlist/{version}/json → mirror_list
//!                                     ├─► /                              → index.html
//!                                     ├─► /static/{*path}                → asset tree
//!                                     └─► anything else                  → asset tree
//! ```
//!
//! - [`Cors`](middleware::Cors) answers every `OPTIONS` itself and stamps
//!   allow-all CORS headers on everything else.
//! - [`Embed`](middleware::Embed) hands link-preview crawlers a fixed HTML
//!   page with Open Graph tags instead of whatever they asked for.
//! - The mirror list is re-read from disk on every request; nothing is cached.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mirrorlist::{Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mirrorlist::Error> {
//!     let config = Config::from_env()?;
//!     let app = mirrorlist::app(&config)?;
//!     Server::new(config.bind).serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod middleware;
pub mod mirrors;
pub mod static_files;
pub mod store;

use std::sync::Arc;

pub use config::Config;
pub use error::{Error, StoreError};
pub use handler::{BoxFuture, Handler};
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;

use crate::middleware::{Cors, Embed};
use crate::static_files::StaticFiles;
use crate::store::{FileMirrorStore, MirrorStore};

/// Builds the complete application: routes, fallback, and middleware.
pub fn app(config: &Config) -> Result<Router, Error> {
    let store: Arc<dyn MirrorStore> = Arc::new(FileMirrorStore::new(&config.mirrors_path));
    let files = StaticFiles::new(&config.static_dir);

    Ok(Router::new()
        .get("/", files.index())
        .get("/static/{*path}", files.assets())
        .get("/api/mirrorlist/{version}/json", mirrors::mirror_list(store))
        .fallback(files.fallback())
        .layer(Embed::discord()?)
        .layer(Cors::permissive()))
}
