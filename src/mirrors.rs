//! `GET /api/mirrorlist/{version}/json`.

use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;
use crate::store::{MirrorList, MirrorStore};

/// Body of a successful mirror-list response.
///
/// `version` is the captured path segment, percent-decoded. It does not
/// select anything: every version gets the same mirrors.
#[derive(Debug, Serialize)]
pub struct MirrorListResponse {
    pub version: String,
    pub mirrors: MirrorList,
}

/// Builds the mirror-list handler around `store`.
pub fn mirror_list(store: Arc<dyn MirrorStore>) -> impl Handler {
    move |req: Request| {
        let store = Arc::clone(&store);
        async move { respond(store.as_ref(), &req).await }
    }
}

async fn respond(store: &dyn MirrorStore, req: &Request) -> Response {
    let version = req.param("version").unwrap_or_default().to_owned();

    let mirrors = match store.load().await {
        Ok(mirrors) => mirrors,
        Err(e) => {
            error!(%version, "mirror list unavailable: {e}");
            return internal_error();
        }
    };

    match serde_json::to_vec(&MirrorListResponse { version, mirrors }) {
        Ok(body) => Response::json(body),
        Err(e) => {
            error!("mirror list serialization failed: {e}");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    Response::builder()
        .status(Status::InternalServerError)
        .text("internal server error")
}
