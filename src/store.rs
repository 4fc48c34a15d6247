//! Mirror list storage.
//!
//! The backing resource is a JSON document owned by someone else:
//!
//! ```json
//! { "mirrors": ["https://a.example/", "https://b.example/"] }
//! ```
//!
//! [`FileMirrorStore`] re-reads and re-parses it on every [`load`](MirrorStore::load),
//! so edits show up on the next request without a restart. A caching store
//! would implement the same trait and be handed to the router instead.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::StoreError;

/// One download location.
pub type MirrorEntry = String;

/// Mirrors in the order the backing resource lists them.
pub type MirrorList = Vec<MirrorEntry>;

/// Source of the current mirror list.
#[async_trait]
pub trait MirrorStore: Send + Sync + 'static {
    async fn load(&self) -> Result<MirrorList, StoreError>;
}

#[derive(Deserialize)]
struct MirrorsDocument {
    mirrors: MirrorList,
}

/// Reads the mirror list from a JSON file on every call.
#[derive(Clone, Debug)]
pub struct FileMirrorStore {
    path: PathBuf,
}

impl FileMirrorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MirrorStore for FileMirrorStore {
    async fn load(&self) -> Result<MirrorList, StoreError> {
        let data = tokio::fs::read(&self.path).await.map_err(|source| {
            StoreError::ResourceUnavailable { path: self.path.clone(), source }
        })?;

        let doc: MirrorsDocument = serde_json::from_slice(&data).map_err(|source| {
            StoreError::MalformedData { path: self.path.clone(), source }
        })?;

        Ok(doc.mirrors)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn store_with(contents: &str) -> (tempfile::TempDir, FileMirrorStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirrors.json");
        fs::write(&path, contents).unwrap();
        (dir, FileMirrorStore::new(path))
    }

    #[tokio::test]
    async fn loads_mirrors_in_stored_order() {
        let (_dir, store) = store_with(
            r#"{"mirrors": ["https://b.example/", "https://a.example/"], "updated": "2024-10-01"}"#,
        );
        let mirrors = store.load().await.unwrap();
        assert_eq!(mirrors, ["https://b.example/", "https://a.example/"]);
    }

    #[tokio::test]
    async fn empty_list_is_not_an_error() {
        let (_dir, store) = store_with(r#"{"mirrors": []}"#);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileMirrorStore::new(dir.path().join("absent.json"));
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StoreError::ResourceUnavailable { .. }), "{err}");
    }

    #[tokio::test]
    async fn bad_shapes_are_malformed() {
        for contents in [
            "not json",
            r#"{"servers": ["https://a.example/"]}"#,
            r#"{"mirrors": "https://a.example/"}"#,
            r#"{"mirrors": [1, 2]}"#,
            r#"["https://a.example/"]"#,
        ] {
            let (_dir, store) = store_with(contents);
            let err = store.load().await.unwrap_err();
            assert!(matches!(err, StoreError::MalformedData { .. }), "{contents}: {err}");
        }
    }

    #[tokio::test]
    async fn every_load_sees_current_contents() {
        let (_dir, store) = store_with(r#"{"mirrors": ["https://a.example/"]}"#);
        assert_eq!(store.load().await.unwrap(), ["https://a.example/"]);

        fs::write(store.path(), r#"{"mirrors": ["https://c.example/"]}"#).unwrap();
        assert_eq!(store.load().await.unwrap(), ["https://c.example/"]);
    }
}
