//! Runtime configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_MIRRORS_PATH: &str = "data/mirrors.json";
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Where to listen and where the two external resources live.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind: SocketAddr,
    pub mirrors_path: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    ///
    /// - `MIRRORLIST_BIND`: socket address (default `0.0.0.0:8080`)
    /// - `MIRRORLIST_DATA`: mirror list JSON (default `data/mirrors.json`)
    /// - `MIRRORLIST_STATIC`: front-end asset root (default `static`)
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let bind_str = get("MIRRORLIST_BIND").unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind = parse_bind(&bind_str)?;

        Ok(Self {
            bind,
            mirrors_path: get("MIRRORLIST_DATA").unwrap_or_else(|| DEFAULT_MIRRORS_PATH.to_owned()).into(),
            static_dir: get("MIRRORLIST_STATIC").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_owned()).into(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            mirrors_path: DEFAULT_MIRRORS_PATH.into(),
            static_dir: DEFAULT_STATIC_DIR.into(),
        }
    }
}

pub fn parse_bind(addr: &str) -> Result<SocketAddr, Error> {
    addr.parse().map_err(|_| Error::InvalidBind(addr.to_owned()))
}
