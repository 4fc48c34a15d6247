//! HTTP method as a typed enum.
//!
//! Covers the RFC 9110 standard methods. Anything else (`PURGE`, WebDAV verbs)
//! is carried as [`Method::Other`] so it still runs through the middleware
//! chain; the router answers it with `405 Method Not Allowed`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An HTTP method.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
    /// Extension method, kept verbatim.
    Other(String),
}

impl Method {
    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connect  => "CONNECT",
            Self::Delete   => "DELETE",
            Self::Get      => "GET",
            Self::Head     => "HEAD",
            Self::Options  => "OPTIONS",
            Self::Patch    => "PATCH",
            Self::Post     => "POST",
            Self::Put      => "PUT",
            Self::Trace    => "TRACE",
            Self::Other(m) => m,
        }
    }
}

/// Parses a method string. Case-sensitive per RFC 9110 §9.1, so `"get"` is
/// an extension method, not `GET`.
impl FromStr for Method {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CONNECT" => Self::Connect,
            "DELETE"  => Self::Delete,
            "GET"     => Self::Get,
            "HEAD"    => Self::Head,
            "OPTIONS" => Self::Options,
            "PATCH"   => Self::Patch,
            "POST"    => Self::Post,
            "PUT"     => Self::Put,
            "TRACE"   => Self::Trace,
            other     => Self::Other(other.to_owned()),
        })
    }
}

impl From<&http::Method> for Method {
    fn from(m: &http::Method) -> Self {
        let Ok(method) = m.as_str().parse::<Self>();
        method
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
