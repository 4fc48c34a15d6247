//! Incoming HTTP request type.

use std::borrow::Cow;
use std::collections::HashMap;

use percent_encoding::percent_decode_str;

use crate::method::Method;

/// An incoming HTTP request.
///
/// Nothing this service routes reads a body, so the body is never collected.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(parts: &http::request::Parts) -> Self {
        // Non-UTF-8 header values are dropped.
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        Self {
            method: Method::from(&parts.method),
            path: parts.uri.path().to_owned(),
            headers,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &Method { &self.method }

    /// The path as sent, percent-escapes intact.
    pub fn path(&self) -> &str { &self.path }

    /// The path with percent-escapes decoded, or `None` if that is not UTF-8.
    pub fn decoded_path(&self) -> Option<String> {
        percent_decode(&self.path)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/api/mirrorlist/{version}/json`, `req.param("version")` on
    /// `/api/mirrorlist/v%C3%A9/json` returns `Some("vé")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

/// Decodes `%XX` escapes. `None` when the decoded bytes are not UTF-8.
pub(crate) fn percent_decode(raw: &str) -> Option<String> {
    percent_decode_str(raw).decode_utf8().ok().map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(builder: http::request::Builder) -> Request {
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        Request::new(&parts)
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request(http::Request::get("/").header("User-Agent", "curl/8.0"));
        assert_eq!(req.header("user-agent"), Some("curl/8.0"));
        assert_eq!(req.header("USER-AGENT"), Some("curl/8.0"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn path_excludes_query_string() {
        let req = request(http::Request::get("/static/app.js?v=3"));
        assert_eq!(req.path(), "/static/app.js");
    }

    #[test]
    fn decoded_path_resolves_escapes() {
        let req = request(http::Request::get("/static/my%20file.css"));
        assert_eq!(req.path(), "/static/my%20file.css");
        assert_eq!(req.decoded_path().as_deref(), Some("/static/my file.css"));
    }

    #[test]
    fn decoding_rejects_invalid_utf8() {
        assert_eq!(percent_decode("v%C3%A9").as_deref(), Some("vé"));
        assert_eq!(percent_decode("v%FF"), None);
        assert_eq!(percent_decode("%2e%2e").as_deref(), Some(".."));
    }
}
