//! Link-preview responses for chat and social crawlers.
//!
//! Crawlers such as Discord's fetch a shared link once and read its Open
//! Graph tags; they do not run the front end's scripts. [`Embed`] classifies
//! each request's client and, when a strategy is registered for that class,
//! answers with it instead of the routed response.
//!
//! ```text
//! request ─► Classifier ─► ClientClass ─► strategies[class]
//!                                            ├─ Some(s) → s.respond(req)
//!                                            └─ None    → next.run(req)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use askama::Template;

use crate::error::Error;
use crate::handler::BoxFuture;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::response::{ContentType, Response};

/// Coarse kind of client behind a request.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ClientClass {
    Crawler,
    Browser,
    Unknown,
}

/// Decides which [`ClientClass`] a request comes from.
pub trait Classifier: Send + Sync + 'static {
    fn classify(&self, req: &Request) -> ClientClass;
}

/// Produces the response for one client class.
pub trait EmbedStrategy: Send + Sync + 'static {
    fn respond(&self, req: &Request) -> Response;
}

// ── User-Agent classification ─────────────────────────────────────────────────

/// Classifies by case-insensitive substring match on `User-Agent`.
///
/// A crawler signature wins over everything else, so
/// `Mozilla/5.0 (compatible; Discordbot/2.0;)` is a crawler.
#[derive(Clone, Debug)]
pub struct UserAgentClassifier {
    // Stored lowercased.
    crawler_signatures: Vec<String>,
}

impl UserAgentClassifier {
    pub fn new() -> Self {
        Self { crawler_signatures: Vec::new() }
    }

    pub fn with_crawler(mut self, signature: &str) -> Self {
        self.crawler_signatures.push(signature.to_lowercase());
        self
    }
}

impl Default for UserAgentClassifier {
    fn default() -> Self {
        Self::new().with_crawler("discordbot")
    }
}

impl Classifier for UserAgentClassifier {
    fn classify(&self, req: &Request) -> ClientClass {
        let Some(agent) = req.header("user-agent") else {
            return ClientClass::Unknown;
        };
        let agent = agent.to_lowercase();

        if self.crawler_signatures.iter().any(|sig| agent.contains(sig.as_str())) {
            ClientClass::Crawler
        } else if agent.starts_with("mozilla/") {
            ClientClass::Browser
        } else {
            ClientClass::Unknown
        }
    }
}

// ── Link preview document ─────────────────────────────────────────────────────

/// The metadata a link preview shows.
#[derive(Clone, Debug)]
pub struct PreviewMeta {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub site_type: String,
    pub site_name: String,
}

impl PreviewMeta {
    pub fn blazium() -> Self {
        Self {
            title: "Blazium Engine Mirror List".to_owned(),
            description: "Download mirrors for Blazium Engine releases, served as a versioned JSON API."
                .to_owned(),
            image: "https://blazium.app/static/assets/logo.png".to_owned(),
            url: "https://mirrorlist.blazium.app/".to_owned(),
            site_type: "website".to_owned(),
            site_name: "Blazium Engine".to_owned(),
        }
    }
}

#[derive(Template)]
#[template(path = "link_preview.html")]
struct LinkPreviewPage<'a> {
    meta: &'a PreviewMeta,
}

/// Answers with a fixed HTML document carrying Open Graph and Twitter Card
/// tags. Rendered once at construction.
#[derive(Clone, Debug)]
pub struct LinkPreview {
    html: Arc<[u8]>,
}

impl LinkPreview {
    pub fn new(meta: &PreviewMeta) -> Result<Self, Error> {
        let html = LinkPreviewPage { meta }.render()?;
        Ok(Self { html: html.into_bytes().into() })
    }
}

impl EmbedStrategy for LinkPreview {
    fn respond(&self, _req: &Request) -> Response {
        Response::builder()
            .header("cache-control", "max-age=3600")
            .bytes(ContentType::Html, self.html.to_vec())
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Strategy lookup keyed by client class.
///
/// Classes without a strategy pass through untouched: no headers, no logging.
pub struct Embed {
    classifier: Arc<dyn Classifier>,
    strategies: HashMap<ClientClass, Arc<dyn EmbedStrategy>>,
}

impl Embed {
    pub fn new(classifier: impl Classifier) -> Self {
        Self { classifier: Arc::new(classifier), strategies: HashMap::new() }
    }

    pub fn with_strategy(mut self, class: ClientClass, strategy: impl EmbedStrategy) -> Self {
        self.strategies.insert(class, Arc::new(strategy));
        self
    }

    /// Discordbot gets the Blazium link preview; everyone else passes through.
    pub fn discord() -> Result<Self, Error> {
        let preview = LinkPreview::new(&PreviewMeta::blazium())?;
        Ok(Self::new(UserAgentClassifier::default())
            .with_strategy(ClientClass::Crawler, preview))
    }
}

impl Middleware for Embed {
    fn handle(&self, req: Request, next: Next) -> BoxFuture {
        let class = self.classifier.classify(&req);
        match self.strategies.get(&class) {
            Some(strategy) => {
                let res = strategy.respond(&req);
                Box::pin(async move { res })
            }
            None => next.run(req),
        }
    }
}
