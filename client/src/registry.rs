//! The marketplace registry.
//!
//! The registry indexes capability servers, ranks them and composes remixes
//! out of them. This client is a passthrough: filtering, ranking and remix
//! resolution all happen registry-side.
use crate::endpoint::{endpoint, require};
use crate::protocol::registry::{FunctionalityDraft, RatingSubmission};
use crate::protocol::server::SCORE_RANGE;
use crate::protocol::{
    CapabilityMatch, CapabilityRef, FunctionalityRequest, Invalid, Remix, Review, Server,
};
use crate::{Result, Transport, fetch, submit};

use std::env;
use std::fmt;
use std::sync::Arc;

/// The address of the public registry.
pub const DEFAULT_URL: &str = "https://api.mcp.net";

/// The environment variable read by [`Registry::from_env`].
pub const URL_VARIABLE: &str = "AGORA_REGISTRY_URL";

#[derive(Clone)]
pub struct Registry {
    transport: Arc<dyn Transport + Send + Sync>,
    url: String,
}

impl Registry {
    /// Targets the public registry.
    pub fn new(transport: impl Transport + Send + Sync + 'static) -> Self {
        Self::with_url(transport, DEFAULT_URL)
    }

    /// Targets the registry at `url`, or the public one if `url` is empty.
    pub fn with_url(transport: impl Transport + Send + Sync + 'static, url: impl Into<String>) -> Self {
        Self {
            transport: Arc::new(transport),
            url: resolve(Some(url.into())),
        }
    }

    /// Targets the registry named by [`URL_VARIABLE`], if set.
    pub fn from_env(transport: impl Transport + Send + Sync + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            url: resolve(env::var(URL_VARIABLE).ok()),
        }
    }

    #[cfg(feature = "http")]
    pub fn http() -> Self {
        Self::from_env(crate::Http::new())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn search_servers(&self, query: &ServerQuery) -> Result<Vec<Server>> {
        let mut url = endpoint(&self.url, &["servers"])?;

        {
            let mut pairs = url.query_pairs_mut();

            pairs
                .append_pair("page", &query.page.to_string())
                .append_pair("pageSize", &query.page_size.to_string());

            if let Some(text) = query.text.as_deref().filter(|text| !text.is_empty()) {
                pairs.append_pair("query", text);
            }

            if let Some(min_rating) = query.min_rating {
                pairs.append_pair("minRating", &min_rating.to_string());
            }

            if !query.tags.is_empty() {
                pairs.append_pair("tags", &query.tags.join(","));
            }
        }

        fetch(&*self.transport, url).await
    }

    pub async fn server(&self, server_id: &str) -> Result<Server> {
        require("server_id", server_id)?;

        fetch(&*self.transport, endpoint(&self.url, &["servers", server_id])?).await
    }

    /// Submits a server for indexing.
    ///
    /// The registry assigns the id, the initial rating and the protocol
    /// version; the returned server is the authoritative one.
    pub async fn submit_server(&self, server: &Server) -> Result<Server> {
        submit(&*self.transport, endpoint(&self.url, &["servers"])?, server).await
    }

    /// Rates a server with a score between 0 and 5.
    pub async fn rate(&self, server_id: &str, score: f64, review: Option<&str>) -> Result<Review> {
        require("server_id", server_id)?;

        if !SCORE_RANGE.contains(&score) {
            return Err(Invalid::new("score", "must be between 0 and 5").into());
        }

        submit(
            &*self.transport,
            endpoint(&self.url, &["servers", server_id, "ratings"])?,
            &RatingSubmission {
                server_id: server_id.to_owned(),
                score,
                text: review.map(str::to_owned),
            },
        )
        .await
    }

    /// Searches capabilities across every indexed server.
    pub async fn search_capabilities(&self, query: &CapabilityQuery) -> Result<Vec<CapabilityMatch>> {
        require("query", &query.text)?;

        let mut url = endpoint(&self.url, &["capabilities", "search"])?;

        {
            let mut pairs = url.query_pairs_mut();

            pairs
                .append_pair("query", &query.text)
                .append_pair("page", &query.page.to_string())
                .append_pair("pageSize", &query.page_size.to_string());

            if let Some(min_rating) = query.min_rating {
                pairs.append_pair("minRating", &min_rating.to_string());
            }
        }

        fetch(&*self.transport, url).await
    }

    /// Composes a remix out of capabilities from other servers.
    ///
    /// The references are sent as given: the registry deduplicates them and
    /// decides the order of the resulting capabilities.
    ///
    /// Besides the registry's own rules (a name and at least one reference),
    /// references with an empty server or capability id are rejected locally,
    /// since the registry could never resolve them.
    pub async fn create_remix<R: Into<CapabilityRef>>(
        &self,
        name: &str,
        description: &str,
        capabilities: impl IntoIterator<Item = R>,
    ) -> Result<Server> {
        self.submit_remix(&Remix::new(name, description).capabilities(capabilities))
            .await
    }

    /// Submits a prebuilt remix, checked with [`Remix::validate`] first.
    pub async fn submit_remix(&self, remix: &Remix) -> Result<Server> {
        remix.validate()?;

        let server: Server = submit(&*self.transport, endpoint(&self.url, &["remixes"])?, remix).await?;

        if !server.is_remix() {
            log::warn!("registry returned remix {:?} without the remix marker", server.id);
        }

        Ok(server)
    }

    /// Files a request for functionality the marketplace lacks.
    pub async fn request_functionality(
        &self,
        description: &str,
        use_case: &str,
    ) -> Result<FunctionalityRequest> {
        require("description", description)?;

        submit(
            &*self.transport,
            endpoint(&self.url, &["requests"])?,
            &FunctionalityDraft {
                description: description.to_owned(),
                use_case: use_case.to_owned(),
            },
        )
        .await
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Picks the configured registry URL, falling back to [`DEFAULT_URL`] when it
/// is unset or blank.
fn resolve(url: Option<String>) -> String {
    url.map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_URL.to_owned())
}

/// Filters for [`Registry::search_servers`]. Unset filters are not sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerQuery {
    pub text: Option<String>,
    pub tags: Vec<String>,
    pub min_rating: Option<f64>,
    pub page: u32,
    pub page_size: u32,
}

impl ServerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tags<T: Into<String>>(mut self, tags: impl IntoIterator<Item = T>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

impl Default for ServerQuery {
    fn default() -> Self {
        Self {
            text: None,
            tags: Vec::new(),
            min_rating: None,
            page: 1,
            page_size: 20,
        }
    }
}

/// Filters for [`Registry::search_capabilities`]. The text is mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityQuery {
    pub text: String,
    pub min_rating: Option<f64>,
    pub page: u32,
    pub page_size: u32,
}

impl CapabilityQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            min_rating: None,
            page: 1,
            page_size: 20,
        }
    }

    pub fn min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
