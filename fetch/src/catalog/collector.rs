//! Catalog collection from the published download listing.
//!
//! Provides a trait-based abstraction over fetching the listing page so
//! that collection can be tested without network access, and the
//! [`Collector`] that turns a fetched page into a [`Catalog`].

use super::Catalog;
use super::parser::parse_catalog;
use crate::transport::{FetchOptions, UnexpectedStatus, http_agent};
use log::{debug, warn};
use std::io::Read;

/// Listing consulted when no source location is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://golang.google.cn/dl/";

/// Boxed underlying cause of a collection failure.
pub type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Errors arising from fetching the listing.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The listing could not be fetched or did not answer with 200 OK.
    #[error("URL \"{url}\" is unreachable")]
    Unreachable {
        /// The location that was requested.
        url: String,
        /// The transport or body-read failure, when there was one.
        #[source]
        source: Option<Cause>,
    },

    /// The caller cancelled the fetch.
    #[error("fetching \"{url}\" was cancelled")]
    Cancelled {
        /// The location that was being requested.
        url: String,
    },
}

impl CatalogError {
    fn unreachable(url: &str, source: impl Into<Cause>) -> Self {
        Self::Unreachable {
            url: url.to_owned(),
            source: Some(source.into()),
        }
    }
}

/// Trait for retrieving the raw listing document.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource {
    /// Fetch the document at `url` and return its body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unreachable`] on transport failure or a
    /// non-200 status.
    fn fetch_document(&self, url: &str) -> Result<String, CatalogError>;
}

/// HTTP-based listing source using `ureq`.
pub struct HttpCatalogSource {
    agent: ureq::Agent,
    options: FetchOptions,
}

impl HttpCatalogSource {
    /// Create a source honouring the given deadline and cancellation token.
    #[must_use]
    pub fn new(options: FetchOptions) -> Self {
        Self {
            agent: http_agent(&options),
            options,
        }
    }
}

impl Default for HttpCatalogSource {
    fn default() -> Self {
        Self::new(FetchOptions::default())
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch_document(&self, url: &str) -> Result<String, CatalogError> {
        if self.options.is_cancelled() {
            return Err(CatalogError::Cancelled {
                url: url.to_owned(),
            });
        }
        debug!("GET {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| CatalogError::unreachable(url, e))?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(CatalogError::unreachable(url, UnexpectedStatus(status)));
        }
        let mut bytes = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| CatalogError::unreachable(url, e))?;
        // Invalid UTF-8 is replaced, never rejected.
        let body = String::from_utf8_lossy(&bytes).into_owned();
        if self.options.is_cancelled() {
            return Err(CatalogError::Cancelled {
                url: url.to_owned(),
            });
        }
        Ok(body)
    }
}

/// Collects the version catalog from a listing source.
///
/// # Examples
///
/// ```no_run
/// use envm_fetch::catalog::collector::Collector;
///
/// let collector: Collector = Collector::default();
/// let catalog = collector.fetch_catalog("")?;
/// for version in catalog.stable_versions() {
///     println!("{}", version.name);
/// }
/// # Ok::<(), envm_fetch::catalog::collector::CatalogError>(())
/// ```
pub struct Collector<S = HttpCatalogSource> {
    source: S,
}

impl<S: CatalogSource> Collector<S> {
    /// Create a collector over the given source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch and parse the listing at `source_url`.
    ///
    /// An empty `source_url` selects [`DEFAULT_SOURCE_URL`]. Only fetch
    /// failures are errors; a page that parses to nothing yields an empty
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the listing cannot be fetched.
    pub fn fetch_catalog(&self, source_url: &str) -> Result<Catalog, CatalogError> {
        let url = effective_source(source_url);
        let body = self.source.fetch_document(url)?;
        let catalog = parse_catalog(&body, url);
        if catalog.is_empty() {
            warn!("listing at {url} contained no recognisable versions");
        }
        Ok(catalog)
    }
}

impl Default for Collector<HttpCatalogSource> {
    fn default() -> Self {
        Self::new(HttpCatalogSource::default())
    }
}

/// Return `source_url`, or the default listing when it is empty.
#[must_use]
pub fn effective_source(source_url: &str) -> &str {
    if source_url.trim().is_empty() {
        DEFAULT_SOURCE_URL
    } else {
        source_url
    }
}
