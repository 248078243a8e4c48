//! Faculty website fetching.
//!
//! The enrichment pass only sees the [`PageFetcher`] trait, so tests can
//! substitute canned pages for the network. [`HttpFetcher`] is the real
//! implementation on top of `reqwest`; [`Pacer`] spaces successive fetches.

pub mod http;
pub mod pacing;

use async_trait::async_trait;
use url::Url;

use facultydir_shared::ExtractionFailure;

pub use http::HttpFetcher;
pub use pacing::Pacer;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested.
    pub url: Url,
    /// URL after redirects; relative links resolve against this.
    pub final_url: Url,
    pub status: u16,
    pub body: String,
}

/// Source of page markup for the enrichment pass.
///
/// Failures are per-record: they are reported as [`ExtractionFailure`] and
/// never abort the batch.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ExtractionFailure>;
}
