//! `reqwest`-backed [`PageFetcher`].

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use facultydir_shared::{ExtractionFailure, FacultyDirError, FetchConfig, Result};

use crate::{FetchedPage, PageFetcher};

/// User-Agent string for website requests.
const USER_AGENT: &str = concat!("facultydir/", env!("CARGO_PKG_VERSION"));

/// Maximum redirects followed per request.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// Fetches faculty websites over HTTP(S).
pub struct HttpFetcher {
    client: Client,
    /// Allow localhost/private IPs (local mirrors, mock servers).
    allow_private_hosts: bool,
}

impl HttpFetcher {
    /// Build a fetcher from the `[fetch]` config section.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FacultyDirError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            allow_private_hosts: config.allow_private_hosts,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> std::result::Result<FetchedPage, ExtractionFailure> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExtractionFailure::InvalidUrl(format!(
                "{url}: unsupported scheme '{}'",
                url.scheme()
            )));
        }

        if !self.allow_private_hosts && is_private_target(url) {
            warn!(%url, "refusing to fetch private or loopback host");
            return Err(ExtractionFailure::Fetch(format!("{url}: private host blocked")));
        }

        debug!(%url, "fetching faculty website");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ExtractionFailure::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionFailure::Fetch(format!("{url}: HTTP {status}")));
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionFailure::Fetch(format!("{url}: body read failed: {e}")))?;

        debug!(%url, %final_url, bytes = body.len(), "fetched faculty website");

        Ok(FetchedPage {
            url: url.clone(),
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Private host protection
// ---------------------------------------------------------------------------

/// Whether a URL points at loopback, private or otherwise internal hosts.
fn is_private_target(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Ipv4(v4)) => is_private_ip(&IpAddr::V4(v4)),
        Some(url::Host::Ipv6(v6)) => is_private_ip(&IpAddr::V6(v6)),
        Some(url::Host::Domain(host)) => {
            host == "localhost" || host.ends_with(".local") || host.ends_with(".internal")
        }
        None => true,
    }
}

/// Check if an IP is in a private/reserved range.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                // 100.64.0.0/10 (Carrier-grade NAT)
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64)
        }
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unspecified(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn local_fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetchConfig {
            timeout_secs: 5,
            allow_private_hosts: true,
        })
        .expect("build fetcher")
    }

    #[test]
    fn private_targets() {
        let check = |s: &str| is_private_target(&Url::parse(s).unwrap());
        assert!(check("http://localhost/"));
        assert!(check("http://127.0.0.1:8080/"));
        assert!(check("http://10.1.2.3/"));
        assert!(check("http://192.168.0.10/"));
        assert!(check("http://[::1]/"));
        assert!(check("http://printer.local/"));
        assert!(!check("https://example.edu/people/jdoe/"));
        assert!(!check("http://8.8.8.8/"));
    }

    #[tokio::test]
    async fn fetches_page_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/people/jdoe/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>Hello</p></body></html>")
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/people/jdoe/", server.uri())).unwrap();
        let page = local_fetcher().fetch(&url).await.expect("fetch page");
        assert_eq!(page.status, 200);
        assert!(page.body.contains("Hello"));
        assert_eq!(page.final_url, url);
    }

    #[tokio::test]
    async fn http_error_is_per_record_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/gone", server.uri())).unwrap();
        let err = local_fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::Fetch(_)));
        assert!(err.reason().contains("404"));
    }

    #[tokio::test]
    async fn private_hosts_blocked_by_default() {
        let fetcher = HttpFetcher::new(&FetchConfig::default()).unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(err.reason().contains("private host blocked"));
    }

    #[tokio::test]
    async fn non_http_scheme_is_invalid() {
        let url = Url::parse("ftp://example.edu/cv.pdf").unwrap();
        let err = local_fetcher().fetch(&url).await.unwrap_err();
        assert!(matches!(err, ExtractionFailure::InvalidUrl(_)));
    }
}
