//! Page fetching: the network collaborator the extraction pipeline depends on.

use std::future::Future;
use std::time::Duration;

use pantry_core::AppConfig;
use reqwest::Client;

/// Status and body of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    /// Response body decoded as text. Empty for non-success statuses.
    pub body: String,
}

/// Fetches a page by URL.
///
/// A received HTTP response of any status is `Ok`; status classification is
/// the pipeline's job. `Err` is reserved for transport failures such as DNS,
/// connection or timeout errors.
pub trait PageFetcher {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, Self::Error>> + Send;
}

/// [`PageFetcher`] backed by a shared `reqwest::Client`.
///
/// Timeouts are enforced by the client; there are no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns the `reqwest` error if the client cannot be constructed
    /// (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        connect_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// See [`HttpFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.fetch_timeout_secs,
            config.fetch_connect_timeout_secs,
            &config.fetch_user_agent,
        )
    }
}

impl PageFetcher for HttpFetcher {
    type Error = reqwest::Error;

    async fn fetch(&self, url: &str) -> Result<FetchedPage, Self::Error> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(FetchedPage {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let body = response.text().await?;
        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}
