use std::io::Read;
use std::time::Duration;

use tracing::warn;

/// Boxed cause of a failed fetch, whatever the transport.
pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Source of imagery bytes for a request URL.
pub trait ImageFetcher {
    /// Start a GET and hand back the response body as a reader.
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>, FetchError>;
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for the imagery API.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read>, FetchError> {
        let response = self.client.get(url).send()?;
        // Error statuses still carry a body (usually a placeholder image); keep it.
        if !response.status().is_success() {
            warn!("{} returned {}", url, response.status());
        }
        Ok(Box::new(response))
    }
}
