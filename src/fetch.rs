//! Text fetching abstraction
//!
//! This module provides a trait-based abstraction for obtaining SVG markup
//! text from a location. This keeps the load pipeline agnostic about how
//! text is retrieved, enabling:
//!
//! - Mocking for tests
//! - Offline modes
//! - Custom transports (caches, embedded assets)
//!
//! # Example
//!
//! ```rust,ignore
//! use svgtex::fetch::{HttpTextFetcher, TextFetcher};
//!
//! let fetcher = HttpTextFetcher::new();
//! let markup = fetcher.fetch_text("https://example.com/icon.svg").await?;
//! println!("Got {} bytes of markup", markup.len());
//! ```

use crate::error::FetchError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Default User-Agent string used by HTTP fetches
pub const DEFAULT_USER_AGENT: &str = "svgtex/0.1";

/// Default Accept-Language header value
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Trait for fetching SVG text from a location
///
/// URLs can be:
/// - `http://` or `https://` - fetch over network
/// - `file://` - read from filesystem
/// - anything else - treated as a local filesystem path
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the load pipeline shares the
/// fetcher across a spawned future.
#[async_trait]
pub trait TextFetcher: Send + Sync {
  /// Fetch the text at the given URL.
  ///
  /// Returns the markup as a UTF-8 string, or a [`FetchError`] describing
  /// the transport failure.
  async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

// Allow Arc<dyn TextFetcher> to be used as TextFetcher
#[async_trait]
impl<T: TextFetcher + ?Sized> TextFetcher for Arc<T> {
  async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
    (**self).fetch_text(url).await
  }
}

/// Default text fetcher
///
/// Fetches over HTTP/HTTPS with a configurable timeout, User-Agent and
/// response size cap, following redirects. `file://` URLs and bare paths
/// are read from the filesystem. Network calls run on the blocking pool so
/// the async caller is never blocked.
///
/// # Example
///
/// ```rust,ignore
/// use svgtex::fetch::HttpTextFetcher;
/// use std::time::Duration;
///
/// let fetcher = HttpTextFetcher::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("MyApp/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTextFetcher {
  timeout: Duration,
  user_agent: String,
  accept_language: String,
  max_size: usize,
}

impl HttpTextFetcher {
  /// Create a new HttpTextFetcher with default settings
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the request timeout
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// Set the User-Agent header
  pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
    self.user_agent = user_agent.into();
    self
  }

  /// Set the Accept-Language header
  pub fn with_accept_language(mut self, accept_language: impl Into<String>) -> Self {
    self.accept_language = accept_language.into();
    self
  }

  /// Set the maximum response size in bytes
  pub fn with_max_size(mut self, max_size: usize) -> Self {
    self.max_size = max_size;
    self
  }

  /// Fetch from an HTTP/HTTPS URL. Blocking; runs on the blocking pool.
  fn fetch_http(&self, url: &str) -> Result<String, FetchError> {
    let config = ureq::Agent::config_builder()
      .timeout_global(Some(self.timeout))
      .http_status_as_error(false)
      .build();
    let agent: ureq::Agent = config.into();

    let mut response = agent
      .get(url)
      .header("User-Agent", &self.user_agent)
      .header("Accept-Language", &self.accept_language)
      .call()
      .map_err(|e| FetchError::Transport {
        url: url.to_string(),
        reason: e.to_string(),
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    response
      .body_mut()
      .with_config()
      .limit(self.max_size as u64)
      .read_to_string()
      .map_err(|e| FetchError::Transport {
        url: url.to_string(),
        reason: e.to_string(),
      })
  }
}

impl Default for HttpTextFetcher {
  fn default() -> Self {
    Self {
      timeout: Duration::from_secs(30),
      user_agent: DEFAULT_USER_AGENT.to_string(),
      accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
      max_size: 16 * 1024 * 1024,
    }
  }
}

#[async_trait]
impl TextFetcher for HttpTextFetcher {
  async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
    if url.starts_with("http://") || url.starts_with("https://") {
      let fetcher = self.clone();
      let request_url = url.to_string();
      match tokio::task::spawn_blocking(move || fetcher.fetch_http(&request_url)).await {
        Ok(result) => result,
        Err(e) => Err(FetchError::Transport {
          url: url.to_string(),
          reason: format!("fetch task failed: {e}"),
        }),
      }
    } else {
      let path = url.strip_prefix("file://").unwrap_or(url);
      fetch_file(path).await
    }
  }
}

/// Read a local file as UTF-8 text
async fn fetch_file(path: &str) -> Result<String, FetchError> {
  tokio::fs::read_to_string(path)
    .await
    .map_err(|e| FetchError::File {
      path: path.to_string(),
      reason: e.to_string(),
    })
}
