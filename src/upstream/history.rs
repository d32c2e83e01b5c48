//! Client for the paginated upstream history endpoint.

use std::time::Duration;

use super::models::{ApiGameResult, HistoryPage};
use crate::error::LivefeedError;

/// Source of finished games, one cursor-addressed page at a time.
pub trait HistorySource {
    /// Fetches one page.
    ///
    /// `cursor` is the key returned with the previous page, or `None` for
    /// the first page. Returns the key of the next page (`None` on the last
    /// page) and the games on this page.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::Upstream`] on transport or decoding failure.
    fn fetch_page(
        &self,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<(Option<String>, Vec<ApiGameResult>), LivefeedError>> + Send;
}

/// HTTP client for `{base}/history`.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    base_url: String,
    http: reqwest::Client,
}

impl HistoryClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::Upstream`] if the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str) -> Result<Self, LivefeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Builds the URL of the page addressed by `cursor`.
    #[must_use]
    pub fn page_url(&self, cursor: Option<&str>) -> String {
        match cursor {
            Some(key) => format!("{}/history?cursor={key}", self.base_url),
            None => format!("{}/history", self.base_url),
        }
    }
}

impl HistorySource for HistoryClient {
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<(Option<String>, Vec<ApiGameResult>), LivefeedError> {
        let url = self.page_url(cursor);
        tracing::debug!(%url, "fetching history page");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(LivefeedError::Upstream(format!(
                "history request returned {}",
                response.status()
            )));
        }

        let page: HistoryPage = response.json().await?;
        let next = page.cursor.as_deref().and_then(cursor_key);
        Ok((next, page.data))
    }
}

/// Extracts the page key from a cursor URL such as
/// `/rps/history?cursor=-R2g2Q`.
///
/// Returns `None` for an empty cursor or one without a key.
#[must_use]
pub fn cursor_key(cursor: &str) -> Option<String> {
    cursor
        .split_once('=')
        .map(|(_, key)| key)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}
