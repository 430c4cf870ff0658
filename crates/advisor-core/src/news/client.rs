//! NewsAPI search client

use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, Result};
use crate::news::query::RelevanceQuery;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// A raw news record as returned by the search provider
#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    /// Headline
    #[serde(default)]
    pub title: String,
    /// Short description, if the provider supplied one
    pub description: Option<String>,
    /// Body text excerpt, if the provider supplied one
    pub content: Option<String>,
    /// Article URL
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    articles: Option<Vec<RawArticle>>,
}

/// Trait seam over the news search provider
#[async_trait]
pub trait NewsSearch: Send + Sync {
    /// Issue one title-restricted, recency-sorted search for the query's
    /// keyword set and return the raw records in provider order.
    async fn search(&self, query: &RelevanceQuery) -> Result<Vec<RawArticle>>;
}

/// NewsAPI client with rate limiting
///
/// One outbound request per search, no retry: a failed call surfaces
/// directly to the caller.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    api_base: String,
    rate_limiter: SharedRateLimiter,
}

impl NewsApiClient {
    /// Create a new client from the injected configuration
    pub fn new(config: &AdvisorConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        let quota = Quota::per_minute(
            NonZeroU32::new(config.news_rate_limit).unwrap_or(NonZeroU32::new(60).unwrap()),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            client,
            api_key: config.news_api_key.clone(),
            api_base: config.news_api_base.clone(),
            rate_limiter,
        })
    }
}

#[async_trait]
impl NewsSearch for NewsApiClient {
    async fn search(&self, query: &RelevanceQuery) -> Result<Vec<RawArticle>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/everything", self.api_base);
        debug!(subject = query.subject(), "Searching news");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("qInTitle", query.provider_query().as_str()),
                ("sortBy", "publishedAt"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AdvisorError::Provider(format!("News request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::Provider(format!(
                "News API error {status}: {body}"
            )));
        }

        let parsed: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::Provider(format!("Failed to parse news response: {e}")))?;

        if parsed.status != "ok" {
            return Err(AdvisorError::Provider(format!(
                "News API returned status '{}'",
                parsed.status
            )));
        }

        parsed.articles.ok_or_else(|| {
            AdvisorError::Provider("News response carried no articles collection".to_string())
        })
    }
}
