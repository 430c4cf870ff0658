//! News relevance filtering

use crate::error::{AdvisorError, Result};
use crate::news::client::NewsSearch;
use crate::news::query::RelevanceQuery;
use std::sync::Arc;
use tracing::debug;

/// Placeholder content when the provider supplied neither a description nor
/// body text.
const EMPTY_CONTENT_PLACEHOLDER: &str = "내용 없음";

/// A filtered news article, immutable once constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Headline
    pub title: String,
    /// Resolved content (description, else body text, else placeholder)
    pub content: String,
    /// Article URL
    pub link: String,
}

/// Produces a filtered, ranked list of candidate articles from one search
/// call.
///
/// The provider query is already title-restricted to the keyword set; the
/// post-filter re-checks every keyword (subject and auxiliary) against
/// title+content. The resulting double-filter is intentional behavior and
/// is preserved as-is.
pub struct ArticleFilter {
    source: Arc<dyn NewsSearch>,
}

impl ArticleFilter {
    /// Create a filter over the given search provider
    pub fn new(source: Arc<dyn NewsSearch>) -> Self {
        Self { source }
    }

    /// Fetch and filter up to `max_articles` relevant articles.
    ///
    /// Provider sort order (most-recent-first) is preserved. Fails with
    /// [`AdvisorError::NoResults`] when the search succeeded but nothing
    /// passed the relevance filter, which is distinct from a provider
    /// failure.
    pub async fn filter(&self, subject: &str, max_articles: usize) -> Result<Vec<Article>> {
        if subject.trim().is_empty() {
            return Err(AdvisorError::Validation(
                "search subject must not be empty".to_string(),
            ));
        }
        if max_articles == 0 {
            return Err(AdvisorError::Validation(
                "max_articles must be greater than 0".to_string(),
            ));
        }

        let query = RelevanceQuery::new(subject);
        let raw = self.source.search(&query).await?;

        let articles: Vec<Article> = raw
            .into_iter()
            .take(max_articles)
            .filter_map(|record| {
                let content = record
                    .description
                    .filter(|text| !text.trim().is_empty())
                    .or_else(|| record.content.filter(|text| !text.trim().is_empty()))
                    .unwrap_or_else(|| EMPTY_CONTENT_PLACEHOLDER.to_string());

                let haystack = format!("{}{}", record.title, content);
                query.matches(&haystack).then_some(Article {
                    title: record.title,
                    content,
                    link: record.url,
                })
            })
            .collect();

        debug!(subject, count = articles.len(), "Filtered articles");

        if articles.is_empty() {
            return Err(AdvisorError::NoResults(subject.to_string()));
        }

        Ok(articles)
    }
}
