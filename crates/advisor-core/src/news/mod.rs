//! News retrieval and relevance filtering

pub mod client;
pub mod filter;
pub mod query;

pub use client::{NewsApiClient, NewsSearch, RawArticle};
pub use filter::{Article, ArticleFilter};
pub use query::RelevanceQuery;
