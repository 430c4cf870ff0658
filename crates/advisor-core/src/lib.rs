//! Investment analysis core
//!
//! This crate turns a company name, a ticker symbol and an analysis period
//! into an investment strategy report. It provides:
//!
//! - News retrieval with relevance filtering (`news`)
//! - Historical price retrieval via Yahoo Finance (`prices`)
//! - A two-stage LLM analysis pipeline: price-trend summary, then a strategy
//!   grounded on that summary and the filtered news (`pipeline`)
//! - Company-name-to-ticker resolution (`ticker`)
//! - Chart data preparation for the presentation layer (`chart`)
//! - Strategy delivery by email (`mail`)
//!
//! Every external collaborator sits behind a trait seam ([`news::NewsSearch`],
//! [`prices::PriceSource`], `advisor_llm::TextGenerator`) and receives its
//! credentials through [`AdvisorConfig`], so the whole pipeline can be
//! exercised with test doubles.
//!
//! # Example
//!
//! ```rust,ignore
//! use advisor_core::{AdvisorConfig, AnalysisPipeline};
//! use advisor_llm::{OpenAiProvider, TextGenerator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(AdvisorConfig::builder().with_env_keys().build()?);
//!     let generator: Arc<dyn TextGenerator> =
//!         Arc::new(OpenAiProvider::new(config.openai_api_key.clone())?);
//!
//!     let pipeline = AnalysisPipeline::new(Arc::clone(&config), generator)?;
//!     let report = pipeline.run("Tesla", "TSLA", "30").await;
//!     println!("{}", report.strategy_text);
//!
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod error;
pub mod mail;
pub mod news;
pub mod pipeline;
pub mod prices;
pub mod prompts;
pub mod ticker;

// Re-export main types for convenience
pub use chart::ChartData;
pub use config::{AdvisorConfig, SmtpConfig};
pub use error::{AdvisorError, FailureKind, Result};
pub use mail::StrategyMailer;
pub use news::{Article, ArticleFilter, NewsApiClient, NewsSearch, RelevanceQuery};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use prices::{Ohlcv, PriceSeries, PriceSource, YahooPriceSource};
pub use ticker::TickerResolver;
