//! The multi-stage analysis pipeline
//!
//! One run performs: news retrieval and price retrieval (independent, joined
//! concurrently), a streaming price-trend summary, then a streaming strategy
//! generation grounded on the completed summary and the filtered news. The
//! pipeline never lets an error escape its boundary: every failure is
//! converted into a structurally complete [`AnalysisReport`] carrying a
//! typed [`FailureKind`].

use crate::chart::ChartData;
use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, FailureKind, Result};
use crate::news::{Article, ArticleFilter, NewsApiClient, NewsSearch};
use crate::prices::{PriceSource, YahooPriceSource};
use crate::prompts;
use advisor_llm::{CompletionRequest, TextGenerator};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed strategy text of the uniform failure result
const STRATEGY_UNAVAILABLE: &str = "투자 전략을 생성할 수 없습니다.";

/// The assembled result of one pipeline run.
///
/// Always structurally complete: on failure the four presentation fields
/// hold the uniform failure placeholders and `failure` carries the kind.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Formatted news block with the article-count marker, or the failure
    /// description
    pub news_text: String,
    /// Price-trend summary with its header, or the failure description
    pub price_summary_text: String,
    /// Chart handle built from the close column; `None` on failure
    pub chart: Option<ChartData>,
    /// Generated strategy, or the fixed "cannot generate" message
    pub strategy_text: String,
    /// Failure classification; `None` on success
    pub failure: Option<FailureKind>,
}

impl AnalysisReport {
    /// The uniform four-field failure result
    fn failed(err: &AdvisorError) -> Self {
        let description = format!("오류 발생: {err}");
        Self {
            news_text: description.clone(),
            price_summary_text: description,
            chart: None,
            strategy_text: STRATEGY_UNAVAILABLE.to_string(),
            failure: Some(err.kind()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Orchestrates one analysis run end to end.
///
/// Stateless across runs: every invocation re-fetches and re-filters from
/// scratch, and nothing is cached or shared between runs.
pub struct AnalysisPipeline {
    filter: ArticleFilter,
    prices: Arc<dyn PriceSource>,
    generator: Arc<dyn TextGenerator>,
    config: Arc<AdvisorConfig>,
}

impl AnalysisPipeline {
    /// Create a pipeline over the real providers (NewsAPI, Yahoo Finance)
    pub fn new(config: Arc<AdvisorConfig>, generator: Arc<dyn TextGenerator>) -> Result<Self> {
        let news = Arc::new(NewsApiClient::new(&config)?);
        Ok(Self::with_sources(
            config,
            news,
            Arc::new(YahooPriceSource::new()),
            generator,
        ))
    }

    /// Create a pipeline over explicit collaborator seams
    pub fn with_sources(
        config: Arc<AdvisorConfig>,
        news: Arc<dyn NewsSearch>,
        prices: Arc<dyn PriceSource>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            filter: ArticleFilter::new(news),
            prices,
            generator,
            config,
        }
    }

    /// Run the full analysis. Never fails outward; all errors become the
    /// uniform failure report.
    pub async fn run(&self, subject: &str, ticker: &str, period_days: &str) -> AnalysisReport {
        match self.try_run(subject, ticker, period_days).await {
            Ok(report) => report,
            Err(err) => {
                warn!(subject, ticker, %err, "Analysis run failed");
                AnalysisReport::failed(&err)
            }
        }
    }

    async fn try_run(&self, subject: &str, ticker: &str, period_days: &str) -> Result<AnalysisReport> {
        let period = parse_period(period_days)?;

        let end = Utc::now();
        let start = end - Duration::days(i64::from(period));

        // News and prices are independent; both must resolve before the
        // generation stages. A news failure wins the report.
        let (news_result, price_result) = tokio::join!(
            self.filter.filter(subject, self.config.max_articles),
            self.prices.fetch(ticker, start, end)
        );
        let articles = news_result?;
        let series = price_result?;

        if series.is_empty() {
            return Err(AdvisorError::EmptySeries {
                symbol: ticker.to_string(),
            });
        }

        info!(
            subject,
            ticker,
            articles = articles.len(),
            observations = series.len(),
            "Inputs fetched, starting generation"
        );

        // Stage one: summarize the most recent observations. The generator
        // returns only fully accumulated text, so the strategy stage below
        // is grounded on a complete summary.
        let table = series.tail_table(self.config.summary_window);
        let summary = self
            .generator
            .generate(CompletionRequest::new(
                &self.config.model,
                prompts::price_summary_prompt(ticker, period, &table),
            ))
            .await?;

        let news_block = format_news_block(&articles);

        // Stage two: strategy, consuming stage one's output.
        let strategy = self
            .generator
            .generate(CompletionRequest::new(
                &self.config.model,
                prompts::investment_strategy_prompt(ticker, &summary, &news_block),
            ))
            .await?;

        Ok(AnalysisReport {
            news_text: format!(
                "[뉴스 정보]\n{news_block}\n\n[기사 수: {}개]",
                articles.len()
            ),
            price_summary_text: format!("[주가 데이터 요약]\n{summary}"),
            chart: ChartData::from_series(&series),
            strategy_text: strategy,
            failure: None,
        })
    }
}

fn parse_period(text: &str) -> Result<u32> {
    let period: i64 = text
        .trim()
        .parse()
        .map_err(|_| AdvisorError::Validation(format!("period must be an integer, got '{text}'")))?;
    if period <= 0 {
        return Err(AdvisorError::Validation(
            "period must be a positive number of days".to_string(),
        ));
    }
    u32::try_from(period)
        .map_err(|_| AdvisorError::Validation(format!("period of {period} days is out of range")))
}

fn format_news_block(articles: &[Article]) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            format!(
                "[{}] 제목: {}\n내용: {}\n링크: {}",
                i + 1,
                article.title,
                article.content,
                article.link
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::RawArticle;
    use crate::prices::{Ohlcv, PriceSeries};
    use crate::news::RelevanceQuery;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSearch {
        outcome: std::result::Result<Vec<RawArticle>, &'static str>,
        calls: AtomicUsize,
    }

    impl StubSearch {
        fn with_articles(count: usize) -> Self {
            let records = (0..count)
                .map(|i| RawArticle {
                    title: format!("Tesla headline {i}"),
                    description: Some("Deliveries and interest rate commentary".to_string()),
                    content: None,
                    url: format!("https://example.com/{i}"),
                })
                .collect();
            Self {
                outcome: Ok(records),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                outcome: Err(message),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NewsSearch for StubSearch {
        async fn search(&self, _query: &RelevanceQuery) -> Result<Vec<RawArticle>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(records) => Ok(records.clone()),
                Err(message) => Err(AdvisorError::Provider((*message).to_string())),
            }
        }
    }

    struct StubPrices {
        rows: usize,
        calls: AtomicUsize,
    }

    impl StubPrices {
        fn with_rows(rows: usize) -> Self {
            Self {
                rows,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PriceSource for StubPrices {
        async fn fetch(
            &self,
            symbol: &str,
            start: chrono::DateTime<Utc>,
            end: chrono::DateTime<Utc>,
        ) -> Result<PriceSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rows = (0..self.rows)
                .map(|i| Ohlcv {
                    timestamp: DateTime::from_timestamp(i as i64 * 86_400, 0).unwrap(),
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.0 + i as f64,
                    volume: 1_000,
                })
                .collect();
            Ok(PriceSeries::new(symbol, start, end, rows))
        }
    }

    struct ScriptedGenerator {
        replies: Mutex<VecDeque<String>>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(ToString::to_string).collect()),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, request: CompletionRequest) -> advisor_llm::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt);
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "scripted reply".to_string()))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn pipeline(
        news: Arc<StubSearch>,
        prices: Arc<StubPrices>,
        generator: Arc<ScriptedGenerator>,
    ) -> AnalysisPipeline {
        AnalysisPipeline::with_sources(
            Arc::new(AdvisorConfig::default()),
            news,
            prices,
            generator,
        )
    }

    #[tokio::test]
    async fn test_invalid_period_fails_before_any_call() {
        let news = Arc::new(StubSearch::with_articles(5));
        let prices = Arc::new(StubPrices::with_rows(30));
        let generator = Arc::new(ScriptedGenerator::new(&[]));
        let pipeline = pipeline(Arc::clone(&news), Arc::clone(&prices), Arc::clone(&generator));

        for bad in ["abc", "0", "-5", "", "4294967296"] {
            let report = pipeline.run("Tesla", "TSLA", bad).await;
            assert_eq!(report.failure, Some(FailureKind::Validation));
            assert!(report.chart.is_none());
        }

        assert_eq!(news.calls.load(Ordering::SeqCst), 0);
        assert_eq!(prices.calls.load(Ordering::SeqCst), 0);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_series_yields_uniform_failure_without_generation() {
        let news = Arc::new(StubSearch::with_articles(5));
        let prices = Arc::new(StubPrices::with_rows(0));
        let generator = Arc::new(ScriptedGenerator::new(&["unused"]));
        let pipeline = pipeline(news, Arc::clone(&prices), Arc::clone(&generator));

        let report = pipeline.run("Tesla", "TSLA", "30").await;

        assert_eq!(report.failure, Some(FailureKind::EmptySeries));
        assert!(report.chart.is_none());
        assert_eq!(report.strategy_text, "투자 전략을 생성할 수 없습니다.");
        assert_eq!(report.news_text, report.price_summary_text);
        assert!(report.news_text.starts_with("오류 발생:"));
        // The text-generation service is never invoked.
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_news_failure_aborts_pipeline() {
        let news = Arc::new(StubSearch::failing("news service down"));
        let prices = Arc::new(StubPrices::with_rows(30));
        let generator = Arc::new(ScriptedGenerator::new(&[]));
        let pipeline = pipeline(news, prices, Arc::clone(&generator));

        let report = pipeline.run("Tesla", "TSLA", "30").await;

        assert_eq!(report.failure, Some(FailureKind::Provider));
        assert!(report.news_text.contains("news service down"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_relevant_articles_reports_no_results_kind() {
        let news = Arc::new(StubSearch {
            outcome: Ok(vec![RawArticle {
                title: "Entirely unrelated".to_string(),
                description: Some("nothing financial".to_string()),
                content: None,
                url: "https://example.com/x".to_string(),
            }]),
            calls: AtomicUsize::new(0),
        });
        let prices = Arc::new(StubPrices::with_rows(30));
        let generator = Arc::new(ScriptedGenerator::new(&[]));
        let pipeline = pipeline(news, prices, generator);

        let report = pipeline.run("Tesla", "TSLA", "30").await;
        assert_eq!(report.failure, Some(FailureKind::NoResults));
    }

    #[tokio::test]
    async fn test_successful_run_assembles_full_report() {
        let news = Arc::new(StubSearch::with_articles(5));
        let prices = Arc::new(StubPrices::with_rows(30));
        let generator = Arc::new(ScriptedGenerator::new(&[
            "최근 주가는 꾸준히 상승했습니다.",
            "분할 매수 전략을 권장합니다.",
        ]));
        let pipeline = pipeline(news, prices, Arc::clone(&generator));

        let report = pipeline.run("Tesla", "TSLA", "30").await;

        assert!(report.is_success());
        assert!(report.news_text.contains("[기사 수: 5개]"));
        assert!(report.news_text.contains("[1] 제목: Tesla headline 0"));
        assert!(
            report
                .price_summary_text
                .contains("최근 주가는 꾸준히 상승했습니다.")
        );
        assert_eq!(report.strategy_text, "분할 매수 전략을 권장합니다.");
        let chart = report.chart.expect("chart handle present");
        assert_eq!(chart.points.len(), 30);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_strategy_prompt_consumes_completed_summary() {
        let news = Arc::new(StubSearch::with_articles(2));
        let prices = Arc::new(StubPrices::with_rows(15));
        let generator = Arc::new(ScriptedGenerator::new(&["SUMMARY-TOKEN", "strategy"]));
        let pipeline = pipeline(news, prices, Arc::clone(&generator));

        let report = pipeline.run("Tesla", "TSLA", "15").await;
        assert!(report.is_success());

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        // The summary prompt sees only the most recent 10 observations.
        assert!(prompts[0].contains("주가 동향"));
        // The strategy prompt is grounded on the first call's full output
        // and on the formatted news block.
        assert!(prompts[1].contains("SUMMARY-TOKEN"));
        assert!(prompts[1].contains("[뉴스 정보]"));
        assert!(prompts[1].contains("제목: Tesla headline 0"));
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("30").unwrap(), 30);
        assert_eq!(parse_period(" 7 ").unwrap(), 7);
        assert!(parse_period("0").is_err());
        assert!(parse_period("-1").is_err());
        assert!(parse_period("ten").is_err());
        // One past u32::MAX must not wrap to 0.
        assert!(parse_period("4294967296").is_err());
    }
}
