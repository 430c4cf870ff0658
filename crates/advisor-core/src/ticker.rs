//! Company-name-to-ticker resolution

use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::prompts;
use advisor_llm::{CompletionRequest, TextGenerator};
use std::sync::Arc;
use tracing::warn;

/// Single-shot resolver mapping a free-text company name to a ticker
/// symbol.
///
/// Non-English names are translated by the model itself; the resolver only
/// issues the request and trims the reply. There is no caching: repeated
/// calls with the same input re-issue the request.
pub struct TickerResolver {
    generator: Arc<dyn TextGenerator>,
    config: Arc<AdvisorConfig>,
}

impl TickerResolver {
    pub fn new(config: Arc<AdvisorConfig>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator, config }
    }

    /// Resolve a company name to a single token: the ticker, or the literal
    /// sentinel "not found". Failures are converted to a descriptive status
    /// string rather than propagated.
    pub async fn resolve(&self, company_name: &str) -> String {
        match self.try_resolve(company_name).await {
            Ok(ticker) => ticker,
            Err(err) => {
                warn!(company_name, %err, "Ticker resolution failed");
                format!("티커 검색 오류: {err}")
            }
        }
    }

    async fn try_resolve(&self, company_name: &str) -> Result<String> {
        let request = CompletionRequest::new(
            &self.config.model,
            prompts::ticker_lookup_prompt(company_name),
        );
        Ok(self.generator.generate(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_llm::LlmError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubGenerator {
        reply: std::result::Result<&'static str, ()>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _request: CompletionRequest) -> advisor_llm::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                // Providers return trimmed text; mirror that here.
                Ok(reply) => Ok(reply.trim().to_string()),
                Err(()) => Err(LlmError::RequestFailed("connection refused".to_string())),
            }
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn resolver(generator: Arc<StubGenerator>) -> TickerResolver {
        TickerResolver::new(Arc::new(AdvisorConfig::default()), generator)
    }

    #[tokio::test]
    async fn test_non_english_name_resolves_with_one_request() {
        let generator = Arc::new(StubGenerator {
            reply: Ok("  005930.KS \n"),
            calls: AtomicUsize::new(0),
        });
        let resolver = resolver(Arc::clone(&generator));

        let ticker = resolver.resolve("삼성전자").await;

        assert_eq!(ticker, "005930.KS");
        assert!(!ticker.contains(char::is_whitespace));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_match_returns_sentinel() {
        let generator = Arc::new(StubGenerator {
            reply: Ok("not found"),
            calls: AtomicUsize::new(0),
        });

        assert_eq!(resolver(generator).resolve("가상의 회사").await, "not found");
    }

    #[tokio::test]
    async fn test_failure_becomes_status_string() {
        let generator = Arc::new(StubGenerator {
            reply: Err(()),
            calls: AtomicUsize::new(0),
        });

        let status = resolver(generator).resolve("Tesla").await;
        assert!(status.starts_with("티커 검색 오류:"));
        assert!(status.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_repeated_calls_reissue_the_request() {
        let generator = Arc::new(StubGenerator {
            reply: Ok("TSLA"),
            calls: AtomicUsize::new(0),
        });
        let resolver = resolver(Arc::clone(&generator));

        resolver.resolve("Tesla").await;
        resolver.resolve("Tesla").await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }
}
