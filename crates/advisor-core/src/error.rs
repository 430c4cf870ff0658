//! Error types for analysis operations

use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Errors that can occur during an analysis run
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Malformed user input, reported before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// An outbound call failed or returned a non-success status
    #[error("Provider error: {0}")]
    Provider(String),

    /// The news search succeeded but nothing matched the relevance filter
    #[error("No relevant articles found for '{0}'")]
    NoResults(String),

    /// The price fetch returned no rows for the requested range
    #[error("No price data available for {symbol}")]
    EmptySeries { symbol: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email delivery error
    #[error("Mail error: {0}")]
    Mail(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Text-generation service error
    #[error("Text generation error: {0}")]
    Llm(#[from] advisor_llm::LlmError),
}

impl AdvisorError {
    /// Classify this error for branch-on-kind handling at the pipeline
    /// boundary.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::NoResults(_) => FailureKind::NoResults,
            Self::EmptySeries { .. } => FailureKind::EmptySeries,
            Self::Provider(_)
            | Self::Config(_)
            | Self::Mail(_)
            | Self::Network(_)
            | Self::Json(_)
            | Self::Llm(_) => FailureKind::Provider,
        }
    }
}

/// Coarse failure classification carried by a failed analysis report.
///
/// Lets callers choose between "try another keyword" (`NoResults`) and
/// "service unavailable" (`Provider`) style messaging without parsing
/// error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Malformed or non-positive period input
    Validation,
    /// An external call failed
    Provider,
    /// News search was reachable but nothing relevant matched
    NoResults,
    /// Price source returned no rows
    EmptySeries,
}
