//! Relevance keyword set for news search and post-filtering

/// Fixed macroeconomic keywords appended to every search subject to broaden
/// recall on a single search call.
const AUXILIARY_KEYWORDS: [&str; 8] = [
    "interest rate",
    "exchange rate",
    "economic indicators",
    "central bank",
    "inflation index",
    "monetary policy",
    "oil price",
    "GDP",
];

/// The subject term plus the fixed macroeconomic keyword set.
///
/// The same keyword set is used twice: OR-joined into the provider's
/// title-restricted query, and again as the case-insensitive post-filter
/// over title+content. The subject is always the first keyword.
#[derive(Debug, Clone)]
pub struct RelevanceQuery {
    keywords: Vec<String>,
}

impl RelevanceQuery {
    /// Build the keyword set for a search subject
    pub fn new(subject: &str) -> Self {
        let mut keywords = Vec::with_capacity(1 + AUXILIARY_KEYWORDS.len());
        keywords.push(subject.to_string());
        keywords.extend(AUXILIARY_KEYWORDS.iter().map(ToString::to_string));
        Self { keywords }
    }

    /// The search subject (always the first keyword)
    pub fn subject(&self) -> &str {
        &self.keywords[0]
    }

    /// All keywords, subject first
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// OR-joined query string for the search provider
    pub fn provider_query(&self) -> String {
        self.keywords.join(" OR ")
    }

    /// Whether any keyword appears in `haystack`, case-insensitively
    pub fn matches(&self, haystack: &str) -> bool {
        let haystack = haystack.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| haystack.contains(&keyword.to_lowercase()))
    }
}
