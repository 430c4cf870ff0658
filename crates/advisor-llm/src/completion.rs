//! Completion request type

/// A single-turn streaming completion request.
///
/// The request always carries exactly one user-role prompt; conversation
/// history is not part of this crate's contract.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// User-role prompt text
    pub prompt: String,

    /// Sampling temperature (0.0-1.0)
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
}

impl CompletionRequest {
    /// Create a request with the given model and prompt
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_construction() {
        let request = CompletionRequest::new("gpt-4o-mini", "Hello")
            .with_temperature(0.7)
            .with_max_tokens(2048);

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(2048));
    }

    #[test]
    fn test_defaults_are_unset() {
        let request = CompletionRequest::new("gpt-4o-mini", "Hello");
        assert!(request.temperature.is_none());
        assert!(request.max_tokens.is_none());
    }
}
