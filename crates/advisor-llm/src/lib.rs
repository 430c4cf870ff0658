//! Streaming text-generation client layer
//!
//! This crate wraps an OpenAI-compatible chat-completions endpoint behind the
//! [`TextGenerator`] trait. Every request is issued with the streaming flag
//! set; the incremental fragments of the response are folded into a single
//! string by [`StreamAccumulator`] and only the fully accumulated, trimmed
//! text is handed back to the caller. Nothing downstream ever sees a partial
//! completion.
//!
//! # Example
//!
//! ```rust,ignore
//! use advisor_llm::{CompletionRequest, OpenAiProvider, TextGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAiProvider::from_env()?;
//!
//!     let request = CompletionRequest::new("gpt-4o-mini", "Summarize this trend...");
//!     let text = provider.generate(request).await?;
//!     println!("{text}");
//!
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod error;
pub mod provider;
pub mod providers;
pub mod stream;

pub use completion::CompletionRequest;
pub use error::{LlmError, Result};
pub use provider::TextGenerator;
pub use providers::{OpenAiConfig, OpenAiProvider};
pub use stream::StreamAccumulator;
