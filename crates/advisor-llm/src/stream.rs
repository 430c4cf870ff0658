//! Server-sent-event fragment accumulation
//!
//! An OpenAI-compatible streaming response is an ordered sequence of SSE
//! events, each carrying a JSON chunk with an incremental text delta, closed
//! by a `data: [DONE]` marker. [`StreamAccumulator`] folds that sequence into
//! one string. The fold is strict: no text is observable until the stream is
//! exhausted, and a stream that ends without the completion marker is an
//! error rather than a partial result.

use crate::error::{LlmError, Result};
use serde::Deserialize;

const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Fold over an ordered sequence of SSE byte chunks into one completion text.
///
/// Bytes may arrive split at arbitrary boundaries, including inside a
/// multi-byte UTF-8 character; an undecodable tail is held back until the
/// rest of the character arrives. Events are only processed once their
/// terminating blank line has been seen, so re-assembly is deterministic
/// for a given fragment order.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    pending: Vec<u8>,
    buffer: String,
    text: String,
    done: bool,
}

impl StreamAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of response bytes, in arrival order
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        // CR cannot occur inside JSON string data (control characters are
        // escaped there), so dropping it normalizes CRLF event delimiters.
        self.pending
            .extend(bytes.iter().copied().filter(|&b| b != b'\r'));

        let valid_len = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            // An incomplete trailing sequence stays pending until the next
            // chunk completes it.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => {
                return Err(LlmError::UnexpectedResponse(
                    "response contained invalid UTF-8".to_string(),
                ));
            }
        };
        self.buffer
            .push_str(&String::from_utf8_lossy(&self.pending[..valid_len]));
        self.pending.drain(..valid_len);

        while let Some(pos) = self.buffer.find("\n\n") {
            let event: String = self.buffer.drain(..pos + 2).collect();
            self.consume_event(&event)?;
        }
        Ok(())
    }

    /// Finish the fold, returning the trimmed accumulated text.
    ///
    /// Fails with [`LlmError::UnexpectedResponse`] if the stream never
    /// delivered its completion marker.
    pub fn finish(mut self) -> Result<String> {
        if !self.pending.is_empty() {
            return Err(LlmError::UnexpectedResponse(
                "stream ended inside a multi-byte character".to_string(),
            ));
        }
        // A final event is valid without a trailing blank line.
        if !self.buffer.trim().is_empty() {
            let event = std::mem::take(&mut self.buffer);
            self.consume_event(&event)?;
        }
        if !self.done {
            return Err(LlmError::UnexpectedResponse(
                "stream ended before the completion marker".to_string(),
            ));
        }
        Ok(self.text.trim().to_string())
    }

    fn consume_event(&mut self, event: &str) -> Result<()> {
        for line in event.lines() {
            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data == DONE_MARKER {
                self.done = true;
                continue;
            }
            if self.done || data.is_empty() {
                continue;
            }
            let chunk: StreamChunk = serde_json::from_str(data)?;
            if let Some(fragment) = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
            {
                self.text.push_str(&fragment);
            }
        }
        Ok(())
    }
}
