//! Incremental decoder for streamed chat-completion responses.
//!
//! OpenAI-compatible endpoints stream Server-Sent Events:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Good"}}]}
//!
//! data: {"choices":[{"delta":{"content":" morning"}}]}
//!
//! data: [DONE]
//! ```
//!
//! Network chunks do not respect line (or UTF-8) boundaries, so
//! [`SseDecoder`] buffers raw bytes and only parses complete lines.

use crate::greeting::GreetingError;

const DATA_PREFIX: &str = "data:";
const DONE_MARKER: &str = "[DONE]";

/// Turns raw response bytes into text deltas.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once the `[DONE]` marker has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one network chunk; returns the non-empty deltas it completed.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<String>, GreetingError> {
        self.pending.extend_from_slice(bytes);

        let mut deltas = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(delta) = self.decode_line(&line)? {
                deltas.push(delta);
            }
        }
        Ok(deltas)
    }

    /// Flush a trailing line that arrived without a newline.
    pub fn finish(&mut self) -> Result<Option<String>, GreetingError> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        let line = std::mem::take(&mut self.pending);
        self.decode_line(&line)
    }

    fn decode_line(&mut self, raw: &[u8]) -> Result<Option<String>, GreetingError> {
        if self.done {
            return Ok(None);
        }

        let line = std::str::from_utf8(raw)
            .map_err(|e| GreetingError::Parse(format!("stream is not UTF-8: {e}")))?
            .trim();

        // Blank separators, `event:`/`id:` fields and `:` keep-alive comments.
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return Ok(None);
        };
        let payload = payload.trim();

        if payload == DONE_MARKER {
            self.done = true;
            return Ok(None);
        }

        let json: serde_json::Value =
            serde_json::from_str(payload).map_err(|e| GreetingError::Parse(e.to_string()))?;

        if let Some(message) = json["error"]["message"].as_str() {
            return Err(GreetingError::Request(message.to_string()));
        }

        Ok(json["choices"][0]["delta"]["content"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string))
    }
}

/// Collapse every whitespace run (newlines included) into one space.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
