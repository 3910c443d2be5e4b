//! Token estimation.
//!
//! The engine never tokenizes for real — it consumes a pluggable,
//! deterministic estimator. The default heuristic is ~4 characters per
//! token, accurate within ~10% for BPE tokenizers (GPT-4, Claude) on
//! English text.

use crate::message::Message;

/// Per-message cost of role name, delimiters, and formatting markers in
/// the API wire format.
pub const MESSAGE_OVERHEAD_TOKENS: usize = 4;

/// A deterministic pure function from text to an estimated token count.
///
/// Any `Fn(&str) -> usize + Send + Sync` qualifies, so callers can plug
/// in a real tokenizer without touching the engine.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> usize;

    /// Estimate a single role-tagged message, including the per-message
    /// wire overhead.
    fn estimate_message(&self, message: &Message) -> usize {
        MESSAGE_OVERHEAD_TOKENS + self.estimate(&message.content)
    }

    /// Estimate a slice of messages.
    fn estimate_messages(&self, messages: &[Message]) -> usize {
        messages.iter().map(|m| self.estimate_message(m)).sum()
    }
}

impl<F> TokenEstimator for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn estimate(&self, text: &str) -> usize {
        self(text)
    }
}

/// The default character-based estimator: 1 token ≈ 4 characters,
/// rounded up. Empty text is zero tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl TokenEstimator for HeuristicEstimator {
    fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        text.len().div_ceil(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(HeuristicEstimator.estimate(""), 0);
    }

    #[test]
    fn four_chars_is_one_token() {
        assert_eq!(HeuristicEstimator.estimate("test"), 1);
    }

    #[test]
    fn five_chars_rounds_up() {
        assert_eq!(HeuristicEstimator.estimate("hello"), 2);
    }

    #[test]
    fn hundred_chars() {
        let text = "a".repeat(100);
        assert_eq!(HeuristicEstimator.estimate(&text), 25);
    }

    #[test]
    fn closures_are_estimators() {
        let fixed = |_: &str| 7usize;
        assert_eq!(fixed.estimate("anything"), 7);
    }

    #[test]
    fn message_includes_overhead() {
        // 4 chars → 1 token + 4 overhead = 5
        let msg = Message::user("test");
        assert_eq!(HeuristicEstimator.estimate_message(&msg), 5);
    }

    #[test]
    fn multiple_messages() {
        let msgs = vec![
            Message::user("hello"),      // 2 tokens + 4 overhead = 6
            Message::assistant("world"), // 2 tokens + 4 overhead = 6
        ];
        assert_eq!(HeuristicEstimator.estimate_messages(&msgs), 12);
    }
}
