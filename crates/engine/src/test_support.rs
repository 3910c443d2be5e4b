//! Shared test helpers for multi-pass tests.

use contextforge_core::error::GatewayError;
use contextforge_core::gateway::{GatewayRequest, GatewayResponse, ModelGateway, Usage};
use contextforge_core::message::Message;
use std::sync::Mutex;

/// A mock gateway that returns a sequence of scripted outcomes.
///
/// Each call to `complete` consumes the next outcome in the queue and
/// records the request it was given. Panics if more calls are made than
/// outcomes provided.
pub(crate) struct SequentialMockGateway {
    outcomes: Mutex<Vec<Result<GatewayResponse, GatewayError>>>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl SequentialMockGateway {
    pub(crate) fn new(outcomes: Vec<Result<GatewayResponse, GatewayError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A gateway that answers every call with the same text, `n` times.
    pub(crate) fn repeating_text(text: &str, n: usize) -> Self {
        Self::new((0..n).map(|_| Ok(make_text_response(text, 15))).collect())
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The request recorded for call `i` (zero-based).
    pub(crate) fn request_at(&self, i: usize) -> GatewayRequest {
        self.requests.lock().unwrap()[i].clone()
    }
}

#[async_trait::async_trait]
impl ModelGateway for SequentialMockGateway {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(
        &self,
        request: GatewayRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        let mut requests = self.requests.lock().unwrap();
        let mut outcomes = self.outcomes.lock().unwrap();

        if outcomes.is_empty() {
            panic!(
                "SequentialMockGateway: no more outcomes (call #{})",
                requests.len() + 1
            );
        }

        requests.push(request);
        outcomes.remove(0)
    }
}

/// Create a simple text response with the given total token usage.
pub(crate) fn make_text_response(text: &str, total_tokens: u32) -> GatewayResponse {
    GatewayResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: total_tokens.saturating_sub(5),
            completion_tokens: 5,
            total_tokens,
        }),
        model: "mock-model".into(),
    }
}
