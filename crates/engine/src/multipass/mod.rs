//! The multi-pass path.
//!
//! Segmenter → Pass Executor → Aggregator. An oversized chunk stream is
//! split into overlapping windows, each window is processed with one
//! model call, and a final aggregation call synthesizes the partial
//! results. Segment calls run strictly sequentially; any single failure
//! aborts the whole operation with no partial result (fail-fast).
//! Cancellation is the caller's: dropping the returned future aborts
//! in-flight work.

mod segmenter;

pub use segmenter::Segment;

use crate::config::MultiPassConfig;
use contextforge_core::chunk::RetrievedChunk;
use contextforge_core::error::{MultiPassError, Result};
use contextforge_core::gateway::{GatewayRequest, ModelGateway};
use contextforge_core::message::Message;
use contextforge_core::token::TokenEstimator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The outcome of one segment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentResult {
    /// Zero-based segment index.
    pub index: usize,
    /// The formatted segment text sent to the model.
    pub segment_text: String,
    /// The model's partial output for this segment.
    pub output: String,
    /// Tokens consumed by this call (0 if the gateway reported none).
    pub tokens_used: u32,
    /// Wall-clock time of this call.
    pub duration: Duration,
}

/// The outcome of a whole multi-pass run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiPassResult {
    /// Per-segment results, in original stream order.
    pub segment_results: Vec<SegmentResult>,
    /// The synthesized final answer.
    pub final_text: String,
    /// Number of segment passes executed (the aggregation call is not a
    /// pass).
    pub pass_count: usize,
    /// Total tokens across segment calls *and* the aggregation call.
    pub total_tokens: u32,
    /// Wall-clock duration of the whole run.
    pub duration: Duration,
}

/// The multi-pass engine. Stateless between runs — all state is
/// request-scoped.
pub struct MultiPassEngine {
    gateway: Arc<dyn ModelGateway>,
    model: String,
    config: MultiPassConfig,
}

impl MultiPassEngine {
    /// Create an engine bound to a gateway and model.
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        model: impl Into<String>,
        config: MultiPassConfig,
    ) -> Self {
        Self {
            gateway,
            model: model.into(),
            config,
        }
    }

    /// Process an ordered chunk stream in overlapping windows and
    /// synthesize a final answer.
    ///
    /// # Errors
    ///
    /// - [`MultiPassError::Disabled`] when invoked while the feature is off
    /// - [`MultiPassError::NoSegments`] for an empty chunk stream
    /// - [`MultiPassError::SegmentFailed`] / [`MultiPassError::AggregationFailed`]
    ///   when a gateway call errors — the run aborts, discarding all
    ///   partial segment results
    pub async fn run(
        &self,
        chunks: &[RetrievedChunk],
        user_request: &str,
        estimator: &dyn TokenEstimator,
    ) -> Result<MultiPassResult> {
        if !self.config.enabled {
            return Err(MultiPassError::Disabled.into());
        }
        self.config.validate()?;

        let segments = segmenter::build_segments(chunks, &self.config, estimator);
        if segments.is_empty() {
            return Err(MultiPassError::NoSegments.into());
        }

        let total = segments.len();
        let start = Instant::now();
        info!(segments = total, model = %self.model, "multi-pass run starting");

        let mut segment_results: Vec<SegmentResult> = Vec::with_capacity(total);
        let mut total_tokens: u32 = 0;

        for segment in &segments {
            let pass_start = Instant::now();
            let messages = segment_messages(segment, total, user_request);
            let request = GatewayRequest::new(&self.model, messages);

            let response = self.gateway.complete(request).await.map_err(|source| {
                MultiPassError::SegmentFailed {
                    index: segment.index + 1,
                    total,
                    source,
                }
            })?;

            let tokens_used = response.usage.map(|u| u.total_tokens).unwrap_or(0);
            total_tokens += tokens_used;

            debug!(
                segment = segment.index + 1,
                total,
                tokens_used,
                "segment pass complete"
            );

            segment_results.push(SegmentResult {
                index: segment.index,
                segment_text: segment.text.clone(),
                output: response.message.content,
                tokens_used,
                duration: pass_start.elapsed(),
            });
        }

        let final_text = if segment_results.len() > 1 {
            let messages = aggregation_messages(&segment_results, user_request, &self.config);
            let request = GatewayRequest::new(&self.model, messages);

            let response = self
                .gateway
                .complete(request)
                .await
                .map_err(|source| MultiPassError::AggregationFailed { source })?;

            // The aggregation call's usage is counted in the reported
            // total; it is not a pass.
            total_tokens += response.usage.map(|u| u.total_tokens).unwrap_or(0);
            response.message.content
        } else {
            segment_results[0].output.clone()
        };

        let duration = start.elapsed();
        info!(
            passes = segment_results.len(),
            total_tokens,
            elapsed_ms = duration.as_millis() as u64,
            "multi-pass run complete"
        );

        Ok(MultiPassResult {
            pass_count: segment_results.len(),
            segment_results,
            final_text,
            total_tokens,
            duration,
        })
    }
}

fn segment_messages(segment: &Segment, total: usize, user_request: &str) -> Vec<Message> {
    let system = "You are extracting information from one window of a larger \
                  document set. Extract everything relevant to the request. \
                  Flag partial or ambiguous findings explicitly. If this \
                  window contains nothing relevant, say so briefly.";

    let user = format!(
        "Pass {} of {}.\n\n{}\n\nRequest: {}",
        segment.index + 1,
        total,
        segment.text,
        user_request
    );

    vec![Message::system(system), Message::user(user)]
}

fn aggregation_messages(
    results: &[SegmentResult],
    user_request: &str,
    config: &MultiPassConfig,
) -> Vec<Message> {
    let mut system = String::new();
    if let Some(custom) = &config.aggregation_prompt {
        system.push_str(custom);
        system.push_str("\n\n");
    }
    system.push_str(&format!(
        "You are synthesizing partial findings from {} passes over a \
         document set. Merge them into one final answer: deduplicate \
         repeated findings, resolve flagged ambiguities where possible, \
         and answer the original request.",
        results.len()
    ));

    let mut user = format!("Original request: {user_request}\n");
    for result in results {
        user.push_str(&format!("\n--- Pass {} ---\n{}\n", result.index + 1, result.output));
    }

    vec![Message::system(system), Message::user(user)]
}
