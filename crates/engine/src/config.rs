//! Engine configuration values.
//!
//! Pure data, no behavior beyond validation. Configs are immutable
//! values with copy-and-patch `with_*` builders; the engine never holds
//! shared mutable configuration.

use contextforge_core::MultiPassError;
use serde::{Deserialize, Serialize};

/// A named score bracket with its own slice of the token budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityTier {
    /// Tier name ("high", "medium", ...).
    pub name: String,

    /// Minimum combined score for a chunk to land in this tier.
    pub min_score: f64,

    /// Fraction of the global token budget reserved for this tier (0.0–1.0).
    pub budget_percentage: f64,

    /// Optional hard cap in tokens, applied after the percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

impl PriorityTier {
    pub fn new(name: impl Into<String>, min_score: f64, budget_percentage: f64) -> Self {
        Self {
            name: name.into(),
            min_score,
            budget_percentage,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Configuration for the hybrid ranking path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridContextConfig {
    /// Weight of the vector-search score.
    #[serde(default = "default_vector_weight")]
    pub vector_weight: f64,

    /// Weight of the full-document heuristic score.
    #[serde(default = "default_full_doc_weight")]
    pub full_doc_weight: f64,

    /// Weight of the positional score.
    #[serde(default = "default_position_weight")]
    pub position_weight: f64,

    /// Multiplier applied to summary/abstract/introduction chunks.
    #[serde(default = "default_summary_boost")]
    pub summary_boost: f64,

    /// Whether summary chunks receive the boost at all.
    #[serde(default = "default_true")]
    pub include_summaries: bool,

    /// Whether to collapse chunks with identical content.
    #[serde(default = "default_true")]
    pub deduplicate_by_content: bool,

    /// Global token budget. 0 means unlimited — an explicit sentinel,
    /// not a misconfiguration.
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// Priority tiers in declared budget order.
    #[serde(default = "default_tiers")]
    pub priority_tiers: Vec<PriorityTier>,
}

fn default_vector_weight() -> f64 {
    0.6
}
fn default_full_doc_weight() -> f64 {
    0.3
}
fn default_position_weight() -> f64 {
    0.1
}
fn default_summary_boost() -> f64 {
    1.2
}
fn default_true() -> bool {
    true
}
fn default_token_budget() -> usize {
    4096
}
fn default_tiers() -> Vec<PriorityTier> {
    vec![
        PriorityTier::new("high", 0.8, 0.5),
        PriorityTier::new("medium", 0.5, 0.3),
        PriorityTier::new("low", 0.0, 0.2),
    ]
}

impl Default for HybridContextConfig {
    fn default() -> Self {
        Self {
            vector_weight: default_vector_weight(),
            full_doc_weight: default_full_doc_weight(),
            position_weight: default_position_weight(),
            summary_boost: default_summary_boost(),
            include_summaries: true,
            deduplicate_by_content: true,
            token_budget: default_token_budget(),
            priority_tiers: default_tiers(),
        }
    }
}

impl HybridContextConfig {
    /// Replace the three source weights.
    pub fn with_weights(mut self, vector: f64, full_doc: f64, position: f64) -> Self {
        self.vector_weight = vector;
        self.full_doc_weight = full_doc;
        self.position_weight = position;
        self
    }

    /// Replace the global token budget (0 = unlimited).
    pub fn with_token_budget(mut self, budget: usize) -> Self {
        self.token_budget = budget;
        self
    }

    /// Replace the priority tiers.
    pub fn with_tiers(mut self, tiers: Vec<PriorityTier>) -> Self {
        self.priority_tiers = tiers;
        self
    }

    /// Enable or disable content deduplication.
    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplicate_by_content = enabled;
        self
    }

    /// Set the summary boost factor (and enable boosting).
    pub fn with_summary_boost(mut self, boost: f64) -> Self {
        self.summary_boost = boost;
        self.include_summaries = true;
        self
    }
}

/// Configuration for the multi-pass path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiPassConfig {
    /// Feature flag. Invoking the executor while disabled is an error.
    #[serde(default)]
    pub enabled: bool,

    /// Target segment size in estimated tokens.
    #[serde(default = "default_segment_size")]
    pub segment_size: usize,

    /// Tokens of trailing context repeated across segment boundaries.
    /// Must be strictly less than `segment_size`.
    #[serde(default = "default_overlap_tokens")]
    pub overlap_tokens: usize,

    /// Maximum number of segment passes; extra segments are truncated.
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,

    /// Custom instructions prepended to the aggregation prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_prompt: Option<String>,
}

fn default_segment_size() -> usize {
    4000
}
fn default_overlap_tokens() -> usize {
    200
}
fn default_max_passes() -> usize {
    5
}

impl Default for MultiPassConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            segment_size: default_segment_size(),
            overlap_tokens: default_overlap_tokens(),
            max_passes: default_max_passes(),
            aggregation_prompt: None,
        }
    }
}

impl MultiPassConfig {
    /// Enable the feature.
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Replace segment and overlap sizes.
    pub fn with_sizes(mut self, segment_size: usize, overlap_tokens: usize) -> Self {
        self.segment_size = segment_size;
        self.overlap_tokens = overlap_tokens;
        self
    }

    /// Replace the pass cap.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Set custom aggregation instructions.
    pub fn with_aggregation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.aggregation_prompt = Some(prompt.into());
        self
    }

    /// Structural validation, independent of the enabled flag.
    pub fn validate(&self) -> Result<(), MultiPassError> {
        if self.segment_size == 0 {
            return Err(MultiPassError::InvalidConfig(
                "segment_size must be greater than zero".into(),
            ));
        }
        if self.overlap_tokens >= self.segment_size {
            return Err(MultiPassError::InvalidConfig(format!(
                "overlap_tokens ({}) must be less than segment_size ({})",
                self.overlap_tokens, self.segment_size
            )));
        }
        if self.max_passes == 0 {
            return Err(MultiPassError::InvalidConfig(
                "max_passes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
