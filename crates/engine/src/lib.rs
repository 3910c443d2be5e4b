//! # ContextForge Engine
//!
//! The context assembly engine: ranks, deduplicates, and budget-fits
//! retrieved passages for single-prompt injection, and runs the
//! multi-pass segment/aggregate strategy for streams too large for one
//! prompt.
//!
//! Two independent, stateless-per-call paths:
//!
//! 1. **Hybrid ranking** — Scorer → Deduplicator → Tier Assigner →
//!    Budget Allocator. Pure and synchronous.
//! 2. **Multi-pass** — Segmenter → Pass Executor → Aggregator. One
//!    gateway call per overlapping window, then one synthesis call.
//!
//! Both consume chunk lists and a [`TokenEstimator`] from collaborators
//! defined in `contextforge-core`.
//!
//! [`TokenEstimator`]: contextforge_core::TokenEstimator

pub mod config;
pub mod hybrid;
pub mod multipass;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{HybridContextConfig, MultiPassConfig, PriorityTier};
pub use hybrid::{HybridContextEngine, HybridContextResult, TierUsage};
pub use multipass::{MultiPassEngine, MultiPassResult, Segment, SegmentResult};
