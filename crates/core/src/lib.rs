//! # ContextForge Core
//!
//! Domain types, collaborator traits, and error definitions for the
//! ContextForge context assembly engine. This crate has **zero framework
//! dependencies** — it defines the domain model that the engine crate
//! implements against.
//!
//! ## Design Philosophy
//!
//! External collaborators (model gateway, token estimator) are defined as
//! traits here. Implementations live outside this workspace or in test
//! code. This enables:
//! - Swapping backends via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (the engine depends inward on core)

pub mod chunk;
pub mod error;
pub mod gateway;
pub mod message;
pub mod token;

// Re-export key types at crate root for ergonomics
pub use chunk::{ChunkKey, ChunkSource, RetrievedChunk, ScoredChunk};
pub use error::{Error, GatewayError, MultiPassError, Result};
pub use gateway::{GatewayRequest, GatewayResponse, ModelGateway, Usage};
pub use message::{Message, Role};
pub use token::{HeuristicEstimator, TokenEstimator};
