//! # lotto-check
//!
//! Retrospective lottery match engine: submit a ticket and learn how many
//! historical draws it would have matched.
//!
//! ## Architecture
//!
//! - **Types**: Lottery kinds, validated tickets, draw records, results
//! - **Validate**: Loosely typed UI input to typed values
//! - **Store**: Read-only draw history behind the [`DrawStore`] trait
//!   (in-memory or SQL dialect adapter)
//! - **Engine**: Validation, the two store queries, result formatting
//!
//! ## Design Principles
//!
//! 1. **Fail Soft**: A check never errors at the boundary; bad input and
//!    store failures both produce an empty result
//! 2. **Explicit Inputs**: Kind, numbers and threshold are arguments, never
//!    ambient state
//! 3. **Closed Kinds**: Each [`LotteryKind`] carries its own rules
//! 4. **Synchronous Execution**: At most two sequential store reads per check

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: LotteryKind, NumberSet, DrawRecord, EngineResult
pub mod types;

/// Error types
pub mod error;

/// Input validation
pub mod validate;

/// Deployment configuration
pub mod config;

/// Draw stores: in-memory and SQL dialect adapters
pub mod store;

/// Match engine: validation, matching, formatting
pub mod engine;

/// Draw history text loader
pub mod history;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{CheckReceipt, DrawMatch, DrawRecord, EngineResult, LotteryKind, MatchFilter, MatchResult, MatchThreshold, NumberSet};
pub use error::{EngineError, StoreError, ValidationError};
pub use validate::RawValue;
pub use config::{EngineConfig, StoreConfig, ThresholdPolicy};
pub use store::{DrawStore, InMemoryDrawStore, SqlDialect, SqlDrawStore};
pub use engine::{CheckRequest, MatchEngine};
