// crates/storecheck-core/src/lib.rs
// ============================================================================
// Module: Storecheck Core Library
// Description: Public API surface for the Storecheck verification core.
// Purpose: Expose the run context, response decoder, check pipeline, and step plan.
// Dependencies: crate::{checks, context, decode, plan, response}
// ============================================================================

//! ## Overview
//! Storecheck core provides the reusable pieces of the end-to-end API
//! verification suite: a run context that brokers artifacts between
//! producer and consumer steps, a schema-labelled response decoder, a
//! declarative check pipeline, and an explicit step plan with dependency
//! ordering and skip propagation. It performs no I/O and is driven by the
//! HTTP client and suite crates.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod checks;
pub mod context;
pub mod decode;
pub mod plan;
pub mod response;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use checks::Check;
pub use checks::CheckFailure;
pub use checks::FieldKind;
pub use checks::MatchMode;
pub use checks::PathValue;
pub use checks::resolve_path;
pub use checks::verify;
pub use context::ContextKey;
pub use context::MissingArtifactError;
pub use context::RunContext;
pub use decode::DecodeError;
pub use decode::FieldPresence;
pub use decode::decode_payload;
pub use decode::decode_value;
pub use plan::PlanError;
pub use plan::PlanReport;
pub use plan::StepError;
pub use plan::StepOutcome;
pub use plan::StepState;
pub use plan::TestPlan;
pub use response::CallRecord;
