//! Shared DTOs (schemas-as-code) for the srcfix workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - Be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod report;
pub mod run;

/// Schema identifiers.
pub mod schema {
    pub const SRCFIX_RUN_V1: &str = "srcfix.run.v1";
    pub const SRCFIX_REPORT_V1: &str = "srcfix.report.v1";
}
