//! Lender matching for equipment-financing applications.
//!
//! The [`matching`] module holds the rule evaluation engine; [`config`], [`telemetry`], and
//! [`error`] carry the service plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
