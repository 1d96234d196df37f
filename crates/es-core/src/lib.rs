//! # es-core
//!
//! Core types, traits, and error handling for evsel.
//!
//! This crate provides:
//! - Common error types
//! - Collaborator traits the selection pipeline consumes (histogram sink,
//!   trigger decisions, variation source)
//! - Shared value types (data-taking era, systematic variations, binning)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{HistogramSink, TriggerDecision, VariationSource};
pub use types::{Binning, Era, NOMINAL_VARIATION, Variation, VariationSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
