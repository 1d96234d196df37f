//! # es-hist
//!
//! In-memory histogram sink for evsel.
//!
//! [`HistogramSet`] books a [`Histogram1D`] the first time a name is filled and
//! accumulates weights, squared weights, and under/overflow from then on. Sets
//! filled on different worker threads combine with [`HistogramSet::merge`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod histogram;
pub mod set;

pub use histogram::Histogram1D;
pub use set::HistogramSet;

/// es-hist version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
