//! Error types for the DeckLab library.

use thiserror::Error;

/// Errors produced by the DeckLab library.
///
/// Every variant is a fatal input error: retrying the same call with the
/// same configuration cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckLabError {
    /// The configuration cannot yield 26 distinct transformations.
    #[error(
        "swap count {swap_count} with rotation max {rotation_max} cannot produce 26 \
         distinct transformations; use at least 2 swaps or a non-zero rotation"
    )]
    InfeasibleConfig {
        swap_count: usize,
        rotation_max: usize,
    },
    /// Swap count is outside the valid range [1, 13].
    #[error("swap count {0} is outside the valid range [1, 13]")]
    SwapCountOutOfRange(usize),
    /// Maximum rotation is outside the valid range [0, 25].
    #[error("rotation max {0} is outside the valid range [0, 25]")]
    RotationOutOfRange(usize),
    /// A letter-keyed mapping record does not describe a usable mapping.
    #[error("invalid cipher mapping: {0}")]
    InvalidMapping(String),
}
