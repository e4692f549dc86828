//! Error types for fallible trie mutation.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result alias used by the fallible entry points.
pub type Result<T> = std::result::Result<T, TrieError>;

/// Allocation failures surfaced by [`RadixTrie::try_store`](crate::RadixTrie::try_store).
///
/// When one of these is returned the trie is unchanged.
#[derive(Debug, Error)]
pub enum TrieError {
    /// An edge label could not be allocated.
    #[error("failed to allocate {bytes} bytes for an edge label")]
    PrefixAlloc {
        /// Length of the label that was being built.
        bytes: usize,
    },
    /// A child list could not grow.
    #[error("failed to grow child list: {0}")]
    ChildAlloc(#[from] TryReserveError),
}
