//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
///
/// `E` is the backing store's own error type. It is carried through
/// untouched so callers see exactly what the collaborator reported.
#[derive(Error, Debug)]
pub enum CacheError<E> {
    /// Key absent from every source the operation consulted
    #[error("Key not found")]
    NotFound,

    /// The backing store failed
    #[error(transparent)]
    Backing(E),
}

impl<E> CacheError<E> {
    /// Returns true for the `NotFound` variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound)
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T, E> = std::result::Result<T, CacheError<E>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_display() {
        let err: CacheError<io::Error> = CacheError::NotFound;
        assert_eq!(err.to_string(), "Key not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_backing_error_is_transparent() {
        let err = CacheError::Backing(io::Error::other("disk on fire"));
        assert_eq!(err.to_string(), "disk on fire");
        assert!(!err.is_not_found());
    }
}
