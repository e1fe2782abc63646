// SPDX-License-Identifier: LGPL-3.0-only
//! # Breadcrumb Error Types
//!
//! Usage errors raised by the [`BreadcrumbManager`](crate::manager::BreadcrumbManager).
//! A missing key is not an error: lookups and removals report absence through
//! their return value instead.

use thiserror::Error;

/// Errors that can occur when driving a breadcrumb trail.
#[derive(Error, Debug)]
pub enum BreadcrumbError {
    /// Insertion index outside `0..=len`.
    #[error("Index {index} is out of bounds for a trail of {len} items")]
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// Length of the trail at the time of the call.
        len: usize,
    },

    /// An item with the same key is already part of the trail.
    #[error("An item with key '{key}' already exists")]
    DuplicateKey {
        /// The duplicated key.
        key: String,
    },

    /// The manager was destroyed and no longer accepts mutations.
    #[error("Breadcrumb manager has been destroyed")]
    Destroyed,

    /// Error parsing a configuration document.
    #[error("Failed to parse breadcrumb config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The closure passed to `batch` failed; nothing was committed.
    #[error("Batch aborted: {0}")]
    Batch(#[source] anyhow::Error),
}

/// Result type alias for breadcrumb operations.
pub type BreadcrumbResult<T> = Result<T, BreadcrumbError>;

impl BreadcrumbError {
    /// Create an index out of bounds error.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Create a duplicate key error.
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Create a batch error from any error type.
    pub fn batch(source: impl Into<anyhow::Error>) -> Self {
        Self::Batch(source.into())
    }
}
