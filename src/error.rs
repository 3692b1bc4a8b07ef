//! Error types for the loader layer
//!
//! Loader errors are tagged per result slot: a missing key in a required
//! relation is a `NotFound` at that slot only, while a failed bulk query fails
//! every slot in the affected batch. Errors are `Clone` because one batch
//! outcome fans out to every caller waiting on the same coalescing window.

use std::sync::Arc;

use thiserror::Error;

/// Result alias for loader operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors produced by batch loading
#[derive(Error, Debug, Clone)]
pub enum LoadError {
    /// A required single-entity lookup matched no row.
    ///
    /// Scoped to one key in one relation; sibling keys in the same batch
    /// resolve normally.
    #[error("{relation} not found: {key}")]
    NotFound {
        relation: &'static str,
        key: String,
    },

    /// The bulk query for a batch failed.
    ///
    /// Fails every key in that batch uniformly; keys in other batches are
    /// unaffected. The loader never retries and never downgrades a query
    /// failure to a not-found.
    #[error("batch query failed for {relation}: {source}")]
    Query {
        relation: &'static str,
        #[source]
        source: Arc<sqlx::Error>,
    },

    /// The call dispatching the batch was dropped before the batch completed.
    #[error("{relation} load cancelled before the batch completed")]
    Cancelled { relation: &'static str },
}

impl LoadError {
    /// Build a not-found error for one key in one relation
    pub fn not_found(relation: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            relation,
            key: key.to_string(),
        }
    }

    /// Wrap a database error for a failed batch
    pub fn query(relation: &'static str, source: sqlx::Error) -> Self {
        Self::Query {
            relation,
            source: Arc::new(source),
        }
    }

    /// Returns whether this is a per-key not-found (as opposed to a batch
    /// failure), which resolvers for optional relations may map to null.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
