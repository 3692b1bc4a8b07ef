//! Comanda loaders library
//!
//! Request-scoped DataLoader batching layer for the Comanda POS GraphQL API.
//! This crate solves the N+1 query problem for GraphQL relationship resolvers:
//! field resolutions issued within one scheduling tick are coalesced into a
//! single bulk database query per relation, and results are cached for the
//! remainder of the request.
//!
//! The entry point is [`Loaders`], constructed once per request scope and
//! dropped with it. Individual relations are exposed as [`DataLoader`]
//! instances; mutation handlers use [`Loaders::clear_all`] and
//! [`Loaders::clear_by_pattern`] to evict cached reads after out-of-band
//! writes.

pub mod dataloader;
pub mod error;
pub mod group;
pub mod loaders;
pub mod models;

// Re-export commonly used types
pub use dataloader::{DataLoader, LoadKey, Loader};
pub use error::{LoadError, LoadResult};
pub use group::group_by_key;
pub use loaders::Loaders;
