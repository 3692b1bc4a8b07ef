//! Cafe DataLoader for batched fetching
//!
//! This loader batches multiple cafe ID lookups into a single database query,
//! solving the N+1 problem when resolving the cafe for many orders, counters,
//! or employees at once.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::CAFE_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::models::Cafe;

/// DataLoader for batching cafe queries
#[derive(Clone)]
pub struct CafeLoader {
    pool: PgPool,
}

impl CafeLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for CafeLoader {
    type Key = Uuid;
    type Value = Cafe;

    const RELATION: &'static str = "cafe";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Cafe>> {
        let sql = format!("SELECT {} FROM cafes WHERE id = ANY($1)", CAFE_COLUMNS);
        let cafes: Vec<Cafe> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(cafes.into_iter().map(|c| (c.id, c)).collect())
    }
}
