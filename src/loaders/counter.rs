//! Counter DataLoader for batched fetching

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::COUNTER_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::models::Counter;

/// DataLoader for batching counter queries
#[derive(Clone)]
pub struct CounterLoader {
    pool: PgPool,
}

impl CounterLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for CounterLoader {
    type Key = Uuid;
    type Value = Counter;

    const RELATION: &'static str = "counter";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Counter>> {
        let sql = format!(
            "SELECT {} FROM counters WHERE id = ANY($1)",
            COUNTER_COLUMNS
        );
        let counters: Vec<Counter> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(counters.into_iter().map(|c| (c.id, c)).collect())
    }
}
