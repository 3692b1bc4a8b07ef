//! Order-items-by-order DataLoader for batched fetching
//!
//! This loader batches multiple order ID lookups into a single database
//! query, returning all line items for each order. This solves the N+1
//! problem when resolving items for every order on a kitchen dashboard.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::ORDER_ITEM_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::group::group_by_key;
use crate::models::OrderItem;

/// DataLoader for batching order-items-by-order queries
#[derive(Clone)]
pub struct OrderItemsByOrderLoader {
    pool: PgPool,
}

impl OrderItemsByOrderLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for OrderItemsByOrderLoader {
    type Key = Uuid;
    type Value = Vec<OrderItem>;

    const RELATION: &'static str = "orderItemsByOrder";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Vec<OrderItem>>> {
        let sql = format!(
            "SELECT {} FROM order_items WHERE order_id = ANY($1) ORDER BY created_at ASC",
            ORDER_ITEM_COLUMNS
        );
        let items: Vec<OrderItem> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(group_by_key(items, |item| Some(item.order_id)))
    }

    fn on_missing(&self, _key: &Uuid) -> LoadResult<Vec<OrderItem>> {
        Ok(Vec::new())
    }
}
