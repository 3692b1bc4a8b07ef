//! Low-stock-by-cafe DataLoader for batched fetching
//!
//! Returns the inventory items at or below their reorder threshold for each
//! cafe, most urgent (lowest stock) first. Depleted items are excluded: zero
//! stock is an out-of-stock condition handled elsewhere, not a reorder
//! warning.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::INVENTORY_ITEM_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::group::group_by_key;
use crate::models::InventoryItem;

/// DataLoader for batching low-stock queries per cafe
#[derive(Clone)]
pub struct LowStockByCafeLoader {
    pool: PgPool,
}

impl LowStockByCafeLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for LowStockByCafeLoader {
    type Key = Uuid;
    type Value = Vec<InventoryItem>;

    const RELATION: &'static str = "lowStockByCafe";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Vec<InventoryItem>>> {
        let sql = format!(
            "SELECT {} FROM inventory_items \
             WHERE cafe_id = ANY($1) AND current_stock > 0 AND current_stock <= minimum_stock \
             ORDER BY current_stock ASC",
            INVENTORY_ITEM_COLUMNS
        );
        let items: Vec<InventoryItem> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(group_by_key(items, |i| Some(i.cafe_id)))
    }

    fn on_missing(&self, _key: &Uuid) -> LoadResult<Vec<InventoryItem>> {
        Ok(Vec::new())
    }
}
