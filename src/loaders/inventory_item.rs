//! Inventory item DataLoader for batched fetching

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::INVENTORY_ITEM_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::models::InventoryItem;

/// DataLoader for batching inventory item queries
#[derive(Clone)]
pub struct InventoryItemLoader {
    pool: PgPool,
}

impl InventoryItemLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for InventoryItemLoader {
    type Key = Uuid;
    type Value = InventoryItem;

    const RELATION: &'static str = "inventoryItem";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, InventoryItem>> {
        let sql = format!(
            "SELECT {} FROM inventory_items WHERE id = ANY($1)",
            INVENTORY_ITEM_COLUMNS
        );
        let items: Vec<InventoryItem> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(items.into_iter().map(|i| (i.id, i)).collect())
    }
}
