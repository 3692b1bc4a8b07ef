//! Inventory models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Inventory item record from the inventory_items table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique item identifier
    pub id: Uuid,

    /// Cafe that stocks this item
    pub cafe_id: Uuid,

    /// Item name (e.g. "Oat milk")
    pub name: String,

    /// Stock-keeping unit (e.g. "l", "kg", "pcs")
    pub unit: String,

    /// Current stock on hand
    pub current_stock: i32,

    /// Reorder threshold
    pub minimum_stock: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Returns whether the item is below its reorder threshold but not yet
    /// depleted. Depleted items are an out-of-stock condition, not a low-stock
    /// warning.
    pub fn is_low_stock(&self) -> bool {
        self.current_stock > 0 && self.current_stock <= self.minimum_stock
    }
}
