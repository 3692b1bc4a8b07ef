//! Orders-by-customer DataLoader for batched fetching
//!
//! Orders are returned newest first within each customer.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::ORDER_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::group::group_by_key;
use crate::models::Order;

/// DataLoader for batching orders-by-customer queries
#[derive(Clone)]
pub struct OrdersByCustomerLoader {
    pool: PgPool,
}

impl OrdersByCustomerLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for OrdersByCustomerLoader {
    type Key = Uuid;
    type Value = Vec<Order>;

    const RELATION: &'static str = "ordersByCustomer";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Vec<Order>>> {
        let sql = format!(
            "SELECT {} FROM orders WHERE customer_id = ANY($1) ORDER BY created_at DESC",
            ORDER_COLUMNS
        );
        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        // customer_id is nullable; anonymous orders never group anywhere.
        Ok(group_by_key(orders, |o| o.customer_id))
    }

    fn on_missing(&self, _key: &Uuid) -> LoadResult<Vec<Order>> {
        Ok(Vec::new())
    }
}
