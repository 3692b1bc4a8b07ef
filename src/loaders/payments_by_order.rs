//! Payments-by-order DataLoader for batched fetching
//!
//! Payments are returned newest first within each order.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::PAYMENT_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::group::group_by_key;
use crate::models::Payment;

/// DataLoader for batching payments-by-order queries
#[derive(Clone)]
pub struct PaymentsByOrderLoader {
    pool: PgPool,
}

impl PaymentsByOrderLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for PaymentsByOrderLoader {
    type Key = Uuid;
    type Value = Vec<Payment>;

    const RELATION: &'static str = "paymentsByOrder";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Vec<Payment>>> {
        let sql = format!(
            "SELECT {} FROM payments WHERE order_id = ANY($1) ORDER BY created_at DESC",
            PAYMENT_COLUMNS
        );
        let payments: Vec<Payment> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(group_by_key(payments, |p| Some(p.order_id)))
    }

    fn on_missing(&self, _key: &Uuid) -> LoadResult<Vec<Payment>> {
        Ok(Vec::new())
    }
}
