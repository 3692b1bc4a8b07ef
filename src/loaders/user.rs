//! User DataLoader for batched fetching
//!
//! This loader batches multiple user ID lookups into a single database query,
//! solving the N+1 problem when resolving the customer account for many
//! orders at once.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::USER_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::models::User;

/// DataLoader for batching user queries
#[derive(Clone)]
pub struct UserLoader {
    pool: PgPool,
}

impl UserLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for UserLoader {
    type Key = Uuid;
    type Value = User;

    const RELATION: &'static str = "user";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        let users: Vec<User> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}
