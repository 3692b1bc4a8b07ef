//! Active-shift-by-employee DataLoader for batched fetching
//!
//! An employee has at most one open shift (`end_time IS NULL`). This relation
//! is optional: an employee who is clocked out resolves to `None`, never an
//! error.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::TIME_SHEET_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::models::TimeSheet;

/// DataLoader for batching active shift lookups per employee
#[derive(Clone)]
pub struct ActiveShiftByEmployeeLoader {
    pool: PgPool,
}

impl ActiveShiftByEmployeeLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for ActiveShiftByEmployeeLoader {
    type Key = Uuid;
    type Value = Option<TimeSheet>;

    const RELATION: &'static str = "activeShiftByEmployee";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Option<TimeSheet>>> {
        let sql = format!(
            "SELECT {} FROM time_sheets WHERE employee_id = ANY($1) AND end_time IS NULL",
            TIME_SHEET_COLUMNS
        );
        let sheets: Vec<TimeSheet> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(sheets
            .into_iter()
            .map(|s| (s.employee_id, Some(s)))
            .collect())
    }

    fn on_missing(&self, _key: &Uuid) -> LoadResult<Option<TimeSheet>> {
        Ok(None)
    }
}
