//! Time-sheets-by-employee DataLoader for batched fetching
//!
//! Shifts are returned newest first within each employee.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::columns::TIME_SHEET_COLUMNS;
use crate::dataloader::Loader;
use crate::error::{LoadError, LoadResult};
use crate::group::group_by_key;
use crate::models::TimeSheet;

/// DataLoader for batching time-sheets-by-employee queries
#[derive(Clone)]
pub struct TimeSheetsByEmployeeLoader {
    pool: PgPool,
}

impl TimeSheetsByEmployeeLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Loader for TimeSheetsByEmployeeLoader {
    type Key = Uuid;
    type Value = Vec<TimeSheet>;

    const RELATION: &'static str = "timeSheetsByEmployee";

    async fn load(&self, keys: &[Uuid]) -> LoadResult<HashMap<Uuid, Vec<TimeSheet>>> {
        let sql = format!(
            "SELECT {} FROM time_sheets WHERE employee_id = ANY($1) ORDER BY start_time DESC",
            TIME_SHEET_COLUMNS
        );
        let sheets: Vec<TimeSheet> = sqlx::query_as(&sql)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LoadError::query(Self::RELATION, e))?;

        Ok(group_by_key(sheets, |s| Some(s.employee_id)))
    }

    fn on_missing(&self, _key: &Uuid) -> LoadResult<Vec<TimeSheet>> {
        Ok(Vec::new())
    }
}
