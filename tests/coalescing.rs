//! Public-API tests for the batching engine
//!
//! These tests drive `DataLoader` through an in-memory loader the way GraphQL
//! field resolvers drive the relation loaders, with no database involved.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use assert_matches::assert_matches;
use async_trait::async_trait;

use comanda_loaders::{group_by_key, DataLoader, LoadError, LoadResult, Loader};

/// In-memory stand-in for a has-many relation: ticket lines by ticket number.
struct TicketLinesLoader {
    rows: Vec<(u32, &'static str)>,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<u32>>>,
}

impl TicketLinesLoader {
    fn new(rows: Vec<(u32, &'static str)>) -> Self {
        Self {
            rows,
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Loader for TicketLinesLoader {
    type Key = u32;
    type Value = Vec<String>;

    const RELATION: &'static str = "ticketLines";

    async fn load(&self, keys: &[u32]) -> LoadResult<HashMap<u32, Vec<String>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(keys.to_vec());

        let rows: Vec<(u32, String)> = self
            .rows
            .iter()
            .filter(|(ticket, _)| keys.contains(ticket))
            .map(|(ticket, line)| (*ticket, line.to_string()))
            .collect();
        Ok(group_by_key(rows, |(ticket, _)| Some(*ticket))
            .into_iter()
            .map(|(ticket, group)| (ticket, group.into_iter().map(|(_, line)| line).collect()))
            .collect())
    }

    fn on_missing(&self, _key: &u32) -> LoadResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// In-memory stand-in for a required single-entity relation.
struct TicketLoader {
    known: Vec<u32>,
}

#[async_trait]
impl Loader for TicketLoader {
    type Key = u32;
    type Value = String;

    const RELATION: &'static str = "ticket";

    async fn load(&self, keys: &[u32]) -> LoadResult<HashMap<u32, String>> {
        Ok(keys
            .iter()
            .filter(|k| self.known.contains(k))
            .map(|k| (*k, format!("ticket-{k}")))
            .collect())
    }
}

#[tokio::test]
async fn resolvers_in_one_tick_share_one_query() {
    let dl = DataLoader::new(TicketLinesLoader::new(vec![
        (1, "espresso"),
        (1, "croissant"),
        (3, "flat white"),
    ]));

    // Five field resolutions for three parents, same tick.
    let (a, b, c, d, e) = tokio::join!(
        dl.load_one(&1),
        dl.load_one(&2),
        dl.load_one(&3),
        dl.load_one(&1),
        dl.load_one(&2),
    );

    assert_matches!(a, Ok(lines) if lines == ["espresso", "croissant"]);
    assert_matches!(b, Ok(lines) if lines.is_empty());
    assert_matches!(c, Ok(lines) if lines == ["flat white"]);
    assert_matches!(d, Ok(lines) if lines == ["espresso", "croissant"]);
    assert_matches!(e, Ok(lines) if lines.is_empty());

    assert_eq!(dl.loader().calls.load(Ordering::SeqCst), 1);
    assert_eq!(dl.loader().batches.lock().unwrap().as_slice(), &[vec![1, 2, 3]]);
}

#[tokio::test]
async fn results_align_with_input_positions() {
    let dl = DataLoader::new(TicketLoader { known: vec![11, 13] });
    let results = dl.load_many(&[13, 12, 11]).await;

    assert_eq!(results.len(), 3);
    assert_matches!(&results[0], Ok(t) if t == "ticket-13");
    assert_matches!(
        &results[1],
        Err(LoadError::NotFound { relation: "ticket", key }) if key == "12"
    );
    assert_matches!(&results[2], Ok(t) if t == "ticket-11");
}

#[tokio::test]
async fn eviction_forces_a_fresh_query() {
    let dl = DataLoader::new(TicketLinesLoader::new(vec![(1, "espresso")]));

    assert_matches!(dl.load_one(&1).await, Ok(_));
    assert_matches!(dl.load_one(&1).await, Ok(_));
    assert_eq!(dl.loader().calls.load(Ordering::SeqCst), 1);

    dl.clear_all();
    assert_matches!(dl.load_one(&1).await, Ok(_));
    assert_eq!(dl.loader().calls.load(Ordering::SeqCst), 2);
}
