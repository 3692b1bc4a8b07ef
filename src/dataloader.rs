//! Batch loading engine with request-scoped caching
//!
//! This module owns the coalescing core the relation loaders plug into. Field
//! resolvers call [`DataLoader::load_one`] / [`DataLoader::load_many`]; loads
//! issued before the dispatching call yields back to the scheduler are sealed
//! into one batch, answered by a single bulk query, and cached for the rest of
//! the request.
//!
//! A `DataLoader` is request-scoped. It is created fresh per request (see
//! [`crate::loaders::Loaders`]) and must never be shared across requests, or
//! cached rows leak between unrelated clients.
//!
//! Per key, three states are observable within a scope: unrequested (no cache
//! entry), pending (batch sealed or accumulating, result outstanding), and
//! resolved (value or error cached). Only eviction returns a key to
//! unrequested.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::mem;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{LoadError, LoadResult};

/// Bound alias for loader key types.
///
/// Keys must convert to and from their string form: the invalidation facade
/// addresses cache entries as `relation:rawKey` and parses the raw part back
/// through `FromStr` before touching any cache, so a raw key can never smuggle
/// itself into a foreign relation's namespace. Every shipped relation keys by
/// `Uuid`.
pub trait LoadKey:
    Clone + Eq + Hash + Display + FromStr + Debug + Send + Sync + 'static
{
}

impl<T> LoadKey for T where
    T: Clone + Eq + Hash + Display + FromStr + Debug + Send + Sync + 'static
{
}

/// Batch-fetch function for one relation.
///
/// Implementations issue exactly one bulk query for the given key set and map
/// results back per key. Keys absent from the returned map are resolved
/// through [`Loader::on_missing`]:
/// - required single-entity relations keep the default (a per-key
///   [`LoadError::NotFound`]),
/// - has-many relations override it to an empty list,
/// - optional single-entity relations override it to `None`.
#[async_trait]
pub trait Loader: Send + Sync + 'static {
    type Key: LoadKey;
    type Value: Clone + Send + Sync + 'static;

    /// Cache namespace tag, unique per relation.
    const RELATION: &'static str;

    /// Fetch all values for `keys` with one bulk query.
    ///
    /// `keys` is deduplicated and in request order. A returned error fails
    /// every key in the batch.
    async fn load(&self, keys: &[Self::Key]) -> LoadResult<HashMap<Self::Key, Self::Value>>;

    /// Resolve a key the bulk query returned no row for.
    fn on_missing(&self, key: &Self::Key) -> LoadResult<Self::Value> {
        Err(LoadError::not_found(Self::RELATION, key))
    }
}

type Waiters<V> = Vec<oneshot::Sender<LoadResult<V>>>;

/// Mutable loader state, guarded by one mutex.
///
/// The lock is never held across an await point; coalescing happens
/// synchronously while keys are collected, before the fetch is dispatched.
struct State<K, V> {
    /// Resolved entries, kept until eviction or end of request.
    cache: HashMap<K, LoadResult<V>>,
    /// Keys of the currently accumulating or in-flight window, with the
    /// callers waiting on each.
    pending: HashMap<K, Waiters<V>>,
    /// Request order of `pending` keys; becomes the batch order.
    pending_order: Vec<K>,
    /// Whether a dispatcher currently owns the accumulating window.
    dispatching: bool,
}

impl<K, V> State<K, V> {
    fn new() -> Self {
        Self {
            cache: HashMap::new(),
            pending: HashMap::new(),
            pending_order: Vec::new(),
            dispatching: false,
        }
    }
}

/// Request-scoped coalescing wrapper around one relation's [`Loader`].
pub struct DataLoader<L: Loader> {
    loader: L,
    state: Mutex<State<L::Key, L::Value>>,
}

enum Slot<V> {
    Ready(LoadResult<V>),
    Wait(oneshot::Receiver<LoadResult<V>>),
}

impl<L: Loader> DataLoader<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            state: Mutex::new(State::new()),
        }
    }

    /// The wrapped batch-fetch implementation.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    fn state(&self) -> MutexGuard<'_, State<L::Key, L::Value>> {
        self.state.lock().expect("loader state lock poisoned")
    }

    /// Load a single key.
    pub async fn load_one(&self, key: &L::Key) -> LoadResult<L::Value> {
        let mut results = self.load_many(std::slice::from_ref(key)).await;
        results.pop().expect("load_many returns one result per key")
    }

    /// Load a batch of keys.
    ///
    /// The returned vector is positionally aligned with `keys`: `result[i]`
    /// always answers `keys[i]`, including duplicates. Loads issued by other
    /// resolvers in the same scheduling tick join the same bulk query.
    pub async fn load_many(&self, keys: &[L::Key]) -> Vec<LoadResult<L::Value>> {
        let mut slots = Vec::with_capacity(keys.len());
        let dispatch = {
            let mut guard = self.state();
            let state = &mut *guard;
            let mut opened_window = false;
            for key in keys {
                if let Some(hit) = state.cache.get(key) {
                    slots.push(Slot::Ready(hit.clone()));
                    continue;
                }
                let (tx, rx) = oneshot::channel();
                match state.pending.entry(key.clone()) {
                    Entry::Occupied(mut waiters) => waiters.get_mut().push(tx),
                    Entry::Vacant(slot) => {
                        slot.insert(vec![tx]);
                        state.pending_order.push(key.clone());
                        opened_window = true;
                    }
                }
                slots.push(Slot::Wait(rx));
            }
            // First caller to add a key to a closed window becomes the
            // dispatcher for it.
            let dispatch = opened_window && !state.dispatching;
            if dispatch {
                state.dispatching = true;
            }
            dispatch
        };

        if dispatch {
            self.dispatch().await;
        }

        let mut results = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Slot::Ready(result) => results.push(result),
                Slot::Wait(rx) => results.push(rx.await.unwrap_or_else(|_| {
                    Err(LoadError::Cancelled {
                        relation: L::RELATION,
                    })
                })),
            }
        }
        results
    }

    /// Seal the current window, run the bulk query, fan results out.
    async fn dispatch(&self) {
        let mut guard = DispatchGuard {
            state: &self.state,
            armed: true,
        };

        // Let every sibling load issued in the current scheduling tick join
        // the window before it is sealed.
        tokio::task::yield_now().await;

        let (keys, mut waiters) = {
            let mut state_guard = self.state();
            let state = &mut *state_guard;
            state.dispatching = false;
            (
                mem::take(&mut state.pending_order),
                mem::take(&mut state.pending),
            )
        };
        guard.armed = false;
        if keys.is_empty() {
            return;
        }

        tracing::debug!(
            relation = L::RELATION,
            batch_size = keys.len(),
            "dispatching batch"
        );
        let fetched = self.loader.load(&keys).await;

        let mut state = self.state();
        match fetched {
            Ok(mut values) => {
                for key in keys {
                    let result = match values.remove(&key) {
                        Some(value) => Ok(value),
                        None => self.loader.on_missing(&key),
                    };
                    if let Some(waiting) = waiters.remove(&key) {
                        for tx in waiting {
                            let _ = tx.send(result.clone());
                        }
                    }
                    state.cache.insert(key, result);
                }
            }
            Err(err) => {
                tracing::warn!(relation = L::RELATION, error = %err, "batch query failed");
                for key in keys {
                    let result: LoadResult<L::Value> = Err(err.clone());
                    if let Some(waiting) = waiters.remove(&key) {
                        for tx in waiting {
                            let _ = tx.send(result.clone());
                        }
                    }
                    state.cache.insert(key, result);
                }
            }
        }
    }

    /// Seed a resolved entry without a fetch.
    ///
    /// Useful after a mutation that already holds the fresh row, and in tests.
    pub fn prime(&self, key: L::Key, value: L::Value) {
        self.state().cache.insert(key, Ok(value));
    }

    /// Whether a resolved entry exists for `key`.
    pub fn is_cached(&self, key: &L::Key) -> bool {
        self.state().cache.contains_key(key)
    }

    /// Evict one resolved entry. Returns whether an entry existed.
    pub fn clear_key(&self, key: &L::Key) -> bool {
        self.state().cache.remove(key).is_some()
    }

    /// Evict every resolved entry. Returns the count evicted.
    ///
    /// In-flight batches are unaffected; they resolve and cache normally.
    pub fn clear_all(&self) -> usize {
        let mut state = self.state();
        let evicted = state.cache.len();
        state.cache.clear();
        evicted
    }
}

/// Fails the window's waiters if the dispatching call is dropped before the
/// batch is sealed, instead of stranding them.
struct DispatchGuard<'a, K, V> {
    state: &'a Mutex<State<K, V>>,
    armed: bool,
}

impl<K, V> Drop for DispatchGuard<'_, K, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut state) = self.state.lock() {
            state.dispatching = false;
            state.pending_order.clear();
            // Dropping the senders wakes every waiter with a cancellation.
            state.pending.clear();
        }
    }
}

/// Type-erased cache access for the invalidation facade.
///
/// Raw keys arrive as strings from `clear_by_pattern`; they are parsed through
/// the relation's typed key before any eviction, so the (relation, key) pair
/// behaves as a structured composite key rather than a spliced string.
pub(crate) trait CacheOps: Send + Sync {
    fn relation(&self) -> &'static str;
    fn evict_all(&self) -> usize;
    fn evict_key(&self, raw_key: &str) -> usize;
}

impl<L: Loader> CacheOps for DataLoader<L> {
    fn relation(&self) -> &'static str {
        L::RELATION
    }

    fn evict_all(&self) -> usize {
        self.clear_all()
    }

    fn evict_key(&self, raw_key: &str) -> usize {
        match raw_key.parse::<L::Key>() {
            Ok(key) => usize::from(self.clear_key(&key)),
            // A string that does not parse as this relation's key type cannot
            // name an entry here.
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::group::group_by_key;

    /// Required single-entity loader over a fixed set of known keys.
    struct EntityLoader {
        known: Vec<u32>,
        calls: AtomicUsize,
        batches: Mutex<Vec<Vec<u32>>>,
    }

    impl EntityLoader {
        fn new(known: Vec<u32>) -> Self {
            Self {
                known,
                calls: AtomicUsize::new(0),
                batches: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn batches(&self) -> Vec<Vec<u32>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Loader for EntityLoader {
        type Key = u32;
        type Value = String;

        const RELATION: &'static str = "entity";

        async fn load(&self, keys: &[u32]) -> LoadResult<HashMap<u32, String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batches.lock().unwrap().push(keys.to_vec());
            Ok(keys
                .iter()
                .filter(|k| self.known.contains(k))
                .map(|k| (*k, format!("entity-{k}")))
                .collect())
        }
    }

    /// Has-many loader grouping fixed child rows by parent key.
    struct ChildrenLoader {
        rows: Vec<(u32, &'static str)>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Loader for ChildrenLoader {
        type Key = u32;
        type Value = Vec<String>;

        const RELATION: &'static str = "children";

        async fn load(&self, keys: &[u32]) -> LoadResult<HashMap<u32, Vec<String>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rows: Vec<(u32, String)> = self
                .rows
                .iter()
                .filter(|(parent, _)| keys.contains(parent))
                .map(|(parent, name)| (*parent, name.to_string()))
                .collect();
            Ok(group_by_key(rows, |(parent, _)| Some(*parent))
                .into_iter()
                .map(|(parent, group)| (parent, group.into_iter().map(|(_, name)| name).collect()))
                .collect())
        }

        fn on_missing(&self, _key: &u32) -> LoadResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    /// Optional single-entity loader: missing keys resolve to `None`.
    struct OptionalLoader {
        present: Vec<u32>,
    }

    #[async_trait]
    impl Loader for OptionalLoader {
        type Key = u32;
        type Value = Option<String>;

        const RELATION: &'static str = "optional";

        async fn load(&self, keys: &[u32]) -> LoadResult<HashMap<u32, Option<String>>> {
            Ok(keys
                .iter()
                .filter(|k| self.present.contains(k))
                .map(|k| (*k, Some(format!("present-{k}"))))
                .collect())
        }

        fn on_missing(&self, _key: &u32) -> LoadResult<Option<String>> {
            Ok(None)
        }
    }

    /// Loader whose bulk query always fails.
    struct BrokenLoader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Loader for BrokenLoader {
        type Key = u32;
        type Value = String;

        const RELATION: &'static str = "broken";

        async fn load(&self, _keys: &[u32]) -> LoadResult<HashMap<u32, String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LoadError::query(Self::RELATION, sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn test_order_preservation_and_not_found_isolation() {
        let dl = DataLoader::new(EntityLoader::new(vec![1, 3]));
        let results = dl.load_many(&[1, 2, 3]).await;

        assert_eq!(results.len(), 3);
        assert_matches!(&results[0], Ok(v) if v == "entity-1");
        assert_matches!(
            &results[1],
            Err(LoadError::NotFound { relation: "entity", key }) if key == "2"
        );
        assert_matches!(&results[2], Ok(v) if v == "entity-3");
        assert_eq!(dl.loader().batches(), vec![vec![1, 2, 3]]);
    }

    #[tokio::test]
    async fn test_concurrent_loads_coalesce_into_one_batch() {
        let dl = DataLoader::new(EntityLoader::new(vec![7]));
        let (a, b, c) = tokio::join!(dl.load_one(&7), dl.load_one(&7), dl.load_one(&7));

        assert_matches!(a, Ok(v) if v == "entity-7");
        assert_matches!(b, Ok(v) if v == "entity-7");
        assert_matches!(c, Ok(v) if v == "entity-7");
        // One batch, key appears exactly once.
        assert_eq!(dl.loader().calls(), 1);
        assert_eq!(dl.loader().batches(), vec![vec![7]]);
    }

    #[tokio::test]
    async fn test_distinct_keys_in_same_tick_share_a_batch() {
        let dl = DataLoader::new(EntityLoader::new(vec![1, 2]));
        let (a, b) = tokio::join!(dl.load_one(&1), dl.load_one(&2));

        assert_matches!(a, Ok(_));
        assert_matches!(b, Ok(_));
        assert_eq!(dl.loader().calls(), 1);
        assert_eq!(dl.loader().batches(), vec![vec![1, 2]]);
    }

    #[tokio::test]
    async fn test_duplicate_keys_in_one_call_are_deduplicated() {
        let dl = DataLoader::new(EntityLoader::new(vec![5]));
        let results = dl.load_many(&[5, 5]).await;

        assert_eq!(results.len(), 2);
        assert_matches!(&results[0], Ok(v) if v == "entity-5");
        assert_matches!(&results[1], Ok(v) if v == "entity-5");
        assert_eq!(dl.loader().batches(), vec![vec![5]]);
    }

    #[tokio::test]
    async fn test_resolved_entries_are_cached_for_the_scope() {
        let dl = DataLoader::new(EntityLoader::new(vec![1]));
        let first = dl.load_one(&1).await;
        let second = dl.load_one(&1).await;

        assert_matches!(first, Ok(_));
        assert_matches!(second, Ok(_));
        assert_eq!(dl.loader().calls(), 1);
    }

    #[tokio::test]
    async fn test_clear_all_forces_refetch() {
        let dl = DataLoader::new(EntityLoader::new(vec![1]));
        assert_matches!(dl.load_one(&1).await, Ok(_));

        assert_eq!(dl.clear_all(), 1);
        assert!(!dl.is_cached(&1));
        assert_matches!(dl.load_one(&1).await, Ok(_));
        assert_eq!(dl.loader().calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_key_evicts_exactly_one_entry() {
        let dl = DataLoader::new(EntityLoader::new(vec![1, 2]));
        dl.load_many(&[1, 2]).await;

        assert!(dl.clear_key(&1));
        assert!(!dl.clear_key(&1));
        assert!(!dl.is_cached(&1));
        assert!(dl.is_cached(&2));
    }

    #[tokio::test]
    async fn test_empty_group_resolves_to_empty_list() {
        let dl = DataLoader::new(ChildrenLoader {
            rows: vec![(1, "a"), (1, "b")],
            calls: AtomicUsize::new(0),
        });
        let results = dl.load_many(&[1, 2]).await;

        assert_matches!(&results[0], Ok(group) if group == &["a", "b"]);
        assert_matches!(&results[1], Ok(group) if group.is_empty());
    }

    #[tokio::test]
    async fn test_optional_relation_resolves_missing_to_none() {
        let dl = DataLoader::new(OptionalLoader { present: vec![1] });
        let results = dl.load_many(&[1, 2]).await;

        assert_matches!(&results[0], Ok(Some(v)) if v == "present-1");
        assert_matches!(&results[1], Ok(None));
    }

    #[tokio::test]
    async fn test_batch_failure_fails_every_key_and_is_cached() {
        let dl = DataLoader::new(BrokenLoader {
            calls: AtomicUsize::new(0),
        });
        let results = dl.load_many(&[1, 2]).await;

        assert_matches!(&results[0], Err(LoadError::Query { relation: "broken", .. }));
        assert_matches!(&results[1], Err(LoadError::Query { relation: "broken", .. }));

        // Failure is a resolved state; no automatic retry.
        assert_matches!(dl.load_one(&1).await, Err(LoadError::Query { .. }));
        assert_eq!(dl.loader().calls.load(Ordering::SeqCst), 1);

        // Eviction returns the key to unrequested and a fresh load refetches.
        dl.clear_all();
        assert_matches!(dl.load_one(&1).await, Err(LoadError::Query { .. }));
        assert_eq!(dl.loader().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_prime_answers_without_a_fetch() {
        let dl = DataLoader::new(EntityLoader::new(vec![]));
        dl.prime(9, "primed".to_string());

        assert!(dl.is_cached(&9));
        assert_matches!(dl.load_one(&9).await, Ok(v) if v == "primed");
        assert_eq!(dl.loader().calls(), 0);
    }

    #[tokio::test]
    async fn test_evict_key_rejects_unparseable_raw_keys() {
        let dl = DataLoader::new(EntityLoader::new(vec![1]));
        dl.load_one(&1).await.unwrap();

        let ops: &dyn CacheOps = &dl;
        assert_eq!(ops.evict_key("not-a-number"), 0);
        assert!(dl.is_cached(&1));
        assert_eq!(ops.evict_key("1"), 1);
        assert!(!dl.is_cached(&1));
    }

    #[tokio::test]
    async fn test_dropping_dispatcher_cancels_window_waiters() {
        use std::future::Future;
        use std::task::{Context, Poll, Waker};

        let dl = DataLoader::new(EntityLoader::new(vec![1, 2]));

        let waker = Waker::noop();
        let mut cx = Context::from_waker(waker);

        // First load opens the window and parks at the scheduler yield.
        let mut first = Box::pin(dl.load_one(&1));
        assert!(first.as_mut().poll(&mut cx).is_pending());

        // Second key joins the open window as a plain waiter.
        let mut second = Box::pin(dl.load_one(&2));
        assert!(second.as_mut().poll(&mut cx).is_pending());

        // Dropping the dispatching call fails the window's waiters instead
        // of stranding them; no batch was ever issued.
        drop(first);
        match second.as_mut().poll(&mut cx) {
            Poll::Ready(result) => {
                assert_matches!(result, Err(LoadError::Cancelled { relation: "entity" }));
            }
            Poll::Pending => panic!("waiter stranded after the dispatching call was dropped"),
        }
        assert_eq!(dl.loader().calls(), 0);

        // Cancellation is not cached; the key re-enters a fresh window.
        assert_matches!(dl.load_one(&2).await, Ok(v) if v == "entity-2");
        assert_eq!(dl.loader().calls(), 1);
    }

    #[tokio::test]
    async fn test_sequential_loads_form_separate_windows() {
        let dl = DataLoader::new(EntityLoader::new(vec![1, 2]));
        dl.load_one(&1).await.unwrap();
        dl.load_one(&2).await.unwrap();

        assert_eq!(dl.loader().batches(), vec![vec![1], vec![2]]);
    }
}
