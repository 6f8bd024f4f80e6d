//! Search orchestrator: debounced refetch driven by the query and category filters.
//!
//! State machine:
//! ```text
//! Idle | Settled --filter change--> PendingFetch --timer--> Fetching --resolve--> Settled
//!                                   ^    |  (change re-arms)
//!                                   +----+
//! PendingFetch --timer, no filters--> Settled (baseline restored, no network call)
//! ```
//!
//! Each timer fire takes a new generation number. A response is written to the
//! store only if its generation is still the latest issued, so a slow early
//! fetch cannot overwrite a faster later one or a later reset.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::board::source::{fetch_listings, ListingSource};
use crate::board::store::{FilterStore, SharedStore, ALL_CATEGORIES};
use crate::models::Listing;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    PendingFetch,
    Fetching,
    Settled,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchStatus {
    pub phase: SearchPhase,
    pub loading: bool,
    /// Generation of the most recently issued cycle.
    pub generation: u64,
}

/// True when no filter is active and the baseline should be shown instead of
/// querying the source.
pub fn is_reset(query: &str, category: &str) -> bool {
    query.is_empty() && (category.is_empty() || category == ALL_CATEGORIES)
}

struct Machine {
    phase: SearchPhase,
    loading: bool,
    timer: Option<JoinHandle<()>>,
    /// Incremented on every arm; a woken timer whose ticket is stale does nothing.
    armed: u64,
    issued: u64,
}

impl Machine {
    fn status(&self) -> SearchStatus {
        SearchStatus {
            phase: self.phase,
            loading: self.loading,
            generation: self.issued,
        }
    }
}

struct Inner {
    store: SharedStore,
    source: Arc<dyn ListingSource>,
    baseline: Arc<[Listing]>,
    debounce: Duration,
    // Lock order: machine before store.
    machine: Mutex<Machine>,
}

#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl SearchOrchestrator {
    /// Captures the store's current listings as the baseline. The baseline is
    /// never mutated afterwards.
    pub async fn new(
        store: SharedStore,
        source: Arc<dyn ListingSource>,
        debounce: Duration,
    ) -> Self {
        let baseline = store.lock().await.listings();
        info!(
            "Search orchestrator ready: {} baseline listings, debounce {}ms",
            baseline.len(),
            debounce.as_millis()
        );

        Self {
            inner: Arc::new(Inner {
                store,
                source,
                baseline,
                debounce,
                machine: Mutex::new(Machine {
                    phase: SearchPhase::Idle,
                    loading: false,
                    timer: None,
                    armed: 0,
                    issued: 0,
                }),
            }),
        }
    }

    pub async fn status(&self) -> SearchStatus {
        self.inner.machine.lock().await.status()
    }

    /// Updates the free-text query. Re-arms the debounce timer only when the
    /// value actually changes.
    pub async fn set_query(&self, query: &str) -> SearchStatus {
        self.update(|store| {
            let changed = store.query() != query;
            if changed {
                store.set_query(query);
            }
            changed
        })
        .await
    }

    /// Updates the category filter. Same re-arm rule as `set_query`.
    pub async fn set_category(&self, category: &str) -> SearchStatus {
        self.update(|store| {
            let changed = store.category() != category;
            if changed {
                store.set_category(category);
            }
            changed
        })
        .await
    }

    /// Applies a filter write and re-arms under one machine lock, so an expired
    /// timer can never observe the new value before it is re-armed.
    async fn update(&self, apply: impl FnOnce(&mut FilterStore) -> bool) -> SearchStatus {
        let mut machine = self.inner.machine.lock().await;
        let changed = apply(&mut *self.inner.store.lock().await);
        if changed {
            self.arm(&mut machine);
        }
        machine.status()
    }

    fn arm(&self, machine: &mut Machine) {
        if let Some(timer) = machine.timer.take() {
            timer.abort();
            debug!("Debounce timer reset");
        }

        machine.armed += 1;
        let ticket = machine.armed;
        let delay = self.inner.debounce;
        let this = self.clone();
        machine.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.fire(ticket).await;
        }));
        machine.phase = SearchPhase::PendingFetch;
    }

    async fn fire(&self, ticket: u64) {
        let (generation, query, category) = {
            let mut machine = self.inner.machine.lock().await;
            if machine.armed != ticket {
                return;
            }
            // From here on this cycle can no longer be cancelled.
            machine.timer = None;
            machine.issued += 1;
            let generation = machine.issued;

            let mut store = self.inner.store.lock().await;
            let query = store.query().to_string();
            let category = store.category().to_string();

            if is_reset(&query, &category) {
                store.set_listings(self.inner.baseline.to_vec());
                machine.loading = false;
                machine.phase = SearchPhase::Settled;
                info!(
                    "Filters cleared, restored {} baseline listings (generation {generation})",
                    self.inner.baseline.len()
                );
                return;
            }

            machine.phase = SearchPhase::Fetching;
            machine.loading = true;
            (generation, query, category)
        };

        debug!("Fetching listings (generation {generation}, query={query:?}, category={category:?})");
        let listings = fetch_listings(self.inner.source.as_ref(), &query, &category).await;

        let mut machine = self.inner.machine.lock().await;
        if generation != machine.issued {
            debug!(
                "Discarding stale response (generation {generation}, latest {})",
                machine.issued
            );
            return;
        }

        let count = listings.len();
        self.inner.store.lock().await.set_listings(listings);
        machine.loading = false;
        if machine.timer.is_none() {
            machine.phase = SearchPhase::Settled;
        }
        info!("Search settled with {count} listings (generation {generation})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::source::testing::ScriptedSource;
    use crate::board::store::fixtures::listings;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    async fn setup(source: ScriptedSource) -> (SharedStore, Arc<ScriptedSource>, SearchOrchestrator) {
        let store = FilterStore::new(listings(1..=10, "baseline")).shared();
        let source = Arc::new(source);
        let orchestrator =
            SearchOrchestrator::new(store.clone(), source.clone(), DEFAULT_DEBOUNCE).await;
        (store, source, orchestrator)
    }

    fn ids(store: &FilterStore) -> Vec<i64> {
        store.listings().iter().map(|l| l.id).collect()
    }

    #[test]
    fn test_is_reset() {
        assert!(is_reset("", "all"));
        assert!(is_reset("", ""));
        assert!(!is_reset("", "design"));
        assert!(!is_reset("rust", "all"));
        assert!(!is_reset("rust", ""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_idle_with_baseline() {
        let (store, _, orchestrator) = setup(ScriptedSource::new()).await;
        assert_eq!(orchestrator.status().await.phase, SearchPhase::Idle);
        assert_eq!(orchestrator.inner.baseline.len(), 10);
        assert_eq!(store.lock().await.listings().len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_value_does_not_arm() {
        let (_, source, orchestrator) = setup(ScriptedSource::new()).await;

        let status = orchestrator.set_query("").await;
        assert_eq!(status.phase, SearchPhase::Idle);

        tokio::time::sleep(ms(1500)).await;
        assert!(source.calls().is_empty());
        assert_eq!(orchestrator.status().await.generation, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_category_restores_baseline_without_network() {
        let (store, source, orchestrator) = setup(ScriptedSource::new()).await;
        store.lock().await.set_listings(listings(50..=51, "stale"));

        let status = orchestrator.set_category("all").await;
        assert_eq!(status.phase, SearchPhase::PendingFetch);

        tokio::time::sleep(ms(1100)).await;

        assert!(source.calls().is_empty());
        assert_eq!(ids(&*store.lock().await), (1..=10).collect::<Vec<_>>());
        let status = orchestrator.status().await;
        assert_eq!(status.phase, SearchPhase::Settled);
        assert!(!status.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_typed_then_cleared_within_window_resets() {
        let (store, source, orchestrator) = setup(ScriptedSource::new()).await;

        orchestrator.set_query("ru").await;
        tokio::time::sleep(ms(400)).await;
        orchestrator.set_query("").await;
        tokio::time::sleep(ms(1100)).await;

        assert!(source.calls().is_empty());
        assert_eq!(store.lock().await.listings().len(), 10);
        assert_eq!(orchestrator.status().await.generation, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_coalesce_into_one_fetch_with_latest_value() {
        let (store, source, orchestrator) =
            setup(ScriptedSource::new().reply("abc", "", listings(20..=21, "qa"))).await;

        orchestrator.set_query("a").await;
        tokio::time::sleep(ms(300)).await;
        orchestrator.set_query("ab").await;
        tokio::time::sleep(ms(300)).await;
        orchestrator.set_query("abc").await;

        // 900ms after the last keystroke: still debouncing.
        tokio::time::sleep(ms(900)).await;
        assert!(source.calls().is_empty());
        assert_eq!(orchestrator.status().await.phase, SearchPhase::PendingFetch);

        tokio::time::sleep(ms(200)).await;
        assert_eq!(source.calls(), vec![("abc".to_string(), String::new())]);
        assert_eq!(ids(&*store.lock().await), vec![20, 21]);
        assert_eq!(orchestrator.status().await.phase, SearchPhase::Settled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_uses_values_current_at_fire_time() {
        let (_, source, orchestrator) = setup(ScriptedSource::new()).await;

        orchestrator.set_category("design").await;
        tokio::time::sleep(ms(500)).await;
        orchestrator.set_query("ux").await;
        tokio::time::sleep(ms(1100)).await;

        assert_eq!(
            source.calls(),
            vec![("ux".to_string(), "design".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_category_result_replaces_listings() {
        let (store, source, orchestrator) =
            setup(ScriptedSource::new().reply("", "design", listings(100..=102, "design"))).await;

        orchestrator.set_category("design").await;
        tokio::time::sleep(ms(1100)).await;

        assert_eq!(source.calls(), vec![(String::new(), "design".to_string())]);
        let store = store.lock().await;
        assert_eq!(ids(&store), vec![100, 101, 102]);
        assert_eq!(store.listings_revision(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_is_written_as_empty() {
        let (store, _, orchestrator) = setup(ScriptedSource::new()).await;

        orchestrator.set_query("zzz").await;
        tokio::time::sleep(ms(1100)).await;

        assert!(store.lock().await.listings().is_empty());
        assert_eq!(orchestrator.status().await.phase, SearchPhase::Settled);
    }

    // A failed fetch currently looks exactly like a search with no matches.
    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_is_indistinguishable_from_no_matches() {
        let (store, source, orchestrator) = setup(ScriptedSource::new().fail("rust", "")).await;

        orchestrator.set_query("rust").await;
        tokio::time::sleep(ms(1100)).await;

        assert_eq!(source.calls().len(), 1);
        assert!(store.lock().await.listings().is_empty());
        let status = orchestrator.status().await;
        assert_eq!(status.phase, SearchPhase::Settled);
        assert!(!status.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_asserted_while_fetching() {
        let (_, _, orchestrator) = setup(ScriptedSource::new().reply_after(
            "",
            "design",
            ms(3000),
            listings(1..=3, "design"),
        ))
        .await;

        orchestrator.set_category("design").await;
        tokio::time::sleep(ms(1500)).await;

        let status = orchestrator.status().await;
        assert_eq!(status.phase, SearchPhase::Fetching);
        assert!(status.loading);

        tokio::time::sleep(ms(3000)).await;
        let status = orchestrator.status().await;
        assert_eq!(status.phase, SearchPhase::Settled);
        assert!(!status.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_response_is_discarded() {
        let source = ScriptedSource::new()
            .reply_after("", "design", ms(3000), listings(1..=3, "design"))
            .reply_after("", "sales", ms(100), listings(40..=41, "sales"));
        let (store, source, orchestrator) = setup(source).await;

        orchestrator.set_category("design").await;
        tokio::time::sleep(ms(1100)).await; // fetch A in flight until t=4000
        orchestrator.set_category("sales").await;
        tokio::time::sleep(ms(1200)).await; // fetch B resolved at t=2200

        assert_eq!(ids(&*store.lock().await), vec![40, 41]);

        tokio::time::sleep(ms(2000)).await; // fetch A resolves, stale
        assert_eq!(source.calls().len(), 2);
        assert_eq!(ids(&*store.lock().await), vec![40, 41]);
        let status = orchestrator.status().await;
        assert_eq!(status.generation, 2);
        assert_eq!(status.phase, SearchPhase::Settled);
        assert!(!status.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_fetch_does_not_overwrite_later_reset() {
        let source =
            ScriptedSource::new().reply_after("", "design", ms(3000), listings(1..=3, "design"));
        let (store, _, orchestrator) = setup(source).await;

        orchestrator.set_category("design").await;
        tokio::time::sleep(ms(1100)).await;
        orchestrator.set_category("all").await;
        tokio::time::sleep(ms(4000)).await;

        assert_eq!(ids(&*store.lock().await), (1..=10).collect::<Vec<_>>());
    }

    // An expired timer queued on the machine lock must fetch the value it was
    // armed for, not one written while it waited.
    #[tokio::test(start_paused = true)]
    async fn test_expired_timer_does_not_see_unarmed_edit() {
        let (_, source, orchestrator) = setup(ScriptedSource::new()).await;
        orchestrator.set_query("ab").await;

        let held = orchestrator.inner.machine.lock().await;
        tokio::time::sleep(ms(1100)).await; // timer woke, now waiting on the lock

        let typing = orchestrator.clone();
        let edit = tokio::spawn(async move { typing.set_query("abc").await });
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(orchestrator.inner.store.lock().await.query(), "ab");

        drop(held);
        edit.await.unwrap();
        tokio::time::sleep(ms(2500)).await;

        assert_eq!(
            source.calls(),
            vec![
                ("ab".to_string(), String::new()),
                ("abc".to_string(), String::new()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_during_fetch_keeps_pending_phase() {
        let source = ScriptedSource::new()
            .reply_after("", "design", ms(500), listings(1..=3, "design"))
            .reply("", "qa", listings(7..=7, "qa"));
        let (store, _, orchestrator) = setup(source).await;

        orchestrator.set_category("design").await;
        tokio::time::sleep(ms(1100)).await;
        orchestrator.set_category("qa").await;
        tokio::time::sleep(ms(600)).await;

        // Fetch A was the latest issued when it resolved, but a new timer is armed.
        assert_eq!(ids(&*store.lock().await), vec![1, 2, 3]);
        assert_eq!(orchestrator.status().await.phase, SearchPhase::PendingFetch);

        tokio::time::sleep(ms(600)).await;
        assert_eq!(ids(&*store.lock().await), vec![7]);
        assert_eq!(orchestrator.status().await.phase, SearchPhase::Settled);
    }
}
