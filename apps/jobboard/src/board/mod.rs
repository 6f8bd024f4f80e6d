// Board session: filter store, debounced search, pagination and the views built on them.
// The store is the only shared state; the orchestrator and the listing view both
// receive it by handle, never through a global.

pub mod handlers;
pub mod orchestrator;
pub mod pagination;
pub mod source;
pub mod store;
pub mod view;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::models::{Application, Listing};
use orchestrator::{SearchOrchestrator, SearchStatus};
use pagination::PaginationView;
use source::ListingSource;
use store::{FilterStore, SharedStore};
use view::{AppliedList, BoardPage, CategoryAnalysis, JobDetail};

pub struct Board {
    store: SharedStore,
    search: SearchOrchestrator,
    pagination: Mutex<PaginationView>,
}

impl Board {
    /// Seeds the store with `baseline`, which also becomes the orchestrator's
    /// "no filters" fallback.
    pub async fn new(
        baseline: Vec<Listing>,
        source: Arc<dyn ListingSource>,
        debounce: Duration,
    ) -> Self {
        let store = FilterStore::new(baseline).shared();
        let search = SearchOrchestrator::new(store.clone(), source, debounce).await;
        Self {
            store,
            search,
            pagination: Mutex::new(PaginationView::default()),
        }
    }

    pub async fn set_filters(&self, query: Option<&str>, category: Option<&str>) -> SearchStatus {
        let mut status = None;
        if let Some(query) = query {
            status = Some(self.search.set_query(query).await);
        }
        if let Some(category) = category {
            status = Some(self.search.set_category(category).await);
        }
        match status {
            Some(status) => status,
            None => self.search.status().await,
        }
    }

    /// Renders the current page, snapping back to page 1 if a new result
    /// landed since the last render.
    pub async fn page(&self) -> BoardPage {
        // Status first: the orchestrator locks its machine before the store.
        let search = self.search.status().await;
        let store = self.store.lock().await;
        let mut pagination = self.pagination.lock().await;
        pagination.sync(store.listings_revision());

        let listings = store.listings();
        BoardPage::new(
            store.query().to_string(),
            store.category().to_string(),
            search,
            pagination.info(listings.len()),
            pagination.slice(&listings[..]),
        )
    }

    pub async fn next_page(&self) -> BoardPage {
        self.move_page(true).await;
        self.page().await
    }

    pub async fn previous_page(&self) -> BoardPage {
        self.move_page(false).await;
        self.page().await
    }

    async fn move_page(&self, forward: bool) {
        let store = self.store.lock().await;
        let mut pagination = self.pagination.lock().await;
        pagination.sync(store.listings_revision());
        if forward {
            pagination.next(store.listings().len());
        } else {
            pagination.previous();
        }
    }

    pub async fn job_detail(&self, job_id: i64, expanded: bool) -> Option<JobDetail> {
        let listing = self.store.lock().await.find_listing(job_id)?;
        Some(JobDetail::new(&listing, expanded))
    }

    /// Advisory duplicate check made before the application form is shown.
    /// Not authoritative: `record_application` never rejects.
    pub async fn has_applied(&self, job_id: i64) -> bool {
        self.store.lock().await.has_applied(job_id)
    }

    pub async fn record_application(&self, application: Application) {
        self.store.lock().await.record_application(application);
    }

    pub async fn applications(&self) -> AppliedList {
        AppliedList::new(self.store.lock().await.applications().to_vec())
    }

    pub async fn analysis(&self) -> CategoryAnalysis {
        let listings = self.store.lock().await.listings();
        CategoryAnalysis::from_listings(&listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::orchestrator::DEFAULT_DEBOUNCE;
    use crate::board::source::testing::ScriptedSource;
    use crate::board::store::fixtures::{application, listings};
    use crate::board::view::NO_JOBS_MESSAGE;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    async fn make_board(source: ScriptedSource) -> (Arc<ScriptedSource>, Board) {
        let source = Arc::new(source);
        let board = Board::new(listings(1..=10, "Baseline"), source.clone(), DEFAULT_DEBOUNCE).await;
        (source, board)
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_first_page() {
        let (_, board) = make_board(ScriptedSource::new()).await;
        let page = board.page().await;

        assert_eq!(page.jobs.len(), 6);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.show_next);
        assert!(!page.pagination.show_previous);
        assert!(page.message.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_design_filter_scenario() {
        let (source, board) =
            make_board(ScriptedSource::new().reply("", "design", listings(101..=103, "Design"))).await;

        let page = board.next_page().await;
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.jobs.len(), 4);

        board.set_filters(None, Some("design")).await;
        tokio::time::sleep(ms(1100)).await;

        assert_eq!(source.calls(), vec![(String::new(), "design".to_string())]);
        let page = board.page().await;
        assert_eq!(page.category, "design");
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.show_next);
        assert_eq!(
            page.jobs.iter().map(|j| j.id).collect::<Vec<_>>(),
            vec![101, 102, 103]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_result_resets_page_even_when_still_valid() {
        let (_, board) =
            make_board(ScriptedSource::new().reply("dev", "", listings(200..=220, "Software"))).await;

        board.next_page().await;
        board.set_filters(Some("dev"), None).await;
        tokio::time::sleep(ms(1100)).await;

        let page = board.page().await;
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.jobs[0].id, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_moves_do_not_reset() {
        let (_, board) = make_board(ScriptedSource::new()).await;
        board.next_page().await;
        assert_eq!(board.page().await.pagination.page, 2);
        assert_eq!(board.previous_page().await.pagination.page, 1);
        assert_eq!(board.previous_page().await.pagination.page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_renders_no_jobs_found() {
        let (_, board) = make_board(ScriptedSource::new()).await;

        board.set_filters(Some("zzz"), None).await;
        tokio::time::sleep(ms(1100)).await;

        let page = board.page().await;
        assert!(page.jobs.is_empty());
        assert_eq!(page.message, Some(NO_JOBS_MESSAGE));
        assert!(!page.pagination.show_next);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_applications_are_recorded() {
        let (_, board) = make_board(ScriptedSource::new()).await;
        assert!(!board.has_applied(3).await);

        board.record_application(application(3)).await;
        assert!(board.has_applied(3).await);

        board.record_application(application(3)).await;
        assert_eq!(board.applications().await.applications.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_detail_comes_from_current_set() {
        let (_, board) = make_board(ScriptedSource::new()).await;
        assert!(board.job_detail(4, false).await.is_some());
        assert!(board.job_detail(999, false).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_tracks_current_set() {
        let (_, board) = make_board(ScriptedSource::new()).await;
        let analysis = board.analysis().await;
        assert_eq!(analysis.counts.len(), 1);
        assert_eq!(analysis.counts[0].count, 10);
    }
}
