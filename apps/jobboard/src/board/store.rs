use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::{Application, Listing};

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Store handle shared by the orchestrator and the listing view.
pub type SharedStore = Arc<Mutex<FilterStore>>;

/// Single source of truth for the board's filter inputs, the current listing
/// set, and the applications recorded this session.
///
/// Every mutation is synchronous and applies completely. `set_listings` bumps
/// `listings_revision` even when the new set equals the old one, which is what
/// the pagination view keys its reset on.
#[derive(Debug)]
pub struct FilterStore {
    query: String,
    category: String,
    listings: Arc<[Listing]>,
    listings_revision: u64,
    applications: Vec<Application>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FilterStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            query: String::new(),
            category: String::new(),
            listings: listings.into(),
            listings_revision: 0,
            applications: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn listings(&self) -> Arc<[Listing]> {
        Arc::clone(&self.listings)
    }

    pub fn listings_revision(&self) -> u64 {
        self.listings_revision
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn set_listings(&mut self, listings: Vec<Listing>) {
        self.listings = listings.into();
        self.listings_revision += 1;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Appends unconditionally. Duplicate applications for one job are allowed
    /// here; the advisory check lives with the apply action.
    pub fn record_application(&mut self, application: Application) {
        self.applications.push(application);
    }

    pub fn has_applied(&self, job_id: i64) -> bool {
        self.applications.iter().any(|a| a.job_id == job_id)
    }

    pub fn find_listing(&self, job_id: i64) -> Option<Listing> {
        self.listings.iter().find(|l| l.id == job_id).cloned()
    }
}
