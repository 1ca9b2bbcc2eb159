//! The user listing view.
//!
//! [`UserListView`] turns UI events into store transitions and keeps the
//! store's side effects in step with its state: whenever the page or sort
//! changes a fetch is dispatched, whenever the filter changes the displayed
//! users are recomputed.

mod markup;
mod scroll;

pub use markup::Markup;
pub use scroll::{BOTTOM_THRESHOLD, ScrollMetrics};

use std::sync::Arc;

use tokio::task::JoinHandle;
use userlist_lib::UserSource;
use userlist_lib::api::query::{FilterField, FilterSpec, PageRequest, SortKey, SortSpec, UnknownGender};

use crate::store::{FetchOutcome, Store};

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    /// Sort key when the header is clickable.
    pub sort: Option<SortKey>,
}

/// Table columns, left to right.
pub const COLUMNS: [Column; 6] = [
    Column {
        label: "ID",
        sort: Some(SortKey::Id),
    },
    Column {
        label: "Image",
        sort: None,
    },
    Column {
        label: "Full Name",
        sort: Some(SortKey::Name),
    },
    Column {
        label: "Age",
        sort: Some(SortKey::Age),
    },
    Column {
        label: "Designation",
        sort: None,
    },
    Column {
        label: "Location",
        sort: None,
    },
];

/// Drives a [`Store`] from user interaction.
pub struct UserListView {
    store: Store,
    source: Arc<dyn UserSource>,
    page_size: u32,
    /// Whether the scroll listener is attached.
    mounted: bool,
    /// (page, sort) the last fetch effect ran for.
    fetched: Option<(u32, SortSpec)>,
    /// Filter the last filter effect ran for.
    filtered: Option<FilterSpec>,
    pending: Vec<JoinHandle<FetchOutcome>>,
}

impl UserListView {
    pub fn new(store: Store, source: Arc<dyn UserSource>, page_size: u32) -> Self {
        Self {
            store,
            source,
            page_size,
            mounted: false,
            fetched: None,
            filtered: None,
            pending: Vec::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Attaches the scroll listener and runs the initial effects.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) {
        log::debug!("user list mounted");
        self.mounted = true;
        self.run_effects();
    }

    /// Detaches the scroll listener. In-flight fetches still settle.
    pub fn unmount(&mut self) {
        log::debug!("user list unmounted");
        self.mounted = false;
    }

    /// Runs every effect whose inputs changed since it last ran.
    pub fn run_effects(&mut self) {
        let (page, sort, filter) = self.store.read(|s| (s.page, s.sort, s.filter.clone()));

        if self.fetched != Some((page, sort)) {
            self.fetched = Some((page, sort));
            if self.store.loaded() != Some((page, sort)) {
                self.dispatch_fetch(PageRequest::new(page, self.page_size).sort(sort));
            }
        }

        if self.filtered.as_ref() != Some(&filter) {
            self.store.apply_filters();
            self.filtered = Some(filter);
        }
    }

    /// Handles a scroll event. Returns `true` if a page was requested.
    ///
    /// Nothing happens unless the viewport is at the bottom, no fetch is in
    /// flight and the last page was not empty. The page advances when the
    /// current one is loaded; otherwise its failed fetch is issued again.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        if !self.mounted || !metrics.near_bottom() {
            return false;
        }

        let (page, sort, loading, has_more) =
            self.store.read(|s| (s.page, s.sort, s.loading, s.has_more));
        if loading || !has_more {
            return false;
        }

        if self.store.loaded() == Some((page, sort)) {
            self.store.increment_page();
            log::debug!("scrolled to bottom, page {}", page + 1);
        } else {
            log::debug!("scrolled to bottom, page {} not loaded yet", page);
        }
        self.fetched = None;
        self.run_effects();
        true
    }

    /// Handles a click on a column header and returns the new sort.
    ///
    /// Restarts the listing at page 1 under the new sort immediately.
    pub fn on_sort_click(&mut self, key: SortKey) -> SortSpec {
        let sort = self.store.read(|s| s.sort).toggled(key);
        log::debug!("sort by {} {}", sort.key, sort.direction.as_str());

        self.store.set_sort(sort);
        self.store.reset_page();
        self.fetched = Some((1, sort));
        self.dispatch_fetch(PageRequest::new(1, self.page_size).sort(sort));
        sort
    }

    /// Handles a change of one filter control.
    ///
    /// An empty `value` means "any".
    pub fn on_filter_change(&mut self, field: FilterField, value: &str) -> Result<(), UnknownGender> {
        let filter = self.store.read(|s| s.filter.with_value(field, value))?;
        log::debug!("filter {} = {:?}", field.name(), value);

        self.store.set_filter(filter.clone());
        self.store.apply_filters();
        self.filtered = Some(filter);
        Ok(())
    }

    /// Waits for every dispatched fetch to settle.
    pub async fn settle(&mut self) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::with_capacity(self.pending.len());
        for handle in self.pending.drain(..) {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => log::error!("fetch task failed: {}", e),
            }
        }
        outcomes
    }

    fn dispatch_fetch(&mut self, request: PageRequest) {
        self.pending.retain(|handle| !handle.is_finished());
        let fetch = self.store.fetch_users(self.source.clone(), request);
        self.pending.push(tokio::spawn(fetch));
    }
}

impl Drop for UserListView {
    fn drop(&mut self) {
        for handle in &self.pending {
            handle.abort();
        }
    }
}
