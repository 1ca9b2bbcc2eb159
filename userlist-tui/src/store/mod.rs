//! State container for the user listing.
//!
//! [`Store`] owns a [`ListState`] and exposes the only transitions allowed on
//! it. It is a cheap, cloneable handle: the view, spawned fetch tasks and the
//! terminal loop all share one instance, while tests build as many
//! independent stores as they need.

mod fetch;

pub use fetch::FetchOutcome;

use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use userlist_lib::api::query::{FilterSpec, SortSpec};
use userlist_lib::model::User;

/// Everything the listing view renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    /// Every user loaded so far, unfiltered, in fetch order.
    pub all_users: Vec<User>,
    /// The subsequence of `all_users` that matches `filter`.
    pub users: Vec<User>,
    /// 1-based page of the most recently requested page.
    pub page: u32,
    /// True while the newest fetch is in flight.
    pub loading: bool,
    /// False once a fetch returned an empty page.
    pub has_more: bool,
    pub sort: SortSpec,
    pub filter: FilterSpec,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            all_users: Vec::new(),
            users: Vec::new(),
            page: 1,
            loading: false,
            has_more: true,
            sort: SortSpec::default(),
            filter: FilterSpec::default(),
        }
    }
}

impl ListState {
    /// Recomputes `users` from `all_users` and `filter`.
    fn refilter(&mut self) {
        self.users = self.filter.apply(&self.all_users);
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    state: ListState,
    /// Sequence number of the newest fetch issued.
    latest_fetch: u64,
    /// Page and sort of the last response stored in `all_users`.
    loaded: Option<(u32, SortSpec)>,
}

/// Shared handle to the listing state.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<RwLock<StoreInner>>,
    revision: watch::Sender<u64>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a store holding the default state.
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
            revision,
        }
    }

    /// Returns a clone of the current state.
    pub fn snapshot(&self) -> ListState {
        self.read(Clone::clone)
    }

    /// Runs `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&ListState) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard.state),
            Err(poisoned) => f(&poisoned.into_inner().state),
        }
    }

    /// Page and sort of the last page stored, if any page loaded yet.
    pub fn loaded(&self) -> Option<(u32, SortSpec)> {
        match self.inner.read() {
            Ok(guard) => guard.loaded,
            Err(poisoned) => poisoned.into_inner().loaded,
        }
    }

    /// Receiver that observes a new revision after every transition.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Advances to the next page.
    pub fn increment_page(&self) {
        self.update(|s| s.page += 1);
    }

    /// Returns to the first page.
    pub fn reset_page(&self) {
        self.update(|s| s.page = 1);
    }

    /// Replaces the sort spec.
    pub fn set_sort(&self, sort: SortSpec) {
        self.update(|s| s.sort = sort);
    }

    /// Replaces the filter spec.
    ///
    /// `users` is left alone until [`apply_filters`](Self::apply_filters).
    pub fn set_filter(&self, filter: FilterSpec) {
        self.update(|s| s.filter = filter);
    }

    /// Recomputes the displayed users from the loaded ones.
    pub fn apply_filters(&self) {
        self.update(ListState::refilter);
    }

    fn update(&self, f: impl FnOnce(&mut ListState)) {
        self.update_inner(|inner| f(&mut inner.state));
    }

    fn update_inner<R>(&self, f: impl FnOnce(&mut StoreInner) -> R) -> R {
        let result = match self.inner.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        };
        self.revision.send_modify(|rev| *rev += 1);
        result
    }
}
