//! Page request and page result types.

use serde::Deserialize;

use super::SortSpec;
use crate::model::User;

/// Page size used by the listing view.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Request for one page of users.
///
/// Pages are 1-based; page `n` starts at offset `(n - 1) * page_size`.
///
/// # Example
///
/// ```
/// use userlist_lib::api::query::{PageRequest, SortKey, SortSpec};
///
/// let request = PageRequest::new(3, 30).sort(SortSpec::desc(SortKey::Age));
/// assert_eq!(request.skip(), 60);
/// assert_eq!(request.limit(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub sort: SortSpec,
}

impl PageRequest {
    /// Creates a request with the default sort. `page` is clamped to at least 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
            sort: SortSpec::default(),
        }
    }

    /// Sets the sort order.
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Number of records requested.
    pub fn limit(&self) -> u32 {
        self.page_size
    }

    /// Offset of the first record.
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Query string parameters for the `/users` endpoint.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit().to_string()),
            ("skip", self.skip().to_string()),
            ("sortBy", self.sort.key.api_field().to_string()),
            ("order", self.sort.direction.as_str().to_string()),
        ]
    }
}

/// A page of users.
///
/// The endpoint reports no reliable "next page" marker; an empty page is
/// the end-of-data signal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    users: Vec<User>,
    /// Total record count reported by the server, if any.
    #[serde(default)]
    total: Option<u64>,
}

impl Page {
    /// Creates a page from users.
    pub fn new(users: Vec<User>) -> Self {
        Self { users, total: None }
    }

    /// Returns a reference to the users in this page.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Consumes the page and returns the users.
    pub fn into_users(self) -> Vec<User> {
        self.users
    }

    /// Returns the total record count, if the server reported one.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns `true` if this page has no users.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Returns the number of users in this page.
    pub fn len(&self) -> usize {
        self.users.len()
    }
}
