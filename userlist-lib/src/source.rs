//! Source of user pages.

use async_trait::async_trait;

use crate::api::query::{Page, PageRequest};
use crate::error::Error;

/// Anything that can produce a page of users.
///
/// [`UsersClient`](crate::UsersClient) is the HTTP implementation; the
/// listing view only depends on this trait.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Fetches the page described by `request`.
    async fn fetch_users(&self, request: &PageRequest) -> Result<Page, Error>;
}
