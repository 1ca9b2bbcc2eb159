//! User listing API client library
//!
//! An async client for the paginated `/users` endpoint, plus the sort, filter
//! and page types shared by the listing view.

pub mod api;
pub mod error;
pub mod model;

mod client;
mod source;

pub use client::*;
pub use source::UserSource;
