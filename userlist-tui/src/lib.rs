//! Infinite-scrolling user listing.
//!
//! A [`store::Store`] holds the listing state, a [`view::UserListView`] drives
//! it from user input, and [`app::App`] puts the view in a terminal.

pub mod app;
pub mod config;
pub mod error;
pub mod paths;
pub mod store;
pub mod terminal;
pub mod view;
pub mod widgets;
