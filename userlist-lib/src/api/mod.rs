//! Request and response types for the `/users` endpoint.

pub mod query;
