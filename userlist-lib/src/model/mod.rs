//! Data model types

mod user;

pub use user::*;
