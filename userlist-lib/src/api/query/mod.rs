//! Paging, ordering and filtering for user queries.

mod filter;
mod order;
mod page;

pub use filter::*;
pub use order::*;
pub use page::*;
