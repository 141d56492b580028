//! Frequent itemset mining over transaction lists.
//!
//! [`mine`] grows patterns by prefix over conditional transaction bases;
//! [`TransactionalDatabase`] loads transaction files and answers
//! whole-database support queries around it.

pub mod database;
pub mod error;
pub mod itemsets;
pub mod support;
pub mod types;

#[cfg(feature = "python")]
mod wrapper;

pub use database::{DatabaseStats, TransactionalDatabase};
pub use error::MineError;
pub use itemsets::{mine, rank_patterns};
pub use support::MinSupport;
