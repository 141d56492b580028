pub mod count;
pub mod growth;
pub mod index;

pub use growth::{mine, rank_patterns};
pub use index::ItemIndex;
