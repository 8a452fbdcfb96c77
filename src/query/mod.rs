pub mod listing;
pub mod sort;

pub use listing::{ItemPage, ListingParams, ListingQuery};
pub use sort::SortKey;
