//! Catalog hierarchy: the category tree, its cache and the fetch ports.

pub mod cache;
pub mod ports;
pub mod tree;

pub use cache::CategoryCache;
pub use ports::{CatalogFetch, CatalogFetchRequest, CategoryFetch};
pub use tree::{CategoryForest, CategoryTree, build_tree, descendant_ids};
