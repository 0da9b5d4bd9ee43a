//! Core data model definitions shared across Vitrine crates.
#![allow(missing_docs)]

pub mod category;
pub mod error;
pub mod ids;
pub mod page;
pub mod prelude;
pub mod price;
pub mod product;
pub mod sort;

// Intentionally curated re-exports for downstream consumers.
pub use category::CategoryNode;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{BrandId, CategoryId, ProductId};
pub use page::{FetchedPage, PageMeta, ResultPage};
pub use price::PriceRange;
pub use product::Product;
pub use sort::SortOrder;
