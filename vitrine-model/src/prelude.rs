//! UI focused snapshot of the model surface.
//! Prefer importing from this module instead of individual modules when
//! working in browse screens or other presentation layers.

pub use super::category::CategoryNode;
pub use super::ids::{BrandId, CategoryId, ProductId};
pub use super::page::{FetchedPage, PageMeta, ResultPage};
pub use super::price::PriceRange;
pub use super::product::Product;
pub use super::sort::SortOrder;
