use crate::ids::{BrandId, CategoryId, ProductId};
use chrono::{DateTime, Utc};

/// A catalog row as returned by the product search endpoint.
///
/// The engine treats products as opaque apart from the soft-delete flag, the
/// id (deduplication), the price (ceiling derivation) and the name (keyword
/// matching).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Product {
    pub id: ProductId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub price: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub brand_id: Option<BrandId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category_id: Option<CategoryId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_deleted: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Minimal live product; remaining fields are filled in with the
    /// `with_*` helpers.
    pub fn new(id: impl Into<ProductId>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            price,
            brand_id: None,
            category_id: None,
            is_deleted: false,
            created_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_brand(mut self, brand_id: impl Into<BrandId>) -> Self {
        self.brand_id = Some(brand_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn deleted(mut self, is_deleted: bool) -> Self {
        self.is_deleted = is_deleted;
        self
    }

    /// Live items are the ones the storefront is allowed to show.
    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }
}
