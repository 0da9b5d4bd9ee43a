use super::types::{CategoryScope, FacetState};
use vitrine_model::{
    BrandId, CategoryId, ModelError, PriceRange, SortOrder,
};

/// Fluent API for building facet selections
#[derive(Debug, Clone, Default)]
pub struct FacetQueryBuilder {
    state: FacetState,
    page_size: Option<u32>,
    page_index: u32,
}

impl FacetQueryBuilder {
    /// Create a new builder with default facets
    pub fn new() -> Self {
        Self::default()
    }

    // === Scope methods ===

    /// Browse a single (sub)category
    pub fn in_category(mut self, id: CategoryId) -> Self {
        self.state.navigate(CategoryScope::Exact(id));
        self
    }

    /// Browse a category together with all of its descendants
    pub fn under_category(mut self, id: CategoryId) -> Self {
        self.state.navigate(CategoryScope::Subtree(id));
        self
    }

    // === Filter methods ===

    /// Filter by brand
    pub fn brand(mut self, brand: BrandId) -> Self {
        let mut brands = self.state.brand_ids().clone();
        brands.insert(brand);
        self.state.set_brands(brands);
        self
    }

    /// Filter by multiple brands
    pub fn brands(mut self, brands: impl IntoIterator<Item = BrandId>) -> Self {
        self.state.set_brands(brands);
        self
    }

    /// Narrow to an explicit sub-category
    pub fn category(mut self, category: CategoryId) -> Self {
        let mut categories = self.state.category_ids().clone();
        categories.insert(category);
        self.state.set_categories(categories);
        self
    }

    /// Narrow to explicit sub-categories
    pub fn categories(
        mut self,
        categories: impl IntoIterator<Item = CategoryId>,
    ) -> Self {
        self.state.set_categories(categories);
        self
    }

    /// Filter by price; bounds are reordered if given high-to-low
    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.state.set_price_range(PriceRange::normalized(min, max));
        self
    }

    /// Add keyword search on product names
    pub fn search(mut self, keyword: impl AsRef<str>) -> Self {
        self.state.set_keyword(Some(keyword.as_ref()));
        self
    }

    // === Sort & pagination ===

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.state.set_sort(sort);
        self
    }

    pub fn page(mut self, page_index: u32) -> Self {
        self.page_index = page_index;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Build the facet state, validating page size and price bounds
    pub fn build(self) -> Result<FacetState, ModelError> {
        let mut state = self.state;
        if let Some(size) = self.page_size {
            state.set_page_size(size)?;
        }
        state.set_page(self.page_index);
        state.validate()?;
        Ok(state)
    }
}
