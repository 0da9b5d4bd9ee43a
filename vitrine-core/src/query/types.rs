use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vitrine_model::{
    BrandId, CategoryId, ModelError, PriceRange, SortOrder,
};

/// Page size used by the browse screens when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Which category page the session is browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum CategoryScope {
    /// All products or global search; no implicit category constraint.
    #[default]
    Any,
    /// A specific (sub)category page; only that id is matched.
    Exact(CategoryId),
    /// A parent category page; the category and all of its descendants.
    Subtree(CategoryId),
}

impl CategoryScope {
    pub fn category_id(&self) -> Option<CategoryId> {
        match self {
            CategoryScope::Any => None,
            CategoryScope::Exact(id) | CategoryScope::Subtree(id) => Some(*id),
        }
    }

    /// Whether an explicit category selection may narrow this scope.
    pub fn accepts_selection(&self) -> bool {
        !matches!(self, CategoryScope::Exact(_))
    }
}

/// Facet selection of one browsing session.
///
/// Every filter mutation returns the session to the first page; only the
/// paging setters keep the selection and move the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetState {
    scope: CategoryScope,
    price: PriceRange,
    brand_ids: BTreeSet<BrandId>,
    category_ids: BTreeSet<CategoryId>,
    keyword: Option<String>,
    sort: SortOrder,
    page_index: u32,
    page_size: u32,
}

impl Default for FacetState {
    fn default() -> Self {
        Self {
            scope: CategoryScope::Any,
            price: PriceRange::default(),
            brand_ids: BTreeSet::new(),
            category_ids: BTreeSet::new(),
            keyword: None,
            sort: SortOrder::default(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FacetState {
    pub fn new(scope: CategoryScope, page_size: u32) -> Result<Self, ModelError> {
        if page_size == 0 {
            return Err(ModelError::InvalidPageSize(page_size));
        }
        Ok(Self {
            scope,
            page_size,
            ..Self::default()
        })
    }

    // === Accessors ===

    pub fn scope(&self) -> CategoryScope {
        self.scope
    }

    pub fn price(&self) -> PriceRange {
        self.price
    }

    pub fn brand_ids(&self) -> &BTreeSet<BrandId> {
        &self.brand_ids
    }

    pub fn category_ids(&self) -> &BTreeSet<CategoryId> {
        &self.category_ids
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    // === Filter mutations (reset to the first page) ===

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.price = range;
        self.page_index = 0;
    }

    pub fn set_brands(&mut self, brands: impl IntoIterator<Item = BrandId>) {
        self.brand_ids = brands.into_iter().collect();
        self.page_index = 0;
    }

    /// Flip one brand checkbox. Returns whether the brand is now selected.
    pub fn toggle_brand(&mut self, brand: BrandId) -> bool {
        let selected = toggle(&mut self.brand_ids, brand);
        self.page_index = 0;
        selected
    }

    pub fn set_categories(
        &mut self,
        categories: impl IntoIterator<Item = CategoryId>,
    ) {
        self.category_ids = categories.into_iter().collect();
        self.page_index = 0;
    }

    /// Flip one sub-category checkbox. Returns whether it is now selected.
    pub fn toggle_category(&mut self, category: CategoryId) -> bool {
        let selected = toggle(&mut self.category_ids, category);
        self.page_index = 0;
        selected
    }

    /// Trimmed keyword; blank input clears the keyword.
    pub fn set_keyword(&mut self, keyword: Option<&str>) {
        self.keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned);
        self.page_index = 0;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page_index = 0;
    }

    /// Clear brand, category and price facets. Keyword and sort survive, as
    /// they are not part of the filter panel.
    pub fn reset_filters(&mut self, price_ceiling: f64) {
        self.brand_ids.clear();
        self.category_ids.clear();
        self.price = PriceRange::full(price_ceiling);
        self.page_index = 0;
    }

    /// Return to defaults for a newly browsed category page.
    pub fn navigate(&mut self, scope: CategoryScope) {
        *self = Self {
            scope,
            page_size: self.page_size,
            ..Self::default()
        };
    }

    // === Paging ===

    pub fn set_page(&mut self, page_index: u32) {
        self.page_index = page_index;
    }

    pub fn next_page(&mut self) {
        self.page_index = self.page_index.saturating_add(1);
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), ModelError> {
        if page_size == 0 {
            return Err(ModelError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.page_index = 0;
        Ok(())
    }

    // === Queries ===

    /// Whether any filter-panel facet is narrowed, i.e. "reset" would change
    /// something.
    pub fn has_active_filters(&self, price_ceiling: f64) -> bool {
        !self.brand_ids.is_empty()
            || !self.category_ids.is_empty()
            || !self.price.covers(price_ceiling)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.page_size == 0 {
            return Err(ModelError::InvalidPageSize(self.page_size));
        }
        PriceRange::new(self.price.min, self.price.max)?;
        Ok(())
    }

    /// Replace the price range without moving the cursor. Used when the
    /// session widens the slider to a freshly derived ceiling.
    pub(crate) fn replace_price(&mut self, range: PriceRange) {
        self.price = range;
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}
