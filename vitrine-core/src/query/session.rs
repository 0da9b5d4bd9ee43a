use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};
use vitrine_model::{BrandId, PriceRange, ResultPage};

use super::ceiling::{CeilingPolicy, PriceCeiling};
use super::expr::Clause;
use super::filtering::{CompileContext, compile_facets};
use super::keyword::KeywordMatcher;
use super::paginator::{BackfillRequest, LiveItemPaginator};
use super::types::{CategoryScope, FacetState};
use crate::catalog::{CategoryCache, CategoryForest};
use crate::error::Result;

/// State of one browsing screen: facet selection, the frozen price ceiling
/// and the brands discovered on the first load.
///
/// `fetch_page` takes `&mut self`, so a session runs at most one
/// accumulation at a time.
#[derive(Debug)]
pub struct BrowseSession {
    paginator: LiveItemPaginator,
    forest: Option<Arc<CategoryForest>>,
    state: FacetState,
    ceiling: PriceCeiling,
    observed_brands: BTreeSet<BrandId>,
}

impl BrowseSession {
    pub fn new(
        paginator: LiveItemPaginator,
        forest: Option<Arc<CategoryForest>>,
        state: FacetState,
        policy: CeilingPolicy,
    ) -> Self {
        Self {
            paginator,
            forest,
            state,
            ceiling: PriceCeiling::new(policy),
            observed_brands: BTreeSet::new(),
        }
    }

    /// Session whose subtree scopes expand through the shared category cache.
    /// Loads the forest if the cache is still cold.
    pub async fn with_cache(
        paginator: LiveItemPaginator,
        cache: &CategoryCache,
        state: FacetState,
        policy: CeilingPolicy,
    ) -> Result<Self> {
        let forest = cache.forest().await?;
        Ok(Self::new(paginator, Some(forest), state, policy))
    }

    pub fn state(&self) -> &FacetState {
        &self.state
    }

    /// Direct access for facet edits coming from the UI.
    pub fn state_mut(&mut self) -> &mut FacetState {
        &mut self.state
    }

    pub fn forest(&self) -> Option<&CategoryForest> {
        self.forest.as_deref()
    }

    pub fn set_forest(&mut self, forest: Option<Arc<CategoryForest>>) {
        self.forest = forest;
    }

    pub fn price_ceiling(&self) -> f64 {
        self.ceiling.value()
    }

    /// Brand options for the filter panel, taken from the first load.
    pub fn observed_brands(&self) -> &BTreeSet<BrandId> {
        &self.observed_brands
    }

    pub fn compile(&self) -> Clause {
        let ctx = CompileContext::new(self.forest.as_deref(), self.ceiling.value());
        compile_facets(&self.state, &ctx)
    }

    pub fn filter_string(&self) -> String {
        self.compile().to_wire()
    }

    /// Start over on another category page: facets, ceiling and brand
    /// options all return to their defaults.
    pub fn navigate(&mut self, scope: CategoryScope) {
        self.state.navigate(scope);
        self.ceiling.reset();
        self.observed_brands.clear();
    }

    /// Clear the filter panel back to the full price range.
    pub fn reset_filters(&mut self) {
        self.state.reset_filters(self.ceiling.value());
    }

    /// Load the page at the current cursor.
    ///
    /// The first load that yields live items seeds the price ceiling. An
    /// untouched price range is widened to `[0, ceiling]`; a narrowed one is
    /// kept. Later loads never change the ceiling.
    pub async fn fetch_page(&mut self) -> Result<ResultPage> {
        self.state.validate()?;
        let keyword = self.state.keyword().and_then(KeywordMatcher::new);
        let keyword_active = keyword.is_some();
        let request = BackfillRequest::new(self.filter_string(), self.state.page_size())
            .at_page(self.state.page_index())
            .sorted_by(self.state.sort())
            .with_keyword(keyword);

        // A range the shopper already narrowed survives seeding.
        let price_untouched = self.state.price().covers(self.ceiling.value());
        let backfill = self.paginator.fill(&request).await?;

        if let Some(ceiling) = self.ceiling.seed_from(&backfill.items) {
            info!(ceiling, "price ceiling derived from first load");
            if price_untouched {
                self.state.replace_price(PriceRange::full(ceiling));
            }
            self.observed_brands = backfill
                .items
                .iter()
                .filter_map(|product| product.brand_id)
                .collect();
        }

        let total_count = match backfill.backend_total {
            Some(total) if !keyword_active => total,
            _ => backfill.items.len() as u64,
        };
        debug!(
            items = backfill.items.len(),
            total_count,
            rounds = backfill.rounds,
            "browse page ready"
        );

        Ok(ResultPage {
            items: backfill.items,
            total_count,
            price_ceiling: self.ceiling.value(),
        })
    }
}
