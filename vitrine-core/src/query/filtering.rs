//! Translate a [`FacetState`] into the tagged expression sent to the catalog.
//!
//! Clause order is fixed (category, brand, price) so identical selections
//! always produce identical wire strings. Each clause is left out when it
//! would not narrow the result:
//!
//! - category: the routed scope decides the implicit set; an explicit
//!   sub-category selection replaces it unless the route pins one category;
//! - brand: omitted when no brand is ticked;
//! - price: omitted while the range spans `[0, ceiling]`.
//!
//! The keyword never reaches the wire; the paginator applies it locally.

use std::collections::BTreeSet;
use vitrine_model::CategoryId;

use super::expr::{Clause, Field};
use super::types::{CategoryScope, FacetState};
use crate::catalog::CategoryForest;

/// Inputs the compiler needs beyond the facet selection itself.
#[derive(Debug, Clone, Copy)]
pub struct CompileContext<'a> {
    /// Category forest used to expand subtree scopes. Without one, a subtree
    /// scope only matches its own id.
    pub forest: Option<&'a CategoryForest>,
    pub price_ceiling: f64,
}

impl<'a> CompileContext<'a> {
    pub fn new(forest: Option<&'a CategoryForest>, price_ceiling: f64) -> Self {
        Self {
            forest,
            price_ceiling,
        }
    }
}

/// Build the conjunction of category, brand and price clauses.
pub fn compile_facets(state: &FacetState, ctx: &CompileContext<'_>) -> Clause {
    let categories = category_set(state, ctx);
    let price = state.price();

    let mut clauses = Vec::with_capacity(3);
    if !categories.is_empty() {
        clauses.push(Clause::in_set(Field::CategoryId, categories));
    }
    if !state.brand_ids().is_empty() {
        clauses.push(Clause::in_set(
            Field::BrandId,
            state.brand_ids().iter().copied(),
        ));
    }
    if !price.covers(ctx.price_ceiling) {
        clauses.push(Clause::range(Field::Price, price.min, price.max));
    }
    Clause::and(clauses)
}

/// Wire-level predicate for `state`; empty when nothing is constrained.
pub fn compile_filter(state: &FacetState, ctx: &CompileContext<'_>) -> String {
    compile_facets(state, ctx).to_wire()
}

fn category_set(
    state: &FacetState,
    ctx: &CompileContext<'_>,
) -> BTreeSet<CategoryId> {
    let explicit = state.category_ids();
    match state.scope() {
        CategoryScope::Exact(id) => BTreeSet::from([id]),
        CategoryScope::Subtree(id) if explicit.is_empty() => match ctx.forest {
            Some(forest) => forest.descendant_ids(id),
            None => BTreeSet::from([id]),
        },
        CategoryScope::Subtree(_) | CategoryScope::Any => explicit.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_model::{BrandId, CategoryNode, PriceRange, Product};

    const CEILING: f64 = 500_000.0;

    fn forest() -> CategoryForest {
        CategoryForest::build(&[
            CategoryNode::root(1, "Men"),
            CategoryNode::child(2, "Shirts", 1),
            CategoryNode::child(3, "Trousers", 1),
            CategoryNode::child(4, "Polo", 2),
        ])
    }

    fn state(scope: CategoryScope) -> FacetState {
        let mut state = FacetState::default();
        state.navigate(scope);
        state.replace_price(PriceRange::full(CEILING));
        state
    }

    #[test]
    fn unconstrained_state_compiles_to_empty_filter() {
        let forest = forest();
        let ctx = CompileContext::new(Some(&forest), CEILING);
        assert_eq!(compile_filter(&state(CategoryScope::Any), &ctx), "");
    }

    #[test]
    fn subtree_scope_expands_descendants() {
        let forest = forest();
        let ctx = CompileContext::new(Some(&forest), CEILING);
        let clause =
            compile_facets(&state(CategoryScope::Subtree(CategoryId(1))), &ctx);
        assert_eq!(clause.find_set(Field::CategoryId), Some(&[1i64, 2, 3, 4][..]));
    }

    #[test]
    fn explicit_selection_overrides_subtree() {
        let forest = forest();
        let ctx = CompileContext::new(Some(&forest), CEILING);
        let mut state = state(CategoryScope::Subtree(CategoryId(1)));
        state.toggle_category(CategoryId(3));

        assert_eq!(
            compile_filter(&state, &ctx),
            "(category.categoryId:3)"
        );
    }

    #[test]
    fn exact_scope_ignores_explicit_selection() {
        let forest = forest();
        let ctx = CompileContext::new(Some(&forest), CEILING);
        let mut state = state(CategoryScope::Exact(CategoryId(2)));
        state.toggle_category(CategoryId(3));

        assert_eq!(
            compile_filter(&state, &ctx),
            "(category.categoryId:2)"
        );
    }

    #[test]
    fn explicit_subcategory_and_brands_are_and_joined() {
        let forest = CategoryForest::build(&[
            CategoryNode::root(10, "Women"),
            CategoryNode::child(11, "Dresses", 10),
            CategoryNode::child(12, "Skirts", 10),
        ]);
        let ctx = CompileContext::new(Some(&forest), CEILING);
        let mut state = state(CategoryScope::Subtree(CategoryId(10)));
        state.toggle_category(CategoryId(11));
        state.set_brands([BrandId(2), BrandId(1)]);

        assert_eq!(
            compile_filter(&state, &ctx),
            "(category.categoryId:11) and (brand.brandId:1 or brand.brandId:2)"
        );
    }

    #[test]
    fn category_and_brand_sets_without_scope() {
        let ctx = CompileContext::new(None, CEILING);
        let mut state = state(CategoryScope::Any);
        state.set_categories([CategoryId(6), CategoryId(5)]);
        state.set_brands([BrandId(1), BrandId(2)]);

        assert_eq!(
            compile_filter(&state, &ctx),
            "(category.categoryId:5 or category.categoryId:6) \
             and (brand.brandId:1 or brand.brandId:2)"
        );
    }

    #[test]
    fn subtree_without_forest_filters_on_own_id() {
        let ctx = CompileContext::new(None, CEILING);
        let clause =
            compile_facets(&state(CategoryScope::Subtree(CategoryId(9))), &ctx);
        assert_eq!(clause.find_set(Field::CategoryId), Some(&[9i64][..]));
    }

    #[test]
    fn clauses_keep_category_brand_price_order() {
        let forest = forest();
        let ctx = CompileContext::new(Some(&forest), CEILING);
        let mut state = state(CategoryScope::Exact(CategoryId(4)));
        state.set_brands([BrandId(7), BrandId(2)]);
        state.set_price_range(PriceRange::normalized(50_000.0, 0.0));

        assert_eq!(
            compile_filter(&state, &ctx),
            "(category.categoryId:4) and (brand.brandId:2 or brand.brandId:7) \
             and (price>:0 and price<:50000)"
        );
    }

    #[test]
    fn full_price_range_is_omitted() {
        let ctx = CompileContext::new(None, CEILING);
        let mut state = state(CategoryScope::Any);
        state.set_price_range(PriceRange::normalized(0.0, CEILING + 1.0));
        assert!(compile_facets(&state, &ctx).find_range(Field::Price).is_none());

        state.set_price_range(PriceRange::normalized(1.0, CEILING));
        assert_eq!(
            compile_facets(&state, &ctx).find_range(Field::Price),
            Some((1.0, CEILING))
        );
    }

    #[test]
    fn compiled_clause_selects_expected_products() {
        let forest = forest();
        let ctx = CompileContext::new(Some(&forest), CEILING);
        let mut state = state(CategoryScope::Subtree(CategoryId(2)));
        state.toggle_brand(BrandId(1));
        let clause = compile_facets(&state, &ctx);

        let polo = Product::new(1, 10.0).with_category(4).with_brand(1);
        let trousers = Product::new(2, 10.0).with_category(3).with_brand(1);
        let other_brand = Product::new(3, 10.0).with_category(2).with_brand(5);
        assert!(clause.matches(&polo));
        assert!(!clause.matches(&trousers));
        assert!(!clause.matches(&other_brand));
    }
}
