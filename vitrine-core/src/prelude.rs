//! Everything a browse screen needs in one import.

pub use crate::api::StorefrontClient;
pub use crate::catalog::{
    CatalogFetch, CatalogFetchRequest, CategoryCache, CategoryFetch,
    CategoryForest, CategoryTree, build_tree, descendant_ids,
};
pub use crate::error::{CatalogError, Result};
pub use crate::events::{Signal, SignalBus, Subscription};
pub use crate::query::{
    BrowseSession, CategoryScope, CeilingPolicy, Clause, FacetQueryBuilder,
    FacetState, LiveItemPaginator, BackfillConfig, compile_filter,
};
pub use vitrine_model::prelude::*;
