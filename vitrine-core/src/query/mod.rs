//! Facet selection, filter compilation and live-item pagination.

pub mod builder;
pub mod ceiling;
pub mod expr;
pub mod filtering;
pub mod keyword;
pub mod paginator;
pub mod session;
pub mod types;

pub use builder::FacetQueryBuilder;
pub use ceiling::{CeilingPolicy, PriceCeiling};
pub use expr::{Clause, Field};
pub use filtering::{CompileContext, compile_facets, compile_filter};
pub use keyword::{KeywordMatcher, fold_keyword};
pub use paginator::{
    Backfill, BackfillConfig, BackfillRequest, LiveItemPaginator, StopReason,
};
pub use session::BrowseSession;
pub use types::{CategoryScope, DEFAULT_PAGE_SIZE, FacetState};
