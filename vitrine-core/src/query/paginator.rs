//! Live-item backfill.
//!
//! The catalog endpoint pages over every row, soft-deleted ones included, so a
//! single backend page can come back short once hidden rows are dropped. The
//! paginator keeps pulling consecutive backend pages until it holds a full
//! page of live, distinct items, the backend runs dry, or the round bound is
//! hit. Excess items from the last round are discarded rather than carried
//! over, so consecutive UI pages are not guaranteed to be contiguous slices of
//! the live stream.
//!
//! UI pages are mapped onto backend rows by offset: page `p` of size `n`
//! starts at raw row `p * n`, whatever the backend page size is.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{Span, debug, field, instrument, warn};
use vitrine_model::{ModelError, Product, SortOrder};

use super::keyword::KeywordMatcher;
use crate::catalog::{CatalogFetch, CatalogFetchRequest};
use crate::error::{CatalogError, Result};

/// Upper bound on rows reserved up front; larger pages grow as rows arrive.
const PREALLOC_LIMIT: usize = 256;

/// Round bounds and backend paging for [`LiveItemPaginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackfillConfig {
    /// Round bound for plain browsing.
    pub max_rounds: u32,
    /// Round bound while a keyword post-filter is active; matches are sparse
    /// so more pages are scanned.
    pub search_max_rounds: u32,
    /// Rows requested per backend page. `None` uses the UI page size.
    pub backend_page_size: Option<u32>,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            search_max_rounds: 10,
            backend_page_size: None,
        }
    }
}

impl BackfillConfig {
    pub fn rounds_for(&self, keyword_active: bool) -> u32 {
        let rounds = if keyword_active {
            self.search_max_rounds
        } else {
            self.max_rounds
        };
        rounds.max(1)
    }
}

/// One backfill invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BackfillRequest {
    pub filter: String,
    pub page_size: u32,
    /// UI page to assemble (0-based).
    pub page_index: u32,
    pub sort: SortOrder,
    /// Client-side name filter applied on top of the wire filter.
    pub keyword: Option<KeywordMatcher>,
}

impl BackfillRequest {
    pub fn new(filter: impl Into<String>, page_size: u32) -> Self {
        Self {
            filter: filter.into(),
            page_size,
            page_index: 0,
            sort: SortOrder::default(),
            keyword: None,
        }
    }

    pub fn at_page(mut self, page_index: u32) -> Self {
        self.page_index = page_index;
        self
    }

    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_keyword(mut self, keyword: Option<KeywordMatcher>) -> Self {
        self.keyword = keyword;
        self
    }
}

/// Why accumulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Filled,
    EndOfData,
    RoundLimit,
}

/// Outcome of a successful backfill.
#[derive(Debug, Clone, PartialEq)]
pub struct Backfill {
    /// At most `page_size` live items with distinct ids.
    pub items: Vec<Product>,
    pub rounds: u32,
    /// Backend page after the last one fetched.
    pub next_cursor: u32,
    /// Row count reported by the backend on the first round, if any.
    pub backend_total: Option<u64>,
    pub stop: StopReason,
}

/// Assembles full pages of live items from a [`CatalogFetch`] source.
#[derive(Clone)]
pub struct LiveItemPaginator {
    fetcher: Arc<dyn CatalogFetch>,
    config: BackfillConfig,
}

impl std::fmt::Debug for LiveItemPaginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveItemPaginator")
            .field("config", &self.config)
            .finish()
    }
}

impl LiveItemPaginator {
    pub fn new(fetcher: Arc<dyn CatalogFetch>, config: BackfillConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &BackfillConfig {
        &self.config
    }

    /// Run the backfill loop. Rounds are strictly sequential; any failed
    /// round aborts the whole attempt and no partial page is returned.
    #[instrument(
        name = "paginator.fill",
        skip(self, request),
        fields(
            filter = %request.filter,
            page_index = request.page_index,
            page_size = request.page_size,
            rounds = field::Empty,
        ),
        err
    )]
    pub async fn fill(&self, request: &BackfillRequest) -> Result<Backfill> {
        if request.page_size == 0 {
            return Err(ModelError::InvalidPageSize(0).into());
        }
        let page_size = request.page_size as usize;
        let backend_size = self
            .config
            .backend_page_size
            .filter(|size| *size > 0)
            .unwrap_or(request.page_size);
        let max_rounds = self.config.rounds_for(request.keyword.is_some());

        let offset = u64::from(request.page_index) * u64::from(request.page_size);
        let mut cursor =
            u32::try_from(offset / u64::from(backend_size)).unwrap_or(u32::MAX);
        // Rows of the first backend page that belong to earlier UI pages.
        let mut skip = (offset % u64::from(backend_size)) as usize;

        let reserve = page_size.min(PREALLOC_LIMIT);
        let mut items: Vec<Product> = Vec::with_capacity(reserve);
        let mut seen = HashSet::with_capacity(reserve);
        let mut backend_total = None;
        let mut rounds = 0;

        let stop = loop {
            rounds += 1;
            let fetch = CatalogFetchRequest {
                filter: request.filter.clone(),
                page: cursor,
                size: backend_size,
                sort: request.sort,
            };
            let page = self.fetcher.fetch(&fetch).await.map_err(|source| {
                warn!(page = cursor, round = rounds, error = %source, "backfill round failed");
                CatalogError::BackfillAborted {
                    page: cursor,
                    round: rounds,
                    source: Box::new(source),
                }
            })?;

            if rounds == 1 {
                backend_total = page.total;
            }
            let raw_count = page.raw_count;
            let before = items.len();
            for product in page.items.into_iter().skip(skip) {
                if !product.is_live() {
                    continue;
                }
                if let Some(keyword) = &request.keyword
                    && !keyword.matches(&product.name)
                {
                    continue;
                }
                if seen.insert(product.id) {
                    items.push(product);
                }
            }
            debug!(
                page = cursor,
                raw = raw_count,
                accepted = items.len() - before,
                accumulated = items.len(),
                "backfill round"
            );
            skip = 0;
            cursor = cursor.saturating_add(1);

            if items.len() >= page_size {
                break StopReason::Filled;
            }
            if raw_count < backend_size as usize {
                break StopReason::EndOfData;
            }
            if rounds >= max_rounds {
                break StopReason::RoundLimit;
            }
        };

        items.truncate(page_size);
        Span::current().record("rounds", rounds);
        debug!(items = items.len(), ?stop, "backfill finished");

        Ok(Backfill {
            items,
            rounds,
            next_cursor: cursor,
            backend_total,
            stop,
        })
    }
}
