//! Collaborator interfaces the engine consumes.
//!
//! Both ports are implemented by [`crate::api::StorefrontClient`] for the
//! storefront REST API; tests substitute mocks.

use async_trait::async_trait;
use vitrine_model::{CategoryNode, FetchedPage, SortOrder};

use crate::error::Result;

/// Parameters of one backend page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFetchRequest {
    /// Wire-level predicate; empty means "no filter".
    pub filter: String,
    /// 0-based backend page cursor.
    pub page: u32,
    pub size: u32,
    pub sort: SortOrder,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogFetch: Send + Sync {
    /// Fetch one backend page. Items may include soft-deleted rows and may
    /// repeat rows already seen on earlier pages.
    async fn fetch(&self, request: &CatalogFetchRequest) -> Result<FetchedPage>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryFetch: Send + Sync {
    /// Full flat category list, unpaginated.
    async fn fetch_flat_categories(&self) -> Result<Vec<CategoryNode>>;
}
