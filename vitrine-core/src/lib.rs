//! # Vitrine Core
//!
//! Catalog query and hierarchy engine for storefront clients: the reusable
//! logic behind category navigation, category browsing, facet filtering and
//! global search.
//!
//! ## Overview
//!
//! - **Category hierarchy**: build a navigable forest from the flat,
//!   parent-referencing category list and resolve subtree ids
//! - **Facet compilation**: turn price, brand and category selections into a
//!   tagged expression rendered to the catalog's filter dialect
//! - **Live-item backfill**: assemble full pages of non-deleted products from a
//!   backend that pages over soft-deleted rows
//! - **Signals**: process-wide wishlist/cart change notifications
//!
//! ## Architecture
//!
//! - [`catalog`]: category tree, category cache and the fetch ports
//! - [`query`]: facet state, filter compiler, paginator and browse session
//! - [`events`]: signal bus
//! - [`api`]: HTTP implementation of the fetch ports
//!
//! ## Examples
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//! use vitrine_core::{
//!     api::StorefrontClient,
//!     query::{BackfillConfig, BrowseSession, CeilingPolicy, FacetQueryBuilder, LiveItemPaginator},
//! };
//!
//! async fn first_page() -> vitrine_core::Result<()> {
//!     let client = Arc::new(StorefrontClient::new("http://localhost:8080", Duration::from_secs(10))?);
//!     let paginator = LiveItemPaginator::new(client, BackfillConfig::default());
//!     let state = FacetQueryBuilder::new().search("polo").build()?;
//!     let mut session = BrowseSession::new(paginator, None, state, CeilingPolicy::default());
//!     let page = session.fetch_page().await?;
//!     println!("{} of {} products", page.len(), page.total_count);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod api;
pub mod catalog;
pub mod error;
pub mod events;
pub mod prelude;
pub mod query;

pub use error::{CatalogError, Result};
pub use vitrine_model;
