use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::ports::CategoryFetch;
use super::tree::CategoryForest;
use crate::error::Result;

/// Explicitly owned cache of the category forest.
///
/// Screens receive a handle instead of reaching for module-level state. The
/// forest is fetched lazily on first use (or eagerly via
/// [`CategoryCache::initialize`]) and rebuilt after
/// [`CategoryCache::invalidate`], e.g. once the admin screens edited a
/// category.
pub struct CategoryCache {
    source: Arc<dyn CategoryFetch>,
    forest: RwLock<Option<Arc<CategoryForest>>>,
    loads: AtomicU64,
}

impl fmt::Debug for CategoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryCache")
            .field("source", &"CategoryFetch")
            .field("loads", &self.loads.load(Ordering::Relaxed))
            .finish()
    }
}

impl CategoryCache {
    pub fn new(source: Arc<dyn CategoryFetch>) -> Self {
        Self {
            source,
            forest: RwLock::new(None),
            loads: AtomicU64::new(0),
        }
    }

    /// Fetch the flat list and replace the cached forest unconditionally.
    pub async fn initialize(&self) -> Result<Arc<CategoryForest>> {
        let mut guard = self.forest.write().await;
        let forest = self.load().await?;
        *guard = Some(Arc::clone(&forest));
        Ok(forest)
    }

    /// Cached forest, loading it on first access.
    pub async fn forest(&self) -> Result<Arc<CategoryForest>> {
        if let Some(forest) = self.forest.read().await.as_ref() {
            return Ok(Arc::clone(forest));
        }

        let mut guard = self.forest.write().await;
        // Another caller may have loaded while we waited for the write lock.
        if let Some(forest) = guard.as_ref() {
            return Ok(Arc::clone(forest));
        }
        let forest = self.load().await?;
        *guard = Some(Arc::clone(&forest));
        Ok(forest)
    }

    /// Cached forest without triggering a load.
    pub async fn snapshot(&self) -> Option<Arc<CategoryForest>> {
        self.forest.read().await.clone()
    }

    pub async fn invalidate(&self) {
        let dropped = self.forest.write().await.take().is_some();
        if dropped {
            debug!("category cache invalidated");
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.forest.read().await.is_some()
    }

    /// How many times the flat list has been fetched.
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    async fn load(&self) -> Result<Arc<CategoryForest>> {
        let nodes = self.source.fetch_flat_categories().await?;
        let forest = Arc::new(CategoryForest::build(&nodes));
        self.loads.fetch_add(1, Ordering::Relaxed);
        info!(
            categories = nodes.len(),
            roots = forest.roots().len(),
            "loaded category forest"
        );
        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ports::MockCategoryFetch;
    use crate::error::CatalogError;
    use vitrine_model::{CategoryId, CategoryNode};

    fn source_returning(nodes: Vec<CategoryNode>, times: usize) -> MockCategoryFetch {
        let mut mock = MockCategoryFetch::new();
        mock.expect_fetch_flat_categories()
            .times(times)
            .returning(move || Ok(nodes.clone()));
        mock
    }

    #[tokio::test]
    async fn forest_is_loaded_once_and_reused() {
        let source = source_returning(
            vec![CategoryNode::root(1, "Men"), CategoryNode::child(2, "Shirts", 1)],
            1,
        );
        let cache = CategoryCache::new(Arc::new(source));
        assert!(!cache.is_initialized().await);

        let first = cache.forest().await.expect("first load");
        let second = cache.forest().await.expect("cached");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
        assert!(first.find(CategoryId(2)).is_some());
    }

    #[tokio::test]
    async fn invalidate_forces_a_refetch() {
        let source = source_returning(vec![CategoryNode::root(1, "Men")], 2);
        let cache = CategoryCache::new(Arc::new(source));

        cache.initialize().await.expect("initialize");
        cache.invalidate().await;
        assert!(cache.snapshot().await.is_none());

        cache.forest().await.expect("reload");
        assert_eq!(cache.load_count(), 2);
    }

    #[tokio::test]
    async fn failed_load_leaves_cache_empty() {
        let mut source = MockCategoryFetch::new();
        source
            .expect_fetch_flat_categories()
            .times(1)
            .returning(|| Err(CatalogError::Internal("offline".into())));
        let cache = CategoryCache::new(Arc::new(source));

        assert!(cache.forest().await.is_err());
        assert!(!cache.is_initialized().await);
        assert_eq!(cache.load_count(), 0);
    }
}
