use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result, bail};
use tracing::info;
use vitrine_config::{ConfigLoad, VitrineConfig};
use vitrine_core::{
    api::StorefrontClient,
    catalog::{CategoryCache, CategoryFetch, CategoryForest},
    query::{
        BrowseSession, CategoryScope, CompileContext, FacetQueryBuilder,
        FacetState, LiveItemPaginator, compile_facets,
    },
};
use vitrine_model::{CategoryId, CategoryNode};

use crate::cli::FacetArgs;
use crate::render;

fn client(config: &VitrineConfig) -> Result<StorefrontClient> {
    StorefrontClient::new(&config.api.base_url, config.api.timeout())
        .with_context(|| format!("cannot reach storefront at {}", config.api.base_url))
}

fn read_categories(path: &Path) -> Result<Vec<CategoryNode>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON list of categories", path.display()))
}

async fn live_forest(config: &VitrineConfig) -> Result<Arc<CategoryForest>> {
    let source: Arc<dyn CategoryFetch> = Arc::new(client(config)?);
    let cache = CategoryCache::new(source);
    cache
        .initialize()
        .await
        .context("failed to load categories from the storefront")
}

fn facet_state(
    facets: &FacetArgs,
    page: u32,
    page_size: u32,
    ceiling: f64,
) -> Result<FacetState> {
    let mut builder = FacetQueryBuilder::new();
    builder = match facets.scope {
        CategoryScope::Any => builder,
        CategoryScope::Exact(id) => builder.in_category(id),
        CategoryScope::Subtree(id) => builder.under_category(id),
    };
    builder = builder
        .brands(facets.brands.iter().copied())
        .categories(facets.categories.iter().copied())
        .sort(facets.sort)
        .page_size(page_size)
        .page(page);
    if facets.min_price.is_some() || facets.max_price.is_some() {
        builder = builder.price_range(
            facets.min_price.unwrap_or(0.0),
            facets.max_price.unwrap_or(ceiling),
        );
    }
    if let Some(keyword) = &facets.keyword {
        builder = builder.search(keyword);
    }
    builder.build().context("invalid facet selection")
}

pub async fn categories(
    config: &VitrineConfig,
    from: Option<&Path>,
    root: Option<CategoryId>,
) -> Result<()> {
    let forest = match from {
        Some(path) => Arc::new(CategoryForest::build(&read_categories(path)?)),
        None => live_forest(config).await?,
    };
    let roots = match root {
        Some(id) => match forest.find(id) {
            Some(node) => vec![node.clone()],
            None => bail!("category {id} not found"),
        },
        None => forest.roots().to_vec(),
    };
    info!(categories = forest.len(), "category tree ready");
    print!("{}", render::category_outline(&roots));
    Ok(())
}

pub async fn compile(
    config: &VitrineConfig,
    facets: &FacetArgs,
    categories_file: Option<&Path>,
    live: bool,
    ceiling: Option<f64>,
    json: bool,
) -> Result<()> {
    let forest = match (categories_file, live) {
        (Some(path), _) => Some(Arc::new(CategoryForest::build(&read_categories(path)?))),
        (None, true) => Some(live_forest(config).await?),
        (None, false) => None,
    };
    let ceiling = ceiling.unwrap_or(config.browse.default_price_ceiling);
    let state = facet_state(facets, 0, config.browse.page_size, ceiling)?;
    let clause = compile_facets(&state, &CompileContext::new(forest.as_deref(), ceiling));

    if json {
        println!("{}", serde_json::to_string_pretty(&clause)?);
    } else {
        println!("{}", clause.to_wire());
    }
    if let Some(keyword) = state.keyword() {
        eprintln!("keyword '{keyword}' is matched client-side and not part of the filter");
    }
    Ok(())
}

pub async fn browse(
    config: &VitrineConfig,
    facets: &FacetArgs,
    page: u32,
    page_size: Option<u32>,
    json: bool,
) -> Result<()> {
    let client = Arc::new(client(config)?);
    let page_size = page_size.unwrap_or(config.browse.page_size);
    let state = facet_state(
        facets,
        page,
        page_size,
        config.browse.default_price_ceiling,
    )?;
    let paginator = LiveItemPaginator::new(client.clone(), config.browse.backfill());

    let mut session = if matches!(facets.scope, CategoryScope::Subtree(_)) {
        let cache = CategoryCache::new(client);
        BrowseSession::with_cache(paginator, &cache, state, config.browse.ceiling_policy())
            .await
            .context("failed to load categories from the storefront")?
    } else {
        BrowseSession::new(paginator, None, state, config.browse.ceiling_policy())
    };

    let result = session
        .fetch_page()
        .await
        .context("could not load products")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    for product in &result.items {
        println!("{}", render::product_line(product));
    }
    println!("{}", render::page_summary(&result, page, page_size));
    Ok(())
}

pub fn show_config(load: &ConfigLoad) -> Result<()> {
    println!("# source: {}", load.source);
    if let Some(path) = &load.env_file {
        println!("# env file: {}", path.display());
    }
    for var in &load.overrides {
        println!("# override: {var}");
    }
    for warning in &load.warnings.items {
        println!("# warning: {}", warning.message);
    }
    print!("{}", load.config.to_toml()?);
    Ok(())
}
