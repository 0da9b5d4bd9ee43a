use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vitrine_core::query::CategoryScope;
use vitrine_model::{BrandId, CategoryId, SortOrder};

#[derive(Debug, Parser)]
#[command(
    name = "vitrinectl",
    version,
    about = "Inspect storefront categories, compile facet filters and run browse sessions"
)]
pub struct Cli {
    /// Config file (TOML or JSON); takes precedence over discovered files
    #[arg(long, global = true, env = "VITRINE_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Storefront base URL, overriding the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the category tree
    Categories {
        /// Read the flat category list from a JSON file instead of the API
        #[arg(long)]
        from: Option<PathBuf>,
        /// Only print the subtree below this category
        #[arg(long)]
        root: Option<CategoryId>,
    },
    /// Compile facets into the catalog filter expression without fetching products
    Compile {
        #[command(flatten)]
        facets: FacetArgs,
        /// Flat category list used to expand subtree scopes (JSON file)
        #[arg(long = "categories-file", id = "categories_file")]
        categories_file: Option<PathBuf>,
        /// Fetch the category list from the API to expand subtree scopes
        #[arg(long, conflicts_with = "categories_file")]
        live: bool,
        /// Price slider ceiling; defaults to browse.default_price_ceiling
        #[arg(long)]
        ceiling: Option<f64>,
        /// Print the tagged expression as JSON instead of the wire string
        #[arg(long)]
        json: bool,
    },
    /// Run a browse session against the API and print one page
    Browse {
        #[command(flatten)]
        facets: FacetArgs,
        /// 0-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Items per page; defaults to browse.page_size
        #[arg(long)]
        page_size: Option<u32>,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration and where it came from
    Config,
}

#[derive(Debug, Clone, Args)]
pub struct FacetArgs {
    /// any, exact:<id> or subtree:<id>
    #[arg(long, default_value = "any", value_parser = parse_scope)]
    pub scope: CategoryScope,
    /// Brand id to include (repeatable)
    #[arg(long = "brand")]
    pub brands: Vec<BrandId>,
    /// Sub-category id to include (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<CategoryId>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    /// Case- and accent-insensitive name search
    #[arg(long)]
    pub keyword: Option<String>,
    /// newest, price-asc, price-desc, name-asc or name-desc
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,
}

pub fn parse_scope(raw: &str) -> Result<CategoryScope, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("any") {
        return Ok(CategoryScope::Any);
    }
    let (kind, id) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected any, exact:<id> or subtree:<id>, got '{raw}'"))?;
    let id: CategoryId = id
        .parse()
        .map_err(|err| format!("invalid category id '{id}': {err}"))?;
    match kind.to_ascii_lowercase().as_str() {
        "exact" => Ok(CategoryScope::Exact(id)),
        "subtree" => Ok(CategoryScope::Subtree(id)),
        other => Err(format!("unknown scope kind '{other}'")),
    }
}
