//! `shopfront` - inspect the reconciled storefront catalog from a terminal

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use output::CatalogDocument;
use shopfront_catalog::{default_featured, Catalog, FeaturedSet};
use shopfront_core::{
    ActivationOutcome, CatalogSource, CatalogStore, CatalogView, CategoryFilter, DisabledSource,
    HttpCatalogSource, ShopfrontConfig,
};
use shopfront_reconcile::{Reconciler, RemotePayload};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shopfront", version, about = "Storefront catalog reconciler")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "SHOPFRONT_CONFIG")]
    config: Option<PathBuf>,

    /// Skip the network and serve the static catalog
    #[arg(long, global = true)]
    offline: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch, reconcile and print the catalog
    Show {
        /// Only products in this category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print featured products
    Featured {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up one product by id
    Product {
        /// Product id
        id: String,
    },
    /// List categories in the working catalog
    Categories,
    /// Reconcile two JSON files without touching the network
    Merge {
        /// Static catalog JSON array
        #[arg(long)]
        static_catalog: PathBuf,
        /// Remote snapshot JSON
        #[arg(long)]
        remote: PathBuf,
        /// Default featured ids
        #[arg(long, value_delimiter = ',')]
        featured: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "shopfront failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Merge {
            static_catalog,
            remote,
            featured,
            json,
        } => merge_files(&static_catalog, &remote, featured, json),
        command => {
            let config = build_config(cli.config.as_deref(), |key| std::env::var(key).ok())?;
            let view = load_view(&config, cli.offline).await?;
            query(&view, command)
        }
    }
}

/// Config file (or defaults) with overrides from `env` applied
fn build_config<F>(config_path: Option<&Path>, env: F) -> Result<ShopfrontConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match config_path {
        Some(path) => ShopfrontConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ShopfrontConfig::new(),
    };
    base.apply_env(env)
        .context("applying environment overrides")
}

/// Activate the embedded catalog against the configured source and wait
async fn load_view(config: &ShopfrontConfig, offline: bool) -> Result<CatalogView> {
    let store = CatalogStore::embedded().context("loading embedded catalog")?;
    let source: Arc<dyn CatalogSource> = if offline {
        Arc::new(DisabledSource)
    } else {
        Arc::new(HttpCatalogSource::new(config).context("building HTTP client")?)
    };

    match store.activate(source).finished().await {
        ActivationOutcome::Merged(report) => {
            tracing::debug!(line = %output::report_line(&report), "merged");
        }
        ActivationOutcome::Unchanged(kind) => {
            tracing::info!(payload = ?kind, "serving static catalog");
        }
        ActivationOutcome::Failed(signal) if offline => {
            tracing::debug!(%signal, "offline mode");
        }
        ActivationOutcome::Failed(signal) => {
            tracing::warn!(%signal, "serving static catalog");
        }
        ActivationOutcome::Cancelled => anyhow::bail!("catalog activation was cancelled"),
    }

    Ok(store.snapshot())
}

fn query(view: &CatalogView, command: Command) -> Result<ExitCode> {
    match command {
        Command::Show { category, json } => {
            let products = view.filter(&CategoryFilter::from_option(category));
            if json {
                let doc = CatalogDocument {
                    products,
                    featured: view.featured.iter().map(|id| id.as_str()).collect(),
                    error: view.error,
                    report: view.last_merge,
                };
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                print!("{}", output::product_table(&products));
                if let Some(signal) = view.error {
                    println!("\n(remote catalog unavailable: {signal})");
                }
            }
        }
        Command::Featured { json } => {
            let products = view.featured_products();
            if json {
                println!("{}", serde_json::to_string_pretty(&products)?);
            } else {
                print!("{}", output::product_table(&products));
            }
        }
        Command::Product { id } => match view.get_product_by_id(&id) {
            Some(product) => print!("{}", output::product_detail(product)),
            None => {
                eprintln!("no product with id {id}");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Categories => {
            for category in view.categories() {
                println!("{category}");
            }
        }
        Command::Merge { .. } => anyhow::bail!("merge does not read the live catalog"),
    }
    Ok(ExitCode::SUCCESS)
}

fn merge_files(
    static_path: &Path,
    remote_path: &Path,
    featured: Vec<String>,
    json: bool,
) -> Result<ExitCode> {
    let static_text = std::fs::read_to_string(static_path)
        .with_context(|| format!("reading {}", static_path.display()))?;
    let baseline = Catalog::from_json(&static_text)
        .with_context(|| format!("validating {}", static_path.display()))?;

    let remote_bytes =
        std::fs::read(remote_path).with_context(|| format!("reading {}", remote_path.display()))?;
    let payload = RemotePayload::from_slice(&remote_bytes);

    let defaults = if featured.is_empty() {
        default_featured()
    } else {
        FeaturedSet::from_ids(featured)
    };

    let reconciliation = Reconciler::new(baseline, defaults).resolve(&payload);
    if json {
        let doc = CatalogDocument {
            products: reconciliation.catalog.iter().collect(),
            featured: reconciliation.featured.iter().map(|id| id.as_str()).collect(),
            error: None,
            report: Some(reconciliation.report),
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        let products: Vec<_> = reconciliation.catalog.iter().collect();
        print!("{}", output::product_table(&products));
        println!();
        let featured: Vec<_> = reconciliation
            .featured
            .iter()
            .map(|id| id.as_str())
            .collect();
        println!("featured: {}", featured.join(", "));
        println!("{}", output::report_line(&reconciliation.report));
    }
    Ok(ExitCode::SUCCESS)
}
