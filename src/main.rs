// reportscrape: sync PDF report links for every listed stock page.
//
// Reads the entity list from the store, renders each page in headless
// Chromium, and upserts one link record per entity. Intended to be run
// periodically by an external scheduler.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reportscrape::{
    BatchReconciler, ChromiumRenderer, ExtractOutcome, ReportExtractor, ReportStore,
    ScrapeConfig, SqliteStore, StoreConfig, SupabaseStore,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "reportscrape",
    version,
    about = "Scrape PDF report links from stock pages and upsert them into a store"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every entity in the store (default)
    Run(RunArgs),
    /// Render a single page and print its PDF links as JSON
    Scrape {
        /// Page to render
        url: String,
        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(clap::Args, Default)]
struct RunArgs {
    /// Use a local SQLite file instead of Supabase
    #[arg(long, value_name = "PATH")]
    sqlite: Option<PathBuf>,
    /// Abort on the first failed upsert
    #[arg(long)]
    fail_fast: bool,
    #[command(flatten)]
    render: RenderArgs,
}

#[derive(clap::Args, Default)]
struct RenderArgs {
    /// Render attempts per page
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,
    /// Show the browser window
    #[arg(long)]
    headful: bool,
}

fn init_tracing() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        .add_directive("chromiumoxide::conn=off".parse()?)
        .add_directive("chromiumoxide::handler=off".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;
    Ok(())
}

fn scrape_config(render: &RenderArgs, fail_fast: bool) -> Result<ScrapeConfig> {
    let mut builder = ScrapeConfig::builder().with_env_overrides()?;
    if let Some(attempts) = render.max_retries {
        builder = builder.max_retries(attempts);
    }
    if render.headful {
        builder = builder.headless(false);
    }
    if fail_fast {
        builder = builder.fail_fast(true);
    }
    Ok(builder.build()?)
}

async fn run_batch<S: ReportStore>(store: Arc<S>, config: &ScrapeConfig) -> Result<()> {
    let renderer = ChromiumRenderer::new(config.clone());
    let reconciler = BatchReconciler::new(renderer, store, config);
    let summary = reconciler.run().await?;
    info!(
        "Run complete: {} entities, {} with links stored, {} degraded, {} failed upserts",
        summary.processed(),
        summary.upserted(),
        summary.degraded(),
        summary.failed()
    );
    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    let config = scrape_config(&args.render, args.fail_fast)?;

    match args.sqlite {
        Some(path) => {
            let store = Arc::new(
                SqliteStore::open(&path)
                    .await
                    .with_context(|| format!("Failed to open {}", path.display()))?,
            );
            let result = run_batch(store.clone(), &config).await;
            store.close().await;
            result
        }
        None => {
            let store_config = StoreConfig::from_env()?;
            run_batch(Arc::new(SupabaseStore::new(&store_config)), &config).await
        }
    }
}

async fn scrape(url: &str, render: &RenderArgs) -> Result<()> {
    let config = scrape_config(render, false)?;
    let extractor = ReportExtractor::new(ChromiumRenderer::new(config.clone()), &config);

    match extractor.try_extract(url).await {
        ExtractOutcome::Links { links, .. } => {
            println!("{}", serde_json::to_string_pretty(&links)?);
            Ok(())
        }
        ExtractOutcome::RenderFailed { attempts, error } => Err(anyhow::anyhow!(
            "Failed to render {url} after {attempts} attempt(s): {error}"
        )),
        ExtractOutcome::InvalidUrl { error } => Err(anyhow::anyhow!("Invalid URL {url:?}: {error}")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Scrape { url, render }) => scrape(&url, &render).await,
        Some(Commands::Run(args)) => run(args).await,
        None => run(RunArgs::default()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
