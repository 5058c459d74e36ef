use anyhow::Context;
use clap::{Parser, Subcommand};
use dex_catalog::app::aggregator::CatalogAggregator;
use dex_catalog::app::session::{CatalogSession, CatalogView};
use dex_catalog::cache::QueryCache;
use dex_catalog::config::{Config, DEFAULT_CONFIG_PATH};
use dex_catalog::infra::http_client::ReqwestHttp;
use dex_catalog::query::{QueryState, SortKey};
use dex_catalog::{logging, render};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dex")]
#[command(about = "Browse, search and filter the PokeAPI catalog")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog page by page
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size (10, 20, 50, 100 or 1025)
        #[arg(long)]
        size: Option<u32>,
        /// Sort key: id, name, types or total; prefix with '-' for descending
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,
    },
    /// Look up a record by exact name
    Search { name: String },
    /// Records of one type
    Type {
        name: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,
    },
    /// Detail panel for one record
    Show { id: u32 },
    /// Render the view for a URL query such as "page=2&type=fire&sort=-total"
    View {
        query: String,
        /// Also show the detail panel for this record
        #[arg(long)]
        select: Option<u32>,
    },
    /// Entries of one listing page whose name contains a substring
    Grep {
        needle: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },
}

fn apply_paging(state: &mut QueryState, page: u32, size: Option<u32>, sort: Option<String>) -> anyhow::Result<()> {
    if let Some(size) = size {
        state.set_page_size(size)?;
    }
    state.go_to_page(page)?;
    if let Some(sort) = sort {
        state.set_sort(Some(sort.parse::<SortKey>()?));
    }
    Ok(())
}

fn print_view(view: &CatalogView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render::render_view(view));
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_from(&cli.config).context("loading configuration")?;
    info!(base_url = %config.api.base_url, concurrency = config.api.concurrency, "Starting dex");

    let http = Arc::new(ReqwestHttp::new(Duration::from_secs(config.api.timeout_seconds))?);
    let aggregator = Arc::new(CatalogAggregator::from_config(http, &config));
    let cache = QueryCache::from_config(&config.cache);
    let state = QueryState::new(config.catalog.default_page_size);
    let mut session = CatalogSession::new(aggregator.clone(), cache, state);

    match cli.command {
        Commands::List { page, size, sort } => {
            apply_paging(session.state_mut(), page, size, sort)?;
            print_view(&session.load_view().await?, cli.json)?;
        }
        Commands::Search { name } => {
            let state = session.state_mut();
            state.set_search_input(name);
            state.submit_search();
            print_view(&session.load_view().await?, cli.json)?;
        }
        Commands::Type { name, page, size, sort } => {
            session.state_mut().select_type(Some(&name))?;
            apply_paging(session.state_mut(), page, size, sort)?;
            print_view(&session.load_view().await?, cli.json)?;
        }
        Commands::Show { id } => {
            let details = session.load_details(id).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(details.as_ref())?);
            } else {
                print!("{}", render::render_details(&details));
            }
        }
        Commands::View { query, select } => {
            session.navigate(&query);
            if let Some(id) = select {
                session.state_mut().select(id);
            }
            print_view(&session.load_view().await?, cli.json)?;
            if let Some(details) = session.load_selected().await? {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(details.as_ref())?);
                } else {
                    println!();
                    print!("{}", render::render_details(&details));
                }
            }
        }
        Commands::Grep { needle, page, size } => {
            let size = size.unwrap_or(config.catalog.default_page_size);
            let offset = (page.max(1) as u64 - 1) * size as u64;
            let found = aggregator.search_page(size, offset, &needle).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                for row in &found.results {
                    println!(
                        "{:>6}  {:<24} {:<22} {:>5}  {}",
                        row.id,
                        render::capitalize(&row.name),
                        render::display_types(&row.types),
                        row.total_stats,
                        row.cry.as_deref().unwrap_or("")
                    );
                }
                println!("Matches {}", found.total);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    logging::init_logging("logs");

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("dex failed: {:#}", e);
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
