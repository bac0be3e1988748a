//! Command-line client for the LongList API.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use longlist_client::{spawn_backend, HttpApi, ListApi, ListController, SEARCH_DEBOUNCE};
use longlist_core::models::item::ItemView;
use longlist_core::models::state::UpdateStateRequest;
use longlist_core::{DEFAULT_CLIENT_SERVER_URL, DEFAULT_PAGE_LIMIT};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "longlist-client", about = "LongList CLI", version)]
struct Cli {
    /// Server URL (can also be set via LONGLIST_SERVER env var)
    #[arg(
        short,
        long,
        global = true,
        env = "LONGLIST_SERVER",
        default_value = DEFAULT_CLIENT_SERVER_URL
    )]
    server: String,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Print timing for API requests
    #[arg(long, global = true)]
    timing: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, global = true, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch one window of the filtered view
    Items {
        #[arg(short, long, default_value = "0")]
        offset: usize,
        #[arg(short, long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
        #[arg(short = 'q', long, default_value = "")]
        search: String,
    },
    /// Show the first page and the current selection
    State,
    /// Replace the selection with the given ids
    Select { ids: Vec<u64> },
    /// Move the given ids to the front of the canonical order
    Reorder {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Page through the list the way the interactive surface does
    Browse {
        #[arg(short = 'q', long)]
        search: Option<String>,
        #[arg(short, long, default_value = "3")]
        pages: usize,
    },
}

fn log_timing(timing: bool, label: &str, duration: Duration) {
    if timing {
        eprintln!(
            "[timing] {}: {:.1} ms",
            label,
            duration.as_secs_f64() * 1000.0
        );
    }
}

fn format_rows(items: &[ItemView], total: usize) -> String {
    let mut rows = Vec::with_capacity(items.len() + 1);
    for item in items {
        let marker = if item.is_selected { "[x]" } else { "[ ]" };
        rows.push(format!("{:>10} {} {}", item.id, marker, item.text));
    }
    rows.push(format!("({} of {} items)", items.len(), total));
    rows.join("\n")
}

fn format_ids(ids: &[u64]) -> String {
    if ids.is_empty() {
        return "(none)".to_string();
    }
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("response encoding error")
}

fn browse(
    api: HttpApi,
    timeout: Duration,
    search: Option<String>,
    pages: usize,
) -> anyhow::Result<(Vec<ItemView>, usize)> {
    let mut controller = ListController::new(spawn_backend(api));
    if !controller.wait_idle(timeout) {
        bail!("Browse timed out waiting for the initial page");
    }

    if let Some(query) = search.filter(|query| !query.is_empty()) {
        let now = Instant::now();
        controller.set_query(query, now);
        controller.tick(now + SEARCH_DEBOUNCE);
        if !controller.wait_idle(timeout) {
            bail!("Browse timed out waiting for search results");
        }
    }

    for _ in 1..pages {
        if !controller.request_more() {
            break;
        }
        if !controller.wait_idle(timeout) {
            bail!("Browse timed out waiting for the next page");
        }
    }

    if let Some(message) = controller.last_error() {
        bail!("Browse failed: {}", message);
    }

    let buffer = controller.buffer();
    Ok((buffer.items().to_vec(), buffer.total()))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        server,
        json,
        timing,
        timeout,
        command,
    } = cli;
    let timeout = Duration::from_secs(timeout);
    let api = HttpApi::new(&server, timeout)?;

    match command {
        Commands::Items {
            offset,
            limit,
            search,
        } => {
            let start = Instant::now();
            let page = api.get_items(offset, limit, &search)?;
            log_timing(timing, "items", start.elapsed());
            if json {
                println!("{}", to_json(&page)?);
            } else {
                println!("{}", format_rows(&page.items, page.total));
            }
        }
        Commands::State => {
            let start = Instant::now();
            let snapshot = api.get_state()?;
            log_timing(timing, "state", start.elapsed());
            if json {
                println!("{}", to_json(&snapshot)?);
            } else {
                println!("{}", format_rows(&snapshot.items, snapshot.total));
                println!("Selected: {}", format_ids(&snapshot.selected_ids));
            }
        }
        Commands::Select { ids } => {
            let start = Instant::now();
            api.update_state(&UpdateStateRequest::selected(ids.clone()))?;
            log_timing(timing, "select", start.elapsed());
            if json {
                println!("{}", to_json(&serde_json::json!({ "selected": ids }))?);
            } else {
                println!("Selected: {}", format_ids(&ids));
            }
        }
        Commands::Reorder { ids } => {
            let start = Instant::now();
            api.update_state(&UpdateStateRequest::sorted(ids.clone()))?;
            log_timing(timing, "reorder", start.elapsed());
            if json {
                println!("{}", to_json(&serde_json::json!({ "sorted": ids }))?);
            } else {
                println!("Moved to front: {}", format_ids(&ids));
            }
        }
        Commands::Browse { search, pages } => {
            let start = Instant::now();
            let (items, total) = browse(api, timeout, search, pages)?;
            log_timing(timing, "browse", start.elapsed());
            if json {
                println!(
                    "{}",
                    to_json(&serde_json::json!({ "items": items, "total": total }))?
                );
            } else {
                println!("{}", format_rows(&items, total));
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("longlist_client=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    run(Cli::parse())
}
