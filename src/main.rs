//! budgetcache CLI - warm, inspect and exercise the offline asset cache.
//!
//! The CLI plays the host runtime for the cache worker: `warm` dispatches
//! the install event, `clean` the activate event, and `fetch` runs a single
//! request through the fetch handler.

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use budgetcache::store::CacheStorage;
use budgetcache::{Config, DiskStorage, HttpFetcher, OfflineCacheManager, Request};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: budgetcache <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  warm         pre-populate the current cache store from the asset manifest");
    eprintln!("  clean        delete cache stores from older versions");
    eprintln!("  status       list cache stores and their entries");
    eprintln!("  fetch <url>  run one request through the fetch handler");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);

    let config = Config::load()?;
    let storage = Arc::new(DiskStorage::new(config.cache_dir()?)?);
    let fetcher = Arc::new(HttpFetcher::new(config.origin())?);
    let worker = OfflineCacheManager::new(storage.clone(), fetcher, config.origin())
        .with_version(config.version_tag())
        .with_backend_host(config.backend_host());

    match command {
        Some("warm") => {
            info!(origin = config.origin(), store = worker.version(), "Warming cache");
            worker.handle_install().await;
            print_status(&storage, worker.version()).await?;
        }
        Some("clean") => {
            worker.handle_activate().await?;
            print_status(&storage, worker.version()).await?;
        }
        Some("status") => {
            print_status(&storage, worker.version()).await?;
        }
        Some("fetch") => {
            let url = match args.get(2) {
                Some(url) => url,
                None => {
                    eprintln!("fetch requires a URL");
                    print_usage();
                    std::process::exit(2);
                }
            };
            match worker.handle_fetch(&Request::get(url.clone())).await {
                Some(response) => {
                    println!(
                        "{} {} ({} bytes{})",
                        response.status,
                        response.url,
                        response.body.len(),
                        response
                            .content_type
                            .as_deref()
                            .map(|ct| format!(", {}", ct))
                            .unwrap_or_default()
                    );
                }
                None => {
                    eprintln!("No response (offline with no cached entry)");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

async fn print_status(storage: &Arc<DiskStorage>, current: &str) -> Result<()> {
    let mut names = storage.names().await?;
    names.sort();

    if names.is_empty() {
        println!("No cache stores");
        return Ok(());
    }

    for name in names {
        let marker = if name == current { "*" } else { " " };
        let store = storage.open(&name).await?;
        let mut entries = store.entries().await?;
        entries.sort_by(|a, b| a.request.url.cmp(&b.request.url));

        println!("{} {} ({} entries)", marker, name, entries.len());
        for entry in entries {
            println!(
                "    {}  {}  {}",
                entry.response.status,
                entry.request.url,
                entry.age_display()
            );
        }
    }

    Ok(())
}
