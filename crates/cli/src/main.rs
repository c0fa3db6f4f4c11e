// ABOUTME: CLI binary for the filmfacts movie metadata extractor.
// ABOUTME: Scrapes movie ids, parses saved pages, or lists chart ids, printing JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use filmfacts_extract::{ChartListing, MovieRecord, ScrapeError, Scraper, ScraperBuilder};
use serde_json::{json, Value};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "filmfacts")]
#[command(about = "Extract structured movie metadata from IMDb title pages")]
struct Args {
    /// Numeric movie ids to scrape (the part after "tt")
    #[arg()]
    ids: Vec<u32>,

    /// Saved movie page to parse instead of fetching (requires --id)
    #[arg(long = "html", conflicts_with_all = ["ids", "chart"])]
    html: Option<PathBuf>,

    /// Movie id recorded for --html input
    #[arg(long = "id", requires = "html")]
    id: Option<u32>,

    /// List the ids of a chart: top250, bottom100 or top250-english
    #[arg(long = "chart", conflicts_with = "ids")]
    chart: Option<String>,

    /// Directory holding cached page blobs
    #[arg(long = "cache-dir")]
    cache_dir: Option<PathBuf>,

    /// Serve pages from the cache directory when present
    #[arg(long = "use-cache", requires = "cache_dir")]
    use_cache: bool,

    /// Title URL prefix the zero-padded id is appended to
    #[arg(long = "base-url")]
    base_url: Option<String>,

    /// Site root chart paths are appended to
    #[arg(long = "chart-base-url")]
    chart_base_url: Option<String>,

    /// Maximum number of movies scraped at once
    #[arg(long = "concurrency", default_value_t = 4)]
    concurrency: usize,

    /// Print single-line JSON
    #[arg(long = "compact")]
    compact: bool,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

/// Initialize tracing on stderr; `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn builder_from_args(args: &Args) -> ScraperBuilder {
    let mut builder = Scraper::builder().use_cache(args.use_cache);
    if let Some(dir) = &args.cache_dir {
        builder = builder.cache_dir(dir);
    }
    if let Some(url) = &args.base_url {
        builder = builder.base_url(url);
    }
    if let Some(url) = &args.chart_base_url {
        builder = builder.chart_base_url(url);
    }
    builder
}

fn render(value: &Value, compact: bool) -> anyhow::Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}

/// One record as-is, several as an envelope with a per-id entry each.
fn batch_output(results: &[(u32, Result<MovieRecord, ScrapeError>)]) -> Value {
    if let [(_, Ok(record))] = results {
        return json!(record);
    }
    let entries: Vec<Value> = results
        .iter()
        .map(|(id, result)| match result {
            Ok(record) => json!({ "id": id, "ok": true, "record": record }),
            Err(e) => json!({ "id": id, "ok": false, "error": e.to_string() }),
        })
        .collect();
    json!({ "results": entries })
}

/// Runs the requested mode and returns the JSON to print (if any) and
/// whether every target succeeded.
async fn run(args: &Args) -> anyhow::Result<(Option<Value>, bool)> {
    let scraper = builder_from_args(args)
        .build()
        .context("failed to set up scraper")?;

    if let Some(path) = &args.html {
        let id = args.id.context("--id is required with --html")?;
        let html = fs::read_to_string(path)
            .with_context(|| format!("error reading file {:?}", path))?;
        let record = scraper.parse_html(id, &html)?;
        return Ok((Some(serde_json::to_value(&record)?), true));
    }

    if let Some(name) = &args.chart {
        let listing: ChartListing = name.parse()?;
        let ids = scraper.chart_ids(listing).await?;
        info!(%listing, count = ids.len(), "chart listed");
        return Ok((Some(json!(ids)), true));
    }

    if args.ids.is_empty() {
        anyhow::bail!("at least one movie id is required, or use --html or --chart");
    }

    let results = scraper.scrape_many(&args.ids, args.concurrency).await;
    let mut all_ok = true;
    for (id, result) in &results {
        if let Err(e) = result {
            error!(id, "{}", e);
            all_ok = false;
        }
    }

    if results.len() == 1 && !all_ok {
        return Ok((None, false));
    }
    Ok((Some(batch_output(&results)), all_ok))
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let (output, mut all_ok) = match run(&args).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(value) = output {
        match render(&value, args.compact) {
            Ok(rendered) => {
                if let Some(path) = &args.output {
                    if let Err(e) = fs::write(path, &rendered) {
                        error!("error writing to {:?}: {}", path, e);
                        all_ok = false;
                    }
                } else {
                    println!("{}", rendered);
                }
            }
            Err(e) => {
                error!("{:#}", e);
                all_ok = false;
            }
        }
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
