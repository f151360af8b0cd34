mod cli;
mod output;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use crawl_logging::{crawl_info, LogDestination};
use crawler_core::CrawlConfig;
use crawler_engine::{Crawler, TransferSettings};

use crate::cli::Cli;

fn main() {
    let started = Instant::now();
    let exit_code = match run(Cli::parse()) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    println!(
        "findpng execution time: {:.6} seconds",
        started.elapsed().as_secs_f64()
    );
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match cli.log_file.clone() {
        Some(path) => LogDestination::File(path),
        None => LogDestination::Terminal,
    };
    crawl_logging::initialize(destination, level);

    let config = CrawlConfig {
        target_count: cli.target,
        concurrency: cli.concurrency,
        frontier_order: cli.order.into(),
    };
    let report = Crawler::new(config, TransferSettings::default())
        .context("failed to set up crawler")?
        .run_blocking(&cli.seed_url)
        .with_context(|| format!("crawl from {} failed", cli.seed_url))?;

    crawl_info!(
        "Found {} PNG URL(s) after {} fetches",
        report.pngs.len(),
        report.visited.len()
    );
    output::write_url_list(&cli.output, &report.pngs)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    if let Some(path) = cli.visited_log.as_deref() {
        output::write_url_list(path, &report.visited)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
