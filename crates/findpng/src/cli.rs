use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use crawler_core::{FrontierOrder, DEFAULT_CONCURRENCY, DEFAULT_TARGET_COUNT};

pub const DEFAULT_OUTPUT: &str = "png_urls.txt";

/// Crawl the web from a seed URL and list the URLs that serve PNG images.
#[derive(Parser, Debug)]
#[command(name = "findpng", version)]
pub struct Cli {
    /// Number of concurrent transfers.
    #[arg(short = 't', default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Number of PNG URLs to find before stopping.
    #[arg(short = 'm', default_value_t = DEFAULT_TARGET_COUNT)]
    pub target: usize,

    /// Also write every fetched URL, in fetch order, to this file.
    #[arg(short = 'v', value_name = "LOGFILE")]
    pub visited_log: Option<PathBuf>,

    /// Which discovered URL to fetch next.
    #[arg(long, value_enum, default_value_t = Order::Lifo)]
    pub order: Order,

    /// Where to write the PNG URLs.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Write diagnostics to this file instead of the terminal.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log each transfer, not just the summary.
    #[arg(long)]
    pub verbose: bool,

    /// Absolute URL to start crawling from.
    pub seed_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    /// Newest discovery first.
    Lifo,
    /// Oldest discovery first (breadth-first).
    Fifo,
}

impl From<Order> for FrontierOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Lifo => FrontierOrder::Lifo,
            Order::Fifo => FrontierOrder::Fifo,
        }
    }
}
