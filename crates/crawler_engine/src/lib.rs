//! Crawler engine: HTTP transfers, link extraction and the crawl driver.
mod crawler;
mod decode;
mod fetch;
mod links;
mod multiplexer;
mod types;

pub use crawler::Crawler;
pub use decode::decode_html;
pub use fetch::{
    BodyStream, HttpClient, HttpResponse, ReqwestClient, TransferSettings, DEFAULT_USER_AGENT,
};
pub use links::ScraperLinkExtractor;
pub use multiplexer::TransferMultiplexer;
pub use types::CrawlError;
