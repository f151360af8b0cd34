//! Crawler core: pure crawl state machine and the data structures it drives.
mod buffer;
mod classify;
mod effect;
mod frontier;
mod links;
mod msg;
mod state;
mod transfer;
mod update;
mod visited;

pub use buffer::{BufferError, ResponseBuffer, DEFAULT_GROWTH_INCREMENT, DEFAULT_INITIAL_CAPACITY};
pub use classify::{classify, has_png_signature, Classification, PNG_SIGNATURE};
pub use effect::Effect;
pub use frontier::{Frontier, FrontierOrder};
pub use links::LinkExtractor;
pub use msg::Msg;
pub use state::{
    CrawlConfig, CrawlPhase, CrawlReport, CrawlState, DEFAULT_CONCURRENCY, DEFAULT_TARGET_COUNT,
};
pub use transfer::{CompletedTransfer, TransferFailure, TransferId, TransferResponse};
pub use update::update;
pub use visited::VisitedSet;
