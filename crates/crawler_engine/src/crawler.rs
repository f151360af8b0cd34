use url::Url;

use crawl_logging::{crawl_info, crawl_trace};
use crawler_core::{update, CrawlConfig, CrawlReport, CrawlState, Effect, LinkExtractor, Msg};

use crate::fetch::{HttpClient, ReqwestClient, TransferSettings};
use crate::links::ScraperLinkExtractor;
use crate::multiplexer::TransferMultiplexer;
use crate::CrawlError;

/// Drives one crawl run: feeds the multiplexer from the crawl state and
/// feeds completions back until the state reports it is finished.
pub struct Crawler<C, L> {
    config: CrawlConfig,
    multiplexer: TransferMultiplexer<C>,
    links: L,
}

impl Crawler<ReqwestClient, ScraperLinkExtractor> {
    pub fn new(config: CrawlConfig, settings: TransferSettings) -> Result<Self, CrawlError> {
        let client = ReqwestClient::new(&settings)?;
        Ok(Self::with_parts(
            config,
            &settings,
            client,
            ScraperLinkExtractor::new(),
        ))
    }
}

impl<C: HttpClient + 'static, L: LinkExtractor> Crawler<C, L> {
    pub fn with_parts(config: CrawlConfig, settings: &TransferSettings, client: C, links: L) -> Self {
        Self {
            config,
            multiplexer: TransferMultiplexer::new(client, settings),
            links,
        }
    }

    /// Crawls from `seed` on the current task.
    pub async fn run(mut self, seed: &str) -> Result<CrawlReport, CrawlError> {
        Url::parse(seed).map_err(|err| CrawlError::InvalidSeed {
            seed: seed.to_string(),
            reason: err.to_string(),
        })?;
        crawl_info!(
            "Crawling from {} (target {}, concurrency {}, {:?} frontier)",
            seed,
            self.config.target_count,
            self.config.concurrency,
            self.config.frontier_order
        );

        let mut state = CrawlState::new(self.config, seed);
        loop {
            let (next, effects) = update(state, Msg::Pump, &self.links);
            state = next;
            if self.apply(effects) {
                break;
            }

            let (completed, active) = self.multiplexer.poll().await;
            crawl_trace!("{} transfer(s) completed, {} active", completed.len(), active);
            for transfer in completed {
                let (next, effects) = update(state, Msg::TransferCompleted(transfer), &self.links);
                state = next;
                self.apply(effects);
            }
        }

        Ok(state.into_report())
    }

    /// Crawls from `seed` on a fresh single-threaded runtime.
    pub fn run_blocking(self, seed: &str) -> Result<CrawlReport, CrawlError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(seed))
    }

    /// Executes effects; returns true once the crawl has finished.
    fn apply(&mut self, effects: Vec<Effect>) -> bool {
        let mut finished = false;
        for effect in effects {
            match effect {
                Effect::Submit { transfer_id, url } => self.multiplexer.submit(transfer_id, url),
                Effect::PngFound { url, found } => {
                    crawl_info!("Found png {} ({}/{})", url, found, self.config.target_count);
                }
                Effect::Finished { .. } => finished = true,
            }
        }
        finished
    }
}
