use std::collections::BTreeMap;

use crate::frontier::{Frontier, FrontierOrder};
use crate::transfer::TransferId;
use crate::visited::VisitedSet;

pub const DEFAULT_TARGET_COUNT: usize = 50;
pub const DEFAULT_CONCURRENCY: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Stop once this many PNG URLs have been recorded.
    pub target_count: usize,
    /// Maximum number of transfers in flight at once; 0 behaves as 1.
    pub concurrency: usize,
    pub frontier_order: FrontierOrder,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            concurrency: DEFAULT_CONCURRENCY,
            frontier_order: FrontierOrder::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlPhase {
    /// Admitting and fetching URLs.
    #[default]
    Running,
    /// Target reached; waiting for in-flight transfers to complete.
    Draining,
    /// Nothing in flight and nothing left to submit.
    Finished,
}

/// Final outcome of a crawl run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrawlReport {
    /// PNG URLs in the order they were recorded.
    pub pngs: Vec<String>,
    /// Every URL a transfer was started for, in submission order.
    pub visited: Vec<String>,
    pub target_met: bool,
}

/// All mutable state of one crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    config: CrawlConfig,
    frontier: Frontier,
    visited: VisitedSet,
    pngs: Vec<String>,
    visit_log: Vec<String>,
    in_flight: BTreeMap<TransferId, String>,
    next_transfer_id: TransferId,
    phase: CrawlPhase,
}

impl CrawlState {
    /// Creates the state for a run with `seed` already admitted.
    pub fn new(config: CrawlConfig, seed: impl Into<String>) -> Self {
        let mut state = Self {
            config,
            frontier: Frontier::new(config.frontier_order),
            visited: VisitedSet::new(),
            pngs: Vec::new(),
            visit_log: Vec::new(),
            in_flight: BTreeMap::new(),
            next_transfer_id: 1,
            phase: CrawlPhase::Running,
        };
        state.admit(seed.into());
        state
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == CrawlPhase::Finished
    }

    pub fn pngs(&self) -> &[String] {
        &self.pngs
    }

    pub fn pngs_found(&self) -> usize {
        self.pngs.len()
    }

    pub fn target_met(&self) -> bool {
        self.pngs.len() >= self.config.target_count
    }

    pub fn visit_log(&self) -> &[String] {
        &self.visit_log
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_in_flight(&self, transfer_id: TransferId) -> bool {
        self.in_flight.contains_key(&transfer_id)
    }

    pub fn into_report(self) -> CrawlReport {
        let target_met = self.target_met();
        CrawlReport {
            pngs: self.pngs,
            visited: self.visit_log,
            target_met,
        }
    }

    /// Marks `url` visited and queues it; false if it was seen before.
    pub(crate) fn admit(&mut self, url: String) -> bool {
        if !self.visited.try_admit(&url) {
            return false;
        }
        self.frontier.push(url);
        true
    }

    fn concurrency_cap(&self) -> usize {
        self.config.concurrency.max(1)
    }

    /// Pops the next URL and moves it in flight, if a slot is free.
    pub(crate) fn next_submission(&mut self) -> Option<(TransferId, String)> {
        if self.phase == CrawlPhase::Finished
            || self.target_met()
            || self.in_flight.len() >= self.concurrency_cap()
        {
            return None;
        }
        let url = self.frontier.pop_one()?;
        let transfer_id = self.next_transfer_id;
        self.next_transfer_id += 1;
        self.visit_log.push(url.clone());
        self.in_flight.insert(transfer_id, url.clone());
        Some((transfer_id, url))
    }

    /// Removes a transfer from the in-flight set, returning its URL.
    pub(crate) fn retire(&mut self, transfer_id: TransferId) -> Option<String> {
        self.in_flight.remove(&transfer_id)
    }

    pub(crate) fn record_png(&mut self, url: String) {
        if self.target_met() {
            return;
        }
        self.pngs.push(url);
        if self.target_met() && self.phase == CrawlPhase::Running {
            self.phase = CrawlPhase::Draining;
        }
    }

    pub(crate) fn finish(&mut self) {
        self.phase = CrawlPhase::Finished;
    }
}
