use crate::transfer::TransferId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start fetching `url` under `transfer_id`.
    Submit { transfer_id: TransferId, url: String },
    /// A PNG was recorded; `found` is the running total.
    PngFound { url: String, found: usize },
    /// Nothing is in flight and nothing more will be submitted.
    Finished { pngs_found: usize },
}
