use crate::transfer::CompletedTransfer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Fill free transfer slots from the frontier, or finish if nothing is left.
    Pump,
    /// The multiplexer reported a finished transfer.
    TransferCompleted(CompletedTransfer),
}
