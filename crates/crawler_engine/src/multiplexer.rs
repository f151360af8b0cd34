use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};

use crawl_logging::crawl_debug;
use crawler_core::{CompletedTransfer, ResponseBuffer, TransferFailure, TransferId, TransferResponse};

use crate::fetch::{HttpClient, HttpResponse, TransferSettings};

/// Overlaps many transfers on the calling task.
///
/// Transfers are plain futures, never spawned: they only make progress while
/// [`TransferMultiplexer::poll`] is being awaited, so body chunks are appended
/// to each transfer's [`ResponseBuffer`] on the polling thread, one transfer
/// at a time.
pub struct TransferMultiplexer<C> {
    client: Arc<C>,
    initial_capacity: usize,
    increment: usize,
    active: FuturesUnordered<BoxFuture<'static, CompletedTransfer>>,
}

impl<C: HttpClient + 'static> TransferMultiplexer<C> {
    pub fn new(client: C, settings: &TransferSettings) -> Self {
        Self {
            client: Arc::new(client),
            initial_capacity: settings.initial_buffer_capacity,
            increment: settings.buffer_increment,
            active: FuturesUnordered::new(),
        }
    }

    /// Starts fetching `url`; the outcome is reported by a later `poll`.
    pub fn submit(&mut self, transfer_id: TransferId, url: String) {
        crawl_debug!("Submitting transfer {} for {}", transfer_id, url);
        let client = Arc::clone(&self.client);
        let (initial, increment) = (self.initial_capacity, self.increment);
        self.active.push(
            async move {
                let result = receive(client.as_ref(), &url, initial, increment).await;
                CompletedTransfer {
                    transfer_id,
                    url,
                    result,
                }
            }
            .boxed(),
        );
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Waits until at least one transfer finishes, then also collects every
    /// other transfer that is already done. Returns the finished transfers and
    /// how many remain active. Returns immediately when nothing is active.
    pub async fn poll(&mut self) -> (Vec<CompletedTransfer>, usize) {
        let mut completed = Vec::new();
        if let Some(first) = self.active.next().await {
            completed.push(first);
            while let Some(Some(done)) = self.active.next().now_or_never() {
                completed.push(done);
            }
        }
        (completed, self.active.len())
    }
}

async fn receive<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
    initial: usize,
    increment: usize,
) -> Result<TransferResponse, TransferFailure> {
    let HttpResponse {
        status,
        content_type,
        effective_url,
        mut body,
    } = client.get(url).await?;

    let mut buffer = ResponseBuffer::with_capacity(initial, increment)?;
    while let Some(chunk) = body.next().await {
        buffer.append(&chunk?)?;
    }

    Ok(TransferResponse {
        status,
        content_type,
        effective_url,
        body: buffer,
    })
}
