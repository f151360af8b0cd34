use crawl_logging::{crawl_debug, crawl_info, crawl_warn};

use crate::classify::{classify, has_png_signature, Classification};
use crate::links::LinkExtractor;
use crate::state::CrawlState;
use crate::transfer::{CompletedTransfer, TransferFailure};
use crate::{Effect, Msg};

/// Applies a message to the crawl state and returns the effects to execute.
///
/// Link extraction runs synchronously through `links`; everything else is a
/// pure state transition.
pub fn update(
    mut state: CrawlState,
    msg: Msg,
    links: &dyn LinkExtractor,
) -> (CrawlState, Vec<Effect>) {
    let effects = match msg {
        Msg::Pump => pump(&mut state),
        Msg::TransferCompleted(transfer) => complete(&mut state, transfer, links),
    };

    (state, effects)
}

fn pump(state: &mut CrawlState) -> Vec<Effect> {
    if state.is_finished() {
        return Vec::new();
    }

    let mut effects = Vec::new();
    while let Some((transfer_id, url)) = state.next_submission() {
        effects.push(Effect::Submit { transfer_id, url });
    }

    if state.in_flight_count() == 0 {
        state.finish();
        crawl_info!(
            "Crawl finished: {} png(s), {} url(s) fetched",
            state.pngs_found(),
            state.visit_log().len()
        );
        effects.push(Effect::Finished {
            pngs_found: state.pngs_found(),
        });
    }
    effects
}

fn complete(
    state: &mut CrawlState,
    transfer: CompletedTransfer,
    links: &dyn LinkExtractor,
) -> Vec<Effect> {
    let CompletedTransfer {
        transfer_id,
        url,
        result,
    } = transfer;

    if state.retire(transfer_id).is_none() {
        crawl_warn!("Ignoring completion for unknown transfer {} ({})", transfer_id, url);
        return Vec::new();
    }

    // Once the target is met, completions are retired without inspection.
    if state.target_met() {
        crawl_debug!("Draining transfer {} ({})", transfer_id, url);
        return Vec::new();
    }

    let response = match result {
        Ok(response) => response,
        Err(failure @ TransferFailure::Allocation { .. }) => {
            crawl_warn!("Aborted transfer {} ({}): {}", transfer_id, url, failure);
            return Vec::new();
        }
        Err(failure) => {
            crawl_debug!("Dropped transfer {} ({}): {}", transfer_id, url, failure);
            return Vec::new();
        }
    };

    if has_png_signature(response.body.as_bytes()) {
        let png_url = response.effective_url;
        state.record_png(png_url.clone());
        return vec![Effect::PngFound {
            url: png_url,
            found: state.pngs_found(),
        }];
    }

    match classify(&response) {
        Classification::IsHtml => {
            let discovered = links.extract(response.body.as_bytes(), &response.effective_url);
            let total = discovered.len();
            let admitted = discovered
                .into_iter()
                .filter(|link| state.admit(link.clone()))
                .count();
            crawl_debug!(
                "Page {} linked {} url(s), {} new",
                response.effective_url,
                total,
                admitted
            );
        }
        Classification::IsPng => {
            crawl_debug!("Declared png without signature: {}", response.effective_url);
        }
        Classification::Drop => {
            crawl_debug!(
                "Dropped {} (status {}, content type {:?})",
                response.effective_url,
                response.status,
                response.content_type
            );
        }
    }
    Vec::new()
}
