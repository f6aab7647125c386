//! Best-effort batch enrichment via the per-item detail endpoint.
//!
//! Items are processed in fixed-size batches, sequentially within a batch,
//! with a fixed delay between individual calls and between batches. The
//! delays are a self-imposed throttle against the platform's implicit rate
//! limits, not a performance measure. Enrichment never changes which items
//! are present: failures and deadline exhaustion (before or inside a batch)
//! pass items through with empty enrichment fields.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::client::{ApiClient, FetchError};
use crate::config::EnrichConfig;
use crate::deadline::Deadline;
use crate::models::{CandidateItem, EnrichedItem, ItemDetail, SearchKind};

#[derive(Debug)]
pub struct EnrichOutcome {
    /// All input items, in input order, enriched where possible.
    pub items: Vec<EnrichedItem>,
    /// How many items actually received detail data.
    pub enriched_count: usize,
    /// False when the deadline cut enrichment short.
    pub complete: bool,
}

pub async fn enrich_items(
    client: &ApiClient,
    kind: SearchKind,
    items: Vec<CandidateItem>,
    cfg: &EnrichConfig,
    deadline: Deadline,
) -> EnrichOutcome {
    let total = items.len();
    let mut queue: VecDeque<CandidateItem> = items.into();
    let mut out: Vec<EnrichedItem> = Vec::with_capacity(total);
    let mut enriched_count = 0usize;
    let mut complete = true;

    let item_delay = Duration::from_millis(cfg.item_delay_ms);
    let batch_delay = Duration::from_millis(cfg.batch_delay_ms);

    while !queue.is_empty() {
        if deadline.expired() {
            debug!("deadline reached, {} items pass through unenriched", queue.len());
            complete = false;
            break;
        }

        let batch_len = queue.len().min(cfg.batch_size);
        for i in 0..batch_len {
            let Some(item) = queue.pop_front() else {
                break;
            };

            match client
                .get_json::<ItemDetail>(&kind.detail_path(&item.id), &[], deadline)
                .await
            {
                Ok(detail) => {
                    out.push(EnrichedItem::with_detail(item, detail));
                    enriched_count += 1;
                }
                Err(FetchError::DeadlineExceeded) => {
                    // Deadline hit mid-batch: this item and everything still
                    // queued pass through unenriched.
                    debug!(
                        "deadline reached mid-batch, {} items pass through unenriched",
                        queue.len() + 1
                    );
                    complete = false;
                    out.push(EnrichedItem::bare(item));
                    break;
                }
                Err(e) if e.is_forbidden() => {
                    // Token lacks the detail scope; the item survives bare.
                    debug!("detail for item '{}' not permitted, skipping enrichment", item.id);
                    out.push(EnrichedItem::bare(item));
                }
                Err(e) => {
                    warn!("detail call for item '{}' failed: {}", item.id, e);
                    out.push(EnrichedItem::bare(item));
                }
            }

            if i + 1 < batch_len && !deadline.expired() {
                sleep(item_delay).await;
            }
        }

        if !complete {
            break;
        }
        if !queue.is_empty() {
            sleep(batch_delay).await;
        }
    }

    // Deadline leftovers pass through unchanged.
    for item in queue {
        out.push(EnrichedItem::bare(item));
    }

    EnrichOutcome {
        items: out,
        enriched_count,
        complete,
    }
}
