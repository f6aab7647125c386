//! Paginated collection from the search endpoint.
//!
//! Issues requests with an increasing 0-indexed `page` parameter at a fixed
//! `per_page` size and accumulates items until a stop condition: empty page,
//! page coverage of the reported total, item cap, or the shared deadline.
//! A failed page stops collection for that source only; whatever was
//! accumulated is returned, never discarded.

use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::deadline::Deadline;
use crate::models::{CandidateItem, SearchPage};

/// Items accumulated for one source, plus how collection ended.
#[derive(Debug)]
pub struct CollectOutcome {
    pub items: Vec<CandidateItem>,
    /// False when a page error or the deadline stopped collection early.
    pub complete: bool,
    /// Human-readable reason when `complete` is false.
    pub failure: Option<String>,
}

pub async fn collect_pages(
    client: &ApiClient,
    path: &str,
    text: &str,
    per_page: u32,
    cap: usize,
    deadline: Deadline,
) -> CollectOutcome {
    let mut items: Vec<CandidateItem> = Vec::new();
    let mut page: u32 = 0;

    loop {
        if deadline.expired() {
            debug!("deadline reached after {} items for query '{}'", items.len(), text);
            return CollectOutcome {
                items,
                complete: false,
                failure: Some("deadline reached during collection".to_string()),
            };
        }

        let params = [
            ("text", text.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];

        let page_data: SearchPage = match client.get_json(path, &params, deadline).await {
            Ok(p) => p,
            Err(e) => {
                // Degrade to partial results for this source; the run goes on.
                warn!("page {} of query '{}' failed: {}", page, text, e);
                return CollectOutcome {
                    items,
                    complete: false,
                    failure: Some(format!("page {} failed: {}", page, e)),
                };
            }
        };

        if page_data.items.is_empty() {
            break;
        }

        let found = page_data.found;
        for item in page_data.items {
            if items.len() >= cap {
                break;
            }
            items.push(item);
        }
        debug!(
            "page {} of query '{}': {} accumulated of {} found",
            page,
            text,
            items.len(),
            found
        );

        if items.len() >= cap {
            break;
        }

        page += 1;
        if (page as u64) * (per_page as u64) >= found {
            break;
        }
    }

    CollectOutcome {
        items,
        complete: true,
        failure: None,
    }
}
