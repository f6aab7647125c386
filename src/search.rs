//! Per-source search orchestration.
//!
//! For each company, in input order: normalize the name, build the platform
//! query, collect pages bounded by the per-company cap and the shared
//! deadline, keep items whose employment history exactly matches the
//! normalized name under the recency rule, and append to the run accumulator
//! until the total cap or the deadline stops iteration. Per-company failures
//! are logged and surfaced as notes, never allowed to abort the run.

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::collector::collect_pages;
use crate::config::SearchConfig;
use crate::deadline::Deadline;
use crate::models::{CandidateItem, ExperienceEntry, RunStatus, SearchKind, SearchOutcome, SearchQuery};
use crate::normalizer::normalize_company_name;

/// Ephemeral state for one run. Created at request start, discarded at
/// request end; nothing here is persisted.
struct SearchRun {
    start_date: NaiveDate,
    items: Vec<CandidateItem>,
    seen_ids: HashSet<String>,
    per_company: Vec<(String, usize)>,
    notes: Vec<String>,
    companies_searched: usize,
    status: RunStatus,
}

impl SearchRun {
    fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            items: Vec::new(),
            seen_ids: HashSet::new(),
            per_company: Vec::new(),
            notes: Vec::new(),
            companies_searched: 0,
            status: RunStatus::Complete,
        }
    }

    fn into_outcome(self) -> SearchOutcome {
        SearchOutcome {
            items: self.items,
            status: self.status,
            companies_searched: self.companies_searched,
            per_company: self.per_company,
            notes: self.notes,
        }
    }
}

/// Combine the free-text query with a normalized company name using the
/// platform's boolean/phrase syntax. The query text itself is opaque and
/// passed through verbatim.
pub fn build_query_text(query_text: &str, normalized_company: &str) -> String {
    format!("\"{}\" AND ({})", normalized_company, query_text)
}

/// Parse a platform date string (`YYYY-MM-DD`, optionally with a time
/// suffix) into a date. Unparseable values yield `None`.
pub fn parse_platform_date(raw: &str) -> Option<NaiveDate> {
    let head: String = raw.chars().take(10).collect();
    NaiveDate::parse_from_str(&head, "%Y-%m-%d").ok()
}

/// Recency rule: an entry is recent or current when it has no end date, or
/// its end date falls within `recency_days` of the run start. The boundary
/// is inclusive: an entry ending exactly `recency_days` ago still counts.
pub fn is_recent(entry: &ExperienceEntry, run_start: NaiveDate, recency_days: u32) -> bool {
    match entry.end.as_deref() {
        None => true,
        Some(raw) => match parse_platform_date(raw) {
            Some(end) => end >= run_start - Duration::days(recency_days as i64),
            None => false,
        },
    }
}

/// Exact-match filter: keep an item only if at least one of its history
/// entries normalizes to the queried company's normalized name and passes
/// the recency rule.
pub fn matches_company(
    item: &CandidateItem,
    normalized_company: &str,
    run_start: NaiveDate,
    recency_days: u32,
) -> bool {
    item.history().iter().any(|entry| {
        entry
            .company
            .as_deref()
            .map(normalize_company_name)
            .is_some_and(|n| n == normalized_company)
            && is_recent(entry, run_start, recency_days)
    })
}

/// Run the full per-company search phase.
///
/// Input validation failures return an error before any network call; once
/// the run is underway, upstream failures degrade to partial results with
/// surfaced notes.
pub async fn run_search(
    client: &ApiClient,
    kind: SearchKind,
    query: &SearchQuery,
    cfg: &SearchConfig,
    deadline: Deadline,
) -> Result<SearchOutcome> {
    if query.text.trim().is_empty() {
        bail!("search query text cannot be empty");
    }
    if query.companies.is_empty() {
        bail!("company list cannot be empty");
    }
    if query.total_cap == 0 {
        bail!("total result cap must be greater than zero");
    }

    let mut run = SearchRun::new(Utc::now().date_naive());

    for company in &query.companies {
        if deadline.expired() {
            warn!("deadline reached, stopping before company '{}'", company);
            run.notes.push(format!("deadline reached before searching '{}'", company));
            run.status = RunStatus::Partial;
            break;
        }
        if run.items.len() >= query.total_cap {
            debug!("total cap of {} reached, stopping company iteration", query.total_cap);
            break;
        }

        let normalized = normalize_company_name(company);
        if normalized.is_empty() {
            warn!("company '{}' normalizes to nothing, skipping", company);
            run.notes
                .push(format!("'{}' normalizes to an empty name, skipped", company));
            run.per_company.push((company.clone(), 0));
            continue;
        }

        let text = build_query_text(&query.text, &normalized);
        let remaining = query.total_cap - run.items.len();
        let company_cap = query
            .per_company_cap
            .map_or(remaining, |cap| cap.min(remaining));

        let collected = collect_pages(
            client,
            kind.search_path(),
            &text,
            cfg.per_page,
            company_cap,
            deadline,
        )
        .await;
        run.companies_searched += 1;

        if let Some(reason) = &collected.failure {
            run.notes.push(format!("'{}': {}", company, reason));
            if deadline.expired() {
                run.status = RunStatus::Partial;
            }
        }

        let mut kept = 0usize;
        for item in collected.items {
            if run.items.len() >= query.total_cap {
                break;
            }
            if run.seen_ids.contains(&item.id) {
                continue;
            }
            if matches_company(&item, &normalized, run.start_date, cfg.recency_days) {
                run.seen_ids.insert(item.id.clone());
                run.items.push(item);
                kept += 1;
            }
        }

        info!("company '{}': kept {} items ({} total)", company, kept, run.items.len());
        run.per_company.push((company.clone(), kept));
    }

    Ok(run.into_outcome())
}
