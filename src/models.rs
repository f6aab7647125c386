//! Data model for the search and enrichment pipeline.
//!
//! Items are carried through the pipeline unchanged: search produces
//! `CandidateItem`s, the enricher wraps them in `EnrichedItem`s without
//! adding or dropping entries, and the exporter renders whatever is there.

use serde::{Deserialize, Serialize};

/// Which side of the platform to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Resumes,
    Vacancies,
}

impl SearchKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resumes" => Some(Self::Resumes),
            "vacancies" => Some(Self::Vacancies),
            _ => None,
        }
    }

    /// Path of the paginated search endpoint.
    pub fn search_path(&self) -> &'static str {
        match self {
            Self::Resumes => "/resumes",
            Self::Vacancies => "/vacancies",
        }
    }

    /// Path of the per-item detail endpoint.
    pub fn detail_path(&self, id: &str) -> String {
        format!("{}/{}", self.search_path(), id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resumes => "resumes",
            Self::Vacancies => "vacancies",
        }
    }
}

/// One user-supplied search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text query in the platform's own boolean/phrase syntax,
    /// passed through verbatim.
    pub text: String,
    /// Raw company names as supplied by the caller.
    pub companies: Vec<String>,
    /// Hard cap on the total result set.
    pub total_cap: usize,
    /// Optional cap on items collected per company.
    pub per_company_cap: Option<usize>,
}

/// A `{name: ...}` reference as the platform nests them (areas, employers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salary {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// One employment-history entry of a resume.
///
/// Dates stay in the platform's string form (`YYYY-MM-DD`, sometimes with a
/// time suffix) and are parsed lazily where the recency rule needs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A raw search result before enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub area: Option<NamedRef>,
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub alternate_url: Option<String>,
    /// Employment history (resumes).
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    /// Posting employer (vacancies).
    #[serde(default)]
    pub employer: Option<NamedRef>,
}

impl CandidateItem {
    /// Entries the exact-match filter runs against.
    ///
    /// Resumes expose a history list; a vacancy carries a single employer,
    /// which is treated as one current (end-less) entry so the same filter
    /// applies to both sources.
    pub fn history(&self) -> Vec<ExperienceEntry> {
        if !self.experience.is_empty() {
            return self.experience.clone();
        }
        match self.employer.as_ref().and_then(|e| e.name.clone()) {
            Some(name) => vec![ExperienceEntry {
                company: Some(name),
                position: None,
                start: None,
                end: None,
                description: None,
            }],
            None => Vec::new(),
        }
    }

    /// Most recent history entry, used for the output columns.
    ///
    /// Relies on the platform listing experience most-recent-first; entries
    /// are never re-sorted locally.
    pub fn latest_entry(&self) -> Option<&ExperienceEntry> {
        self.experience.first()
    }
}

/// One page of the search endpoint's response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<CandidateItem>,
    /// Total matches reported by the platform for this query.
    #[serde(default)]
    pub found: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Secondary record from the per-item detail endpoint. Every field is
/// optional: missing detail data must never drop an item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemDetail {
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A candidate item plus whatever the detail call returned.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: CandidateItem,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub status: Option<String>,
    pub detail_description: Option<String>,
}

impl EnrichedItem {
    /// Pass an item through with empty enrichment fields.
    pub fn bare(item: CandidateItem) -> Self {
        Self {
            item,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            status: None,
            detail_description: None,
        }
    }

    pub fn with_detail(item: CandidateItem, detail: ItemDetail) -> Self {
        let contact = detail.contact.unwrap_or_default();
        Self {
            item,
            contact_name: contact.name,
            contact_email: contact.email,
            contact_phone: contact.phone,
            status: detail.status,
            detail_description: detail.description,
        }
    }
}

/// Whether a run finished on its own or was cut short by the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    Partial,
}

/// Result of one search run, before enrichment.
#[derive(Debug)]
pub struct SearchOutcome {
    /// Surviving items in first-seen order (company, then page, then
    /// within-page). Never re-sorted.
    pub items: Vec<CandidateItem>,
    pub status: RunStatus,
    /// Companies actually searched before a cap or the deadline stopped
    /// iteration.
    pub companies_searched: usize,
    /// Items kept per input company, in input order.
    pub per_company: Vec<(String, usize)>,
    /// Non-fatal failures surfaced to the caller (skipped companies,
    /// failed pages).
    pub notes: Vec<String>,
}
