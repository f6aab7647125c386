//! Rendering and export of enriched results.
//!
//! The column schema is fixed per search kind. Missing optional fields are
//! rendered as an explicit "N/A" placeholder rather than omitted, and all
//! defaulting logic lives here instead of being scattered across call
//! sites. Delimited output goes through the csv crate, which quotes fields
//! containing the delimiter, quote character or newlines.

use anyhow::Result;
use chrono::Utc;
use csv::Writer;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use tracing::{debug, info};

use crate::models::{EnrichedItem, RunStatus, SearchKind, SearchOutcome};

/// Placeholder for absent optional fields.
pub const NA: &str = "N/A";

/// Fixed header row for the given search kind.
pub fn columns(kind: SearchKind) -> &'static [&'static str] {
    match kind {
        SearchKind::Resumes => &[
            "title",
            "last_company",
            "last_position",
            "area",
            "salary",
            "updated_at",
            "contact_name",
            "contact_email",
            "contact_phone",
            "link",
        ],
        SearchKind::Vacancies => &[
            "title",
            "employer",
            "area",
            "salary",
            "updated_at",
            "status",
            "link",
        ],
    }
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => NA.to_string(),
    }
}

fn salary_text(item: &EnrichedItem) -> String {
    match item.item.salary.as_ref().and_then(|s| s.amount) {
        Some(amount) => {
            let currency = item
                .item
                .salary
                .as_ref()
                .and_then(|s| s.currency.as_deref())
                .unwrap_or("");
            if currency.is_empty() {
                amount.to_string()
            } else {
                format!("{} {}", amount, currency)
            }
        }
        None => NA.to_string(),
    }
}

fn row(kind: SearchKind, item: &EnrichedItem) -> Vec<String> {
    let area = item.item.area.as_ref().and_then(|a| a.name.as_deref());
    match kind {
        SearchKind::Resumes => {
            let latest = item.item.latest_entry();
            vec![
                or_na(item.item.title.as_deref()),
                or_na(latest.and_then(|e| e.company.as_deref())),
                or_na(latest.and_then(|e| e.position.as_deref())),
                or_na(area),
                salary_text(item),
                or_na(item.item.updated_at.as_deref()),
                or_na(item.contact_name.as_deref()),
                or_na(item.contact_email.as_deref()),
                or_na(item.contact_phone.as_deref()),
                or_na(item.item.alternate_url.as_deref()),
            ]
        }
        SearchKind::Vacancies => vec![
            or_na(item.item.title.as_deref()),
            or_na(item.item.employer.as_ref().and_then(|e| e.name.as_deref())),
            or_na(area),
            salary_text(item),
            or_na(item.item.updated_at.as_deref()),
            or_na(item.status.as_deref()),
            or_na(item.item.alternate_url.as_deref()),
        ],
    }
}

/// Render items as ordered rows of the fixed column schema, without the
/// header. This is the surface an external spreadsheet sink consumes.
pub fn table_rows(kind: SearchKind, items: &[EnrichedItem]) -> Vec<Vec<String>> {
    items.iter().map(|item| row(kind, item)).collect()
}

pub fn export_csv(kind: SearchKind, items: &[EnrichedItem], output_path: &str) -> Result<()> {
    debug!("Exporting {} items to CSV: {}", items.len(), output_path);

    let file = File::create(output_path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(columns(kind))?;
    for item in items {
        wtr.write_record(row(kind, item))?;
    }
    wtr.flush()?;

    info!("Successfully exported {} items to CSV: {}", items.len(), output_path);
    Ok(())
}

#[derive(serde::Serialize)]
struct JsonExport<'a> {
    summary: ExportSummary,
    items: &'a [EnrichedItem],
}

#[derive(serde::Serialize)]
struct ExportSummary {
    status: RunStatus,
    total_items: usize,
    enriched_items: usize,
    companies_searched: usize,
    companies: Vec<CompanyCount>,
    notes: Vec<String>,
    generated_at: String,
}

#[derive(serde::Serialize)]
struct CompanyCount {
    company: String,
    kept: usize,
}

pub fn export_json(
    outcome: &SearchOutcome,
    status: RunStatus,
    items: &[EnrichedItem],
    enriched_count: usize,
    output_path: &str,
) -> Result<()> {
    debug!("Exporting {} items to JSON: {}", items.len(), output_path);

    let export = JsonExport {
        summary: ExportSummary {
            status,
            total_items: items.len(),
            enriched_items: enriched_count,
            companies_searched: outcome.companies_searched,
            companies: outcome
                .per_company
                .iter()
                .map(|(company, kept)| CompanyCount {
                    company: company.clone(),
                    kept: *kept,
                })
                .collect(),
            notes: outcome.notes.clone(),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        },
        items,
    };

    let json_string = serde_json::to_string_pretty(&export)?;
    let mut file = File::create(output_path)?;
    file.write_all(json_string.as_bytes())?;

    info!("Successfully exported {} items to JSON: {}", items.len(), output_path);
    Ok(())
}

/// Decide the output path from a name, directory and format, appending the
/// format extension when the name has none.
pub fn resolve_output_path(name: &str, dir: Option<&str>, format: &str) -> String {
    let file_name = if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{}.{}", name, format)
    };
    match dir {
        Some(d) => Path::new(d).join(file_name).to_string_lossy().to_string(),
        None => file_name,
    }
}

pub fn print_run_summary(
    outcome: &SearchOutcome,
    status: RunStatus,
    total_items: usize,
    enriched_count: usize,
) {
    println!("\n=== Search Summary ===");
    match status {
        RunStatus::Complete => println!("Status: complete"),
        RunStatus::Partial => println!("Status: partial (time limit reached)"),
    }
    println!("Companies searched: {}", outcome.companies_searched);
    for (company, kept) in &outcome.per_company {
        println!("  {}: {} items", company, kept);
    }
    println!("Total items: {}", total_items);
    println!("Enriched items: {}", enriched_count);
    for note in &outcome.notes {
        println!("  note: {}", note);
    }
    println!("======================\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateItem, ExperienceEntry, NamedRef, Salary};

    fn sample_item() -> EnrichedItem {
        EnrichedItem::bare(CandidateItem {
            id: "r1".to_string(),
            title: Some("Communications lead".to_string()),
            area: Some(NamedRef {
                name: Some("Moscow".to_string()),
            }),
            salary: Some(Salary {
                amount: Some(120_000),
                currency: Some("RUR".to_string()),
            }),
            updated_at: Some("2024-05-20T10:00:00+0300".to_string()),
            alternate_url: Some("https://example.com/resumes/r1".to_string()),
            experience: vec![ExperienceEntry {
                company: Some("ООО Ромашка".to_string()),
                position: Some("PR manager".to_string()),
                start: Some("2021-02-01".to_string()),
                end: None,
                description: None,
            }],
            employer: None,
        })
    }

    #[test]
    fn test_resume_row_schema() {
        let item = sample_item();
        let rows = table_rows(SearchKind::Resumes, std::slice::from_ref(&item));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), columns(SearchKind::Resumes).len());
        assert_eq!(rows[0][0], "Communications lead");
        assert_eq!(rows[0][1], "ООО Ромашка");
        assert_eq!(rows[0][4], "120000 RUR");
        assert_eq!(rows[0][9], "https://example.com/resumes/r1");
    }

    #[test]
    fn test_missing_fields_render_as_na() {
        let item = EnrichedItem::bare(CandidateItem {
            id: "r2".to_string(),
            title: None,
            area: None,
            salary: None,
            updated_at: None,
            alternate_url: None,
            experience: Vec::new(),
            employer: None,
        });
        let rows = table_rows(SearchKind::Resumes, std::slice::from_ref(&item));
        for cell in &rows[0] {
            assert_eq!(cell, NA);
        }
    }

    #[test]
    fn test_vacancy_row_schema() {
        let item = EnrichedItem::bare(CandidateItem {
            id: "v1".to_string(),
            title: Some("PR manager".to_string()),
            area: None,
            salary: None,
            updated_at: None,
            alternate_url: None,
            experience: Vec::new(),
            employer: Some(NamedRef {
                name: Some("Акме".to_string()),
            }),
        });
        let rows = table_rows(SearchKind::Vacancies, std::slice::from_ref(&item));
        assert_eq!(rows[0].len(), columns(SearchKind::Vacancies).len());
        assert_eq!(rows[0][1], "Акме");
        assert_eq!(rows[0][5], NA);
    }

    #[test]
    fn test_csv_escaping_of_delimiter_and_quote() {
        let mut wtr = Writer::from_writer(vec![]);
        wtr.write_record(["value with, comma and \"quote\""]).unwrap();
        let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(data, "\"value with, comma and \"\"quote\"\"\"\n");
    }

    #[test]
    fn test_output_path_resolution() {
        assert_eq!(resolve_output_path("candidates", None, "csv"), "candidates.csv");
        assert_eq!(
            resolve_output_path("candidates.json", None, "json"),
            "candidates.json"
        );
        assert_eq!(
            resolve_output_path("out", Some("/tmp/results"), "csv"),
            "/tmp/results/out.csv"
        );
    }
}
