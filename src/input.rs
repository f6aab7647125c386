//! Company list parsing from CSV and JSON input files.
//!
//! Supports:
//! - CSV files with one company per line or a "company" column
//! - JSON files with an array of name strings, an array of objects with a
//!   "company" field, or an object with a "companies" array
//!
//! The pipeline itself only requires a list of strings; everything about
//! where the list came from stays in this module.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Input format for company list files
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") | Some("txt") => Some(Self::Csv),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse a company list from a file (auto-detects format from extension)
pub fn parse_company_file(path: &Path) -> Result<Vec<String>> {
    let format = InputFormat::from_path(path).context(format!(
        "Cannot determine input format from file extension. Expected .csv, .txt or .json: {}",
        path.display()
    ))?;

    let content = fs::read_to_string(path)
        .context(format!("Failed to read input file: {}", path.display()))?;

    let companies = match format {
        InputFormat::Csv => parse_csv_companies(&content)?,
        InputFormat::Json => parse_json_companies(&content)?,
    };

    if companies.is_empty() {
        bail!("Input file contains no company names: {}", path.display());
    }
    Ok(companies)
}

/// Parse companies from CSV content.
///
/// Supports two formats:
/// 1. One company per line (no header), `#` lines are comments
/// 2. CSV with a "company" column header
pub fn parse_csv_companies(content: &str) -> Result<Vec<String>> {
    let mut companies = Vec::new();
    let lines: Vec<&str> = content.lines().collect();

    if lines.is_empty() {
        return Ok(companies);
    }

    let has_header = lines[0].to_lowercase().contains("company");

    if has_header {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .context("Failed to read CSV headers")?
            .clone();

        let company_idx = headers
            .iter()
            .position(|h| h.to_lowercase() == "company")
            .context("CSV must have a 'company' column when using headers")?;

        for result in reader.records() {
            let record = result.context("Failed to parse CSV record")?;
            if let Some(name) = record
                .get(company_idx)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
            {
                companies.push(name);
            }
        }
    } else {
        for line in lines {
            // Plain lists may still be comma-delimited; the name is the
            // first column.
            let name = line.split(',').next().unwrap_or(line).trim();
            if name.is_empty() || name.starts_with('#') {
                continue;
            }
            companies.push(name.to_string());
        }
    }

    Ok(companies)
}

/// Parse companies from JSON content.
///
/// Supports three formats:
/// 1. Array of strings: `["Acme", "Globex"]`
/// 2. Array of objects: `[{"company": "Acme"}, {"company": "Globex"}]`
/// 3. Object with array: `{"companies": ["Acme", "Globex"]}`
pub fn parse_json_companies(content: &str) -> Result<Vec<String>> {
    let value: serde_json::Value =
        serde_json::from_str(content).context("Failed to parse JSON input")?;

    let array = match &value {
        serde_json::Value::Array(arr) => arr.clone(),
        serde_json::Value::Object(obj) => match obj.get("companies") {
            Some(serde_json::Value::Array(arr)) => arr.clone(),
            _ => bail!("JSON object input must contain a 'companies' array"),
        },
        _ => bail!("JSON input must be an array or an object with a 'companies' array"),
    };

    let mut companies = Vec::new();
    for entry in array {
        let name = match &entry {
            serde_json::Value::String(s) => Some(s.trim().to_string()),
            serde_json::Value::Object(obj) => obj
                .get("company")
                .and_then(|v| v.as_str())
                .map(|s| s.trim().to_string()),
            _ => None,
        };
        match name {
            Some(n) if !n.is_empty() => companies.push(n),
            _ => bail!("JSON entry is not a company name: {}", entry),
        }
    }

    Ok(companies)
}
