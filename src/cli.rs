use clap::Parser;

use crate::models::SearchKind;

#[derive(Parser, Debug)]
#[command(name = "candidatefinder")]
#[command(about = "Search a recruiting platform for candidates at given companies and enrich the results")]
#[command(version)]
pub struct Cli {
    /// Create default configuration file at ./config/candidatefinder.toml
    #[arg(long)]
    pub init: bool,

    /// Free-text search query; the platform's boolean/phrase syntax is
    /// passed through verbatim (e.g. '"internal communications"~3')
    #[arg(short, long)]
    pub query: Option<String>,

    /// Company name to search for (repeat for multiple companies)
    #[arg(short, long = "company", value_name = "NAME")]
    pub companies: Vec<String>,

    /// Path to a CSV, TXT or JSON file containing company names
    /// CSV: one name per line, or a column named "company"
    /// JSON: array of strings, array of objects with a "company" field,
    /// or an object with a "companies" array
    #[arg(long, value_name = "FILE", conflicts_with = "companies")]
    pub input_file: Option<String>,

    /// What to search: 'resumes' (default) or 'vacancies'
    #[arg(short = 'k', long, default_value = "resumes")]
    pub kind: String,

    /// Cap on the total number of results (overrides config)
    #[arg(long, value_name = "N")]
    pub total_cap: Option<usize>,

    /// Cap on results kept per company (overrides config)
    #[arg(long, value_name = "N")]
    pub per_company_cap: Option<usize>,

    /// Wall-clock budget for the whole run, in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    pub budget_secs: Option<u64>,

    /// OAuth bearer token for the platform API
    #[arg(long, env = "HH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format: 'csv' (default) or 'json'
    #[arg(short = 'f', long, default_value = "csv")]
    pub output_format: String,

    /// Output filename (extension will be set based on format if not provided)
    #[arg(short, long, default_value = "candidates")]
    pub output: String,

    /// Output directory for the results file (defaults to the current directory)
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Base URL of the platform API (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Maximum retry attempts for failed requests (overrides config)
    #[arg(long, value_name = "COUNT")]
    pub max_retries: Option<u32>,

    /// Verbose logging (use -v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if self.init {
            return Ok(());
        }

        match &self.query {
            None => return Err("Query is required (use --query)".to_string()),
            Some(q) if q.trim().is_empty() => {
                return Err("Query cannot be empty".to_string())
            }
            _ => {}
        }

        if self.companies.is_empty() && self.input_file.is_none() {
            return Err(
                "At least one --company or an --input-file is required".to_string(),
            );
        }

        if self.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(
                "API token is required (use --token or the HH_TOKEN environment variable)"
                    .to_string(),
            );
        }

        if SearchKind::parse(&self.kind).is_none() {
            return Err("Kind must be 'resumes' or 'vacancies'".to_string());
        }

        if !["csv", "json"].contains(&self.output_format.as_str()) {
            return Err("Output format must be 'csv' or 'json'".to_string());
        }

        if self.total_cap == Some(0) {
            return Err("Total cap must be greater than 0".to_string());
        }

        if self.budget_secs == Some(0) {
            return Err("Budget must be greater than 0 seconds".to_string());
        }

        Ok(())
    }

    /// Search kind; only valid after `validate()` has passed.
    pub fn search_kind(&self) -> SearchKind {
        SearchKind::parse(&self.kind).unwrap_or(SearchKind::Resumes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            init: false,
            query: Some("communications".to_string()),
            companies: vec!["Acme".to_string()],
            input_file: None,
            kind: "resumes".to_string(),
            total_cap: None,
            per_company_cap: None,
            budget_secs: None,
            token: Some("secret".to_string()),
            output_format: "csv".to_string(),
            output: "candidates".to_string(),
            output_dir: None,
            base_url: None,
            max_retries: None,
            verbose: 0,
        }
    }

    #[test]
    fn test_valid_args_pass() {
        assert!(base_cli().validate().is_ok());
    }

    #[test]
    fn test_missing_query_rejected() {
        let mut cli = base_cli();
        cli.query = None;
        assert!(cli.validate().unwrap_err().contains("Query"));
    }

    #[test]
    fn test_missing_companies_rejected() {
        let mut cli = base_cli();
        cli.companies.clear();
        assert!(cli.validate().unwrap_err().contains("company"));
    }

    #[test]
    fn test_missing_token_rejected() {
        let mut cli = base_cli();
        cli.token = None;
        assert!(cli.validate().unwrap_err().contains("token"));
    }

    #[test]
    fn test_bad_kind_rejected() {
        let mut cli = base_cli();
        cli.kind = "projects".to_string();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let mut cli = base_cli();
        cli.total_cap = Some(0);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_init_skips_run_validation() {
        let mut cli = base_cli();
        cli.init = true;
        cli.query = None;
        cli.token = None;
        assert!(cli.validate().is_ok());
    }
}
