use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use candidatefinder::cli::Cli;
use candidatefinder::client::ApiClient;
use candidatefinder::config::{AppConfig, ConfigError};
use candidatefinder::deadline::Deadline;
use candidatefinder::enrich::enrich_items;
use candidatefinder::export;
use candidatefinder::input::parse_company_file;
use candidatefinder::models::{RunStatus, SearchQuery};
use candidatefinder::search::run_search;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "candidatefinder=info",
        1 => "candidatefinder=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load config, falling back to the embedded defaults (optionally writing
/// them out first when running interactively).
fn load_config() -> Result<AppConfig> {
    match AppConfig::load() {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            if let Some(path) = AppConfig::prompt_create_config()? {
                println!("Created default configuration at {}", path.display());
                return Ok(AppConfig::load()?);
            }
            info!("No configuration file found, using embedded defaults");
            Ok(AppConfig::embedded_defaults()?)
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.init {
        let path = AppConfig::create_default_config()?;
        println!("Created default configuration at {}", path.display());
        return Ok(());
    }

    if let Err(msg) = cli.validate() {
        eprintln!("Error: {}", msg);
        std::process::exit(1);
    }

    let mut config = load_config()?;

    // CLI overrides
    if let Some(base_url) = &cli.base_url {
        config.http.base_url = base_url.clone();
    }
    if let Some(max_retries) = cli.max_retries {
        config.rate_limit.max_retries = max_retries;
    }
    if let Some(budget) = cli.budget_secs {
        config.run.budget_secs = budget;
    }
    if let Some(cap) = cli.total_cap {
        config.search.total_cap = cap;
    }
    if let Some(cap) = cli.per_company_cap {
        config.search.per_company_cap = cap;
    }
    config.validate()?;

    let companies = match &cli.input_file {
        Some(file) => parse_company_file(Path::new(file))
            .with_context(|| format!("Failed to read company list from {}", file))?,
        None => cli.companies.clone(),
    };

    let query = SearchQuery {
        text: cli.query.clone().unwrap_or_default(),
        companies,
        total_cap: config.search.total_cap,
        per_company_cap: match config.search.per_company_cap {
            0 => None,
            cap => Some(cap),
        },
    };
    let kind = cli.search_kind();

    let token = cli.token.clone().unwrap_or_default();
    let client = ApiClient::new(&config.http, &config.rate_limit, &token)?;
    let deadline = Deadline::after(config.run.effective_budget());

    info!(
        "Searching {} for {} companies (cap {}, budget {:?})",
        kind.as_str(),
        query.companies.len(),
        query.total_cap,
        config.run.effective_budget()
    );

    let mut outcome = run_search(&client, kind, &query, &config.search, deadline).await?;
    let candidates = std::mem::take(&mut outcome.items);

    let enriched = enrich_items(&client, kind, candidates, &config.enrich, deadline).await;
    let status = if enriched.complete {
        outcome.status
    } else {
        RunStatus::Partial
    };
    if status == RunStatus::Partial {
        warn!("Run hit the time budget; results are partial");
    }

    let output_path = export::resolve_output_path(
        &cli.output,
        cli.output_dir.as_deref(),
        &cli.output_format,
    );
    match cli.output_format.as_str() {
        "json" => export::export_json(
            &outcome,
            status,
            &enriched.items,
            enriched.enriched_count,
            &output_path,
        )?,
        _ => export::export_csv(kind, &enriched.items, &output_path)?,
    }

    export::print_run_summary(&outcome, status, enriched.items.len(), enriched.enriched_count);
    println!("Results written to {}", output_path);

    Ok(())
}
