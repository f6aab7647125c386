// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod cli;
pub mod client;
pub mod collector;
pub mod config;
pub mod deadline;
pub mod enrich;
pub mod export;
pub mod input;
pub mod models;
pub mod normalizer;
pub mod search;

pub use client::{ApiClient, FetchError};
pub use deadline::Deadline;
pub use models::{
    CandidateItem, EnrichedItem, RunStatus, SearchKind, SearchOutcome, SearchQuery,
};
pub use normalizer::normalize_company_name;
