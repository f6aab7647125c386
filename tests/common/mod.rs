//! Shared fixtures for wiremock-backed pipeline tests.

#![allow(dead_code)]

use candidatefinder::client::ApiClient;
use candidatefinder::config::{EnrichConfig, HttpConfig, RateLimitConfig, SearchConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at a mock server, with fast backoff so retry tests
/// don't slow the suite down.
pub fn test_client(base_url: &str) -> ApiClient {
    let http = HttpConfig {
        base_url: base_url.to_string(),
        user_agent: "candidatefinder-tests/1.0".to_string(),
        request_timeout_secs: 5,
    };
    let retry = RateLimitConfig {
        max_retries: 2,
        backoff_increment_ms: 10,
    };
    ApiClient::new(&http, &retry, "test-token").expect("client should build")
}

pub fn search_config() -> SearchConfig {
    SearchConfig {
        per_page: 100,
        total_cap: 100,
        per_company_cap: 0,
        recency_days: 365,
    }
}

/// Zero delays: the throttle behavior itself is not what these tests time.
pub fn enrich_config() -> EnrichConfig {
    EnrichConfig {
        batch_size: 10,
        item_delay_ms: 0,
        batch_delay_ms: 0,
    }
}

pub fn page_body(items: Vec<Value>, found: u64) -> Value {
    json!({ "items": items, "found": found })
}

/// A minimal resume search item with one employment-history entry.
pub fn resume(id: &str, title: &str, company: &str, end: Option<String>) -> Value {
    json!({
        "id": id,
        "title": title,
        "alternate_url": format!("https://example.com/resumes/{}", id),
        "experience": [{
            "company": company,
            "position": "manager",
            "start": "2020-01-01",
            "end": end,
        }],
    })
}

/// `YYYY-MM-DD` for a date the given number of days before today.
pub fn days_ago(days: i64) -> String {
    (chrono::Utc::now().date_naive() - chrono::Duration::days(days)).to_string()
}

/// Mount one page of a search response for an exact query text.
pub async fn mount_search_page(
    server: &MockServer,
    route: &str,
    text: &str,
    page: u32,
    body: Value,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("text", text))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a detail response for one item.
pub async fn mount_detail(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
