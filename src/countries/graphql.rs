//! Client for the countries GraphQL endpoint

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Country;

/// Public endpoint serving `{ countries { code name } }`
pub const DEFAULT_ENDPOINT: &str = "https://countries.trevorblades.com/";

const COUNTRIES_QUERY: &str = "{ countries { code name } }";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("response has no data.countries")]
    MissingCountries,
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<CountriesData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct CountriesData {
    #[serde(default)]
    countries: Option<Vec<Country>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Build the HTTP client used for every load
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, LoadError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// POST the countries query and return the list in API order
pub async fn fetch_countries(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<Vec<Country>, LoadError> {
    tracing::debug!("Fetching countries from {}", endpoint);

    let response = client
        .post(endpoint)
        .json(&GraphQlRequest { query: COUNTRIES_QUERY })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status(status));
    }

    let body = response.text().await?;
    let countries = parse_response(&body)?;
    tracing::info!("Loaded {} countries", countries.len());
    Ok(countries)
}

/// Extract `data.countries` from a GraphQL response body
pub fn parse_response(body: &str) -> Result<Vec<Country>, LoadError> {
    let response: GraphQlResponse = serde_json::from_str(body)?;

    if !response.errors.is_empty() {
        return Err(LoadError::GraphQl(
            response.errors.into_iter().map(|e| e.message).collect(),
        ));
    }

    response
        .data
        .and_then(|d| d.countries)
        .ok_or(LoadError::MissingCountries)
}
