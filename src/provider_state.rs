//! State-dump roster directory client.
//!
//! This provider cannot filter below state granularity: it returns every
//! official it knows for a whole state, paginated by page number. Narrowing
//! to the caller's zip/city/county happens downstream in the locality
//! matcher — this client does no filtering of its own.
//!
//! Pages are requested as 1, 2, 3, ... until a page comes back with fewer
//! than `page_limit` records (the last page) or the hard `max_pages` cap is
//! reached. A short final page is still appended before the stop condition
//! is evaluated.

use serde::Deserialize;
use std::time::Duration;

use crate::config::RosterConfig;
use crate::error::{LookupError, LookupResult};

const PROVIDER: &str = "roster";

// Wire shapes, optionality faithful to the payload. Normalization defaults
// live in the normalizer.

#[derive(Debug, Deserialize)]
struct RosterPage {
    #[serde(default)]
    officials: Vec<RawOfficial>,
}

#[derive(Debug, Deserialize)]
pub struct RawOfficial {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub office: Option<RawOffice>,
    pub organization: Option<RawOrganization>,
    pub addresses: Option<Vec<RawAddress>>,
    pub email_addresses: Option<Vec<String>>,
    pub phone_numbers: Option<Vec<String>>,
    pub urls: Option<Vec<String>>,
    pub party: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawOffice {
    pub title: Option<String>,
    pub level: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawOrganization {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAddress {
    pub address_1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Fetch the complete roster for a state, page by page.
///
/// Returns raw records; the caller normalizes and locality-filters them.
pub async fn fetch_by_state(
    config: &RosterConfig,
    state_abbr: &str,
) -> LookupResult<Vec<RawOfficial>> {
    let Some(api_key) = config.credential() else {
        return Err(LookupError::NotConfigured(PROVIDER));
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| LookupError::provider(PROVIDER, None, e.to_string()))?;

    let mut accumulated: Vec<RawOfficial> = Vec::new();

    for page in 1..=config.max_pages {
        let response = client
            .get(&config.base_url)
            .header("X-Api-Key", &api_key)
            .query(&[
                ("state_id", state_abbr.to_string()),
                ("limit", config.page_limit.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::provider(PROVIDER, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LookupError::provider(PROVIDER, Some(status.as_u16()), text));
        }

        let parsed: RosterPage = response
            .json()
            .await
            .map_err(|e| LookupError::provider(PROVIDER, Some(status.as_u16()), e.to_string()))?;

        let page_len = parsed.officials.len();
        accumulated.extend(parsed.officials);

        // Fewer records than requested means this was the last page.
        if page_len < config.page_limit {
            break;
        }
    }

    Ok(accumulated)
}
