//! Cursor-paginated officeholder directory client.
//!
//! This provider supports precise location filtering (address, point, or zip)
//! but only hands out results page by page: each response carries an opaque
//! `endCursor` plus a `hasNextPage` flag, and the full roster is only
//! available by walking the cursor chain to the end.
//!
//! # Pagination
//!
//! Pages are fetched sequentially — the next cursor is only known once the
//! previous page resolves — and accumulation stops when:
//!
//! - `hasNextPage` is false (dataset exhausted),
//! - `fetch_all` is false (caller wanted a single page),
//! - an explicit `limit` has been reached, or
//! - the hard `max_pages` safety cap is hit.
//!
//! A failed page (non-2xx, network error, or an error payload) aborts the
//! whole fetch and discards the pages already accumulated: a silently
//! truncated roster is worse than a failed request.

use serde::Deserialize;
use std::time::Duration;

use crate::config::DirectoryConfig;
use crate::error::{LookupError, LookupResult};
use crate::geocode::LocationQuery;
use crate::models::{OfficeHolder, Point};
use crate::normalize;

const PROVIDER: &str = "directory";

/// Location filter for the directory query, in precedence order:
/// address, then point, then zip.
#[derive(Debug, Clone)]
pub enum LocationFilter {
    Address(String),
    Point(Point),
    Zip(String),
}

impl LocationFilter {
    /// Build a filter from caller input, applying the precedence order.
    pub fn from_query(query: &LocationQuery) -> Option<LocationFilter> {
        if let Some(address) = &query.address {
            return Some(LocationFilter::Address(address.clone()));
        }
        if let Some(point) = query.point() {
            return Some(LocationFilter::Point(point));
        }
        query.zip.clone().map(LocationFilter::Zip)
    }

    fn to_variable(&self) -> serde_json::Value {
        match self {
            LocationFilter::Address(address) => serde_json::json!({ "address": address }),
            LocationFilter::Point(point) => {
                serde_json::json!({ "point": { "lat": point.lat, "lng": point.lng } })
            }
            LocationFilter::Zip(zip) => serde_json::json!({ "zip": zip }),
        }
    }
}

/// Fetch behavior knobs. `current_only` defaults to true so vacated and
/// historical seats are excluded by the provider itself.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub current_only: bool,
    pub fetch_all: bool,
    pub limit: Option<usize>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            current_only: true,
            fetch_all: true,
            limit: None,
        }
    }
}

// ============ Wire types ============
//
// Field optionality mirrors the provider's payload; defaults are applied by
// the normalizer, not here.

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Data>,
    errors: Option<Vec<ApiError>>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    office_holders: Option<Connection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection {
    #[serde(default)]
    nodes: Vec<DirectoryNode>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryNode {
    pub id: Option<String>,
    pub is_current: Option<bool>,
    pub office_title: Option<String>,
    pub person: Option<DirectoryPerson>,
    pub position: Option<DirectoryPosition>,
    pub addresses: Option<Vec<DirectoryAddress>>,
    pub parties: Option<Vec<DirectoryParty>>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryPerson {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub contacts: Option<Vec<DirectoryContact>>,
    pub urls: Option<Vec<DirectoryUrl>>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryContact {
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryUrl {
    #[serde(rename = "type")]
    pub url_type: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryPosition {
    pub name: Option<String>,
    pub level: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryAddress {
    #[serde(rename = "type")]
    pub address_type: Option<String>,
    pub line_1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoryParty {
    pub name: Option<String>,
}

const OFFICE_HOLDERS_QUERY: &str = r#"
query OfficeHolders($filter: OfficeHolderFilter!, $first: Int!, $after: String) {
  officeHolders(filter: $filter, first: $first, after: $after) {
    nodes {
      id
      isCurrent
      officeTitle
      person { fullName firstName lastName contacts { type value } urls { type url } }
      position { name level description state }
      addresses { type line1 city state zip }
      parties { name }
      startAt
      endAt
    }
    pageInfo { hasNextPage endCursor }
  }
}
"#;

/// Fetch all officeholders matching a location filter, walking the cursor
/// chain to exhaustion (subject to [`FetchOptions`] and the page cap).
///
/// Returns normalized records; raw wire shapes never leave this module.
pub async fn fetch_by_location(
    config: &DirectoryConfig,
    filter: &LocationFilter,
    options: &FetchOptions,
) -> LookupResult<Vec<OfficeHolder>> {
    let Some(api_key) = config.credential() else {
        return Err(LookupError::NotConfigured(PROVIDER));
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| LookupError::provider(PROVIDER, None, e.to_string()))?;

    let mut accumulated: Vec<OfficeHolder> = Vec::new();
    let mut cursor: Option<String> = None;

    for _page in 0..config.max_pages {
        let mut filter_var = filter.to_variable();
        if options.current_only {
            filter_var["isCurrent"] = serde_json::Value::Bool(true);
        }

        let body = serde_json::json!({
            "query": OFFICE_HOLDERS_QUERY,
            "variables": {
                "filter": filter_var,
                "first": config.page_size,
                "after": cursor,
            },
        });

        let response = client
            .post(&config.base_url)
            .bearer_auth(&api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LookupError::provider(PROVIDER, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LookupError::provider(PROVIDER, Some(status.as_u16()), text));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| LookupError::provider(PROVIDER, Some(status.as_u16()), e.to_string()))?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let message = errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(LookupError::provider(PROVIDER, Some(status.as_u16()), message));
            }
        }

        let connection = envelope
            .data
            .and_then(|d| d.office_holders)
            .ok_or_else(|| {
                LookupError::provider(PROVIDER, Some(status.as_u16()), "missing officeHolders data")
            })?;

        for node in connection.nodes {
            accumulated.push(normalize::from_directory(node));
        }

        if let Some(limit) = options.limit {
            if accumulated.len() >= limit {
                accumulated.truncate(limit);
                break;
            }
        }

        if !options.fetch_all || !connection.page_info.has_next_page {
            break;
        }

        cursor = connection.page_info.end_cursor;
    }

    Ok(accumulated)
}
