//! Location resolver.
//!
//! Turns raw caller input (address, zip, or a lat/lng point) into a canonical
//! [`LocationDescriptor`] via an external geocoding service. When no geocoder
//! credential is configured, or the geocoding call fails, falls back to
//! scanning the raw address for a two-letter US state abbreviation.
//!
//! # Fallback
//!
//! The fallback only ever yields `{ state }` — no county/city/zip — which is
//! still enough for the state-dump roster provider to run. Tokens are matched
//! case-insensitively and validated against the real state abbreviation set,
//! so "St" in "123 Main St" is not mistaken for a state.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

use crate::config::GeocoderConfig;
use crate::error::{LookupError, LookupResult};
use crate::models::{LocationDescriptor, Point};

/// Raw location input as supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct LocationQuery {
    pub address: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LocationQuery {
    /// The caller's point, when both coordinates were supplied.
    pub fn point(&self) -> Option<Point> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Point { lat, lng }),
            _ => None,
        }
    }

    /// Checks that at least one of address / zip / point is usable and that
    /// a supplied zip is exactly five digits.
    pub fn validate(&self) -> LookupResult<()> {
        if let Some(zip) = &self.zip {
            if !is_valid_zip(zip) {
                return Err(LookupError::InvalidInput(format!(
                    "zip must be exactly 5 digits, got '{}'",
                    zip
                )));
            }
        }
        if self.address.is_none() && self.zip.is_none() && self.point().is_none() {
            return Err(LookupError::InvalidInput(
                "one of address, zip, or lat+lng is required".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn is_valid_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

static STATE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([A-Z]{2})\b").expect("state token regex"));

const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Extract the first token that is a real state abbreviation.
fn extract_state(address: &str) -> Option<String> {
    for cap in STATE_TOKEN_RE.captures_iter(address) {
        let token = cap[1].to_ascii_uppercase();
        if US_STATES.contains(&token.as_str()) {
            return Some(token);
        }
    }
    None
}

// Wire shape of the geocoder's response. Optionality is kept faithful here;
// only the best (first) result is consumed.
#[derive(Debug, serde::Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, serde::Deserialize)]
struct GeocodeResult {
    address_components: Option<AddressComponents>,
    location: Option<RawPoint>,
}

#[derive(Debug, serde::Deserialize)]
struct AddressComponents {
    state: Option<String>,
    county: Option<String>,
    city: Option<String>,
    zip: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct RawPoint {
    lat: f64,
    lng: f64,
}

/// Resolve caller input into a canonical descriptor.
///
/// Validation failures are [`LookupError::InvalidInput`]; a geocoder that is
/// unconfigured or unreachable triggers the address fallback; a fallback miss
/// is [`LookupError::LocationUnresolved`].
pub async fn resolve(
    config: &GeocoderConfig,
    query: &LocationQuery,
) -> LookupResult<LocationDescriptor> {
    query.validate()?;

    let Some(api_key) = config.credential() else {
        return fallback(query);
    };

    match geocode(config, &api_key, query).await {
        Ok(descriptor) => Ok(descriptor),
        Err(LookupError::LocationUnresolved) => Err(LookupError::LocationUnresolved),
        // Transport or upstream failure: try the regex fallback before
        // giving up.
        Err(_) => fallback(query),
    }
}

fn fallback(query: &LocationQuery) -> LookupResult<LocationDescriptor> {
    let Some(address) = &query.address else {
        return Err(LookupError::LocationUnresolved);
    };
    match extract_state(address) {
        Some(state) => Ok(LocationDescriptor {
            state,
            zip: query.zip.clone(),
            point: query.point(),
            ..Default::default()
        }),
        None => Err(LookupError::LocationUnresolved),
    }
}

async fn geocode(
    config: &GeocoderConfig,
    api_key: &str,
    query: &LocationQuery,
) -> LookupResult<LocationDescriptor> {
    let q = if let Some(address) = &query.address {
        address.clone()
    } else if let Some(zip) = &query.zip {
        zip.clone()
    } else if let Some(point) = query.point() {
        format!("{},{}", point.lat, point.lng)
    } else {
        return Err(LookupError::InvalidInput(
            "no location input supplied".to_string(),
        ));
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| LookupError::provider("geocoder", None, e.to_string()))?;

    let response = client
        .get(&config.base_url)
        .query(&[("api_key", api_key), ("q", q.as_str()), ("limit", "1")])
        .send()
        .await
        .map_err(|e| LookupError::provider("geocoder", None, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LookupError::provider(
            "geocoder",
            Some(status.as_u16()),
            body,
        ));
    }

    let parsed: GeocodeResponse = response
        .json()
        .await
        .map_err(|e| LookupError::provider("geocoder", Some(status.as_u16()), e.to_string()))?;

    let Some(best) = parsed.results.into_iter().next() else {
        return Err(LookupError::LocationUnresolved);
    };

    let components = best.address_components.unwrap_or(AddressComponents {
        state: None,
        county: None,
        city: None,
        zip: None,
    });

    let Some(state) = components.state.filter(|s| !s.is_empty()) else {
        return Err(LookupError::LocationUnresolved);
    };

    Ok(LocationDescriptor {
        state,
        county: components.county,
        city: components.city,
        // The caller's own zip is more specific than the geocoder's
        // centroid-derived one.
        zip: query.zip.clone().or(components.zip),
        point: query
            .point()
            .or(best.location.map(|p| Point { lat: p.lat, lng: p.lng })),
    })
}
