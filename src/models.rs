//! Core data models for the directory aggregation pipeline.
//!
//! These types represent the canonical location descriptor and the normalized
//! officeholder schema that every provider's records are mapped into before
//! locality matching and ranking.

use serde::{Deserialize, Serialize};

/// Jurisdiction tier of a position, from widest to narrowest.
///
/// Serialized lowercase (`"federal"`, `"state"`, ...) to match the HTTP
/// response's `byLevel` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Federal,
    State,
    Regional,
    County,
    City,
    Local,
}

impl Level {
    /// All levels in display order. Every response bucket set covers these,
    /// including empty ones.
    pub const ALL: [Level; 6] = [
        Level::Federal,
        Level::State,
        Level::Regional,
        Level::County,
        Level::City,
        Level::Local,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Federal => "federal",
            Level::State => "state",
            Level::Regional => "regional",
            Level::County => "county",
            Level::City => "city",
            Level::Local => "local",
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "federal" => Ok(Level::Federal),
            "state" => Ok(Level::State),
            "regional" => Ok(Level::Regional),
            "county" => Ok(Level::County),
            "city" => Ok(Level::City),
            "local" => Ok(Level::Local),
            other => Err(format!("unknown level: {}", other)),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical geographic descriptor produced by the location resolver.
///
/// `state` is always present after successful resolution; the sub-state
/// fields are filled in when the geocoder supplies them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationDescriptor {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

/// A normalized officeholder record.
///
/// `person: None` marks a vacant seat; vacant seats survive normalization and
/// locality matching but are dropped before ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeHolder {
    pub id: String,
    pub is_current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    pub position: Position,
    pub addresses: Vec<Address>,
    pub parties: Vec<Party>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<chrono::NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_years_in_office: Option<i64>,
}

impl OfficeHolder {
    /// A seat with no person attached is vacant and never ranked.
    pub fn is_vacant(&self) -> bool {
        self.person.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub contacts: Vec<Contact>,
    pub urls: Vec<Url>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub name: String,
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A contact channel (email, phone, fax) with an optional type discriminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Url {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub url_type: Option<String>,
    pub url: String,
}

/// One level's worth of ranked officeholders. Recomputed per request, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedGroup {
    pub level: Level,
    pub members: Vec<OfficeHolder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_roundtrip() {
        for level in Level::ALL {
            let parsed: Level = level.as_str().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn test_level_parse_rejects_unknown() {
        assert!("province".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Level::Federal).unwrap(),
            "\"federal\""
        );
    }
}
