//! Locality matcher.
//!
//! The roster provider returns every official in a state, so records must be
//! heuristically narrowed to the caller's zip/city/county. A record matches
//! when any single criterion hits on any of its addresses — logical OR, no
//! partial-credit scoring. Records with no addresses carry no evidence of
//! locality and never match.

use crate::models::{LocationDescriptor, OfficeHolder};

/// Strip a ZIP+4 suffix, leaving the 5-digit prefix.
fn base_zip(zip: &str) -> &str {
    zip.split('-').next().unwrap_or(zip)
}

fn city_eq(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// County names arrive both as "Marin" and "Marin County"; compare on the
/// lowercased name with any trailing "county" removed.
fn county_key(county: &str) -> String {
    let lower = county.trim().to_lowercase();
    lower
        .strip_suffix(" county")
        .map(|s| s.to_string())
        .unwrap_or(lower)
}

/// Decide whether a state-wide record is plausibly local to the requested
/// location.
pub fn is_local_match(holder: &OfficeHolder, location: &LocationDescriptor) -> bool {
    if holder.addresses.is_empty() {
        return false;
    }

    for address in &holder.addresses {
        if let (Some(have), Some(want)) = (address.zip.as_deref(), location.zip.as_deref()) {
            if base_zip(have) == base_zip(want) {
                return true;
            }
        }
        if let (Some(have), Some(want)) = (address.city.as_deref(), location.city.as_deref()) {
            if city_eq(have, want) {
                return true;
            }
        }
    }

    if let Some(county) = location.county.as_deref() {
        let key = county_key(county);
        if !key.is_empty() {
            let mut haystacks = Vec::new();
            if let Some(description) = holder.position.description.as_deref() {
                haystacks.push(description);
            }
            if let Some(title) = holder.office_title.as_deref() {
                haystacks.push(title);
            }
            if haystacks
                .iter()
                .any(|text| text.to_lowercase().contains(&key))
            {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Level, Position};

    fn holder_with_addresses(addresses: Vec<Address>) -> OfficeHolder {
        OfficeHolder {
            id: "t-1".to_string(),
            is_current: true,
            office_title: None,
            person: None,
            position: Position {
                name: "Test Office".to_string(),
                level: Level::Local,
                description: None,
                state: None,
            },
            addresses,
            parties: vec![],
            start_at: None,
            end_at: None,
            total_years_in_office: None,
        }
    }

    fn location(zip: Option<&str>, city: Option<&str>, county: Option<&str>) -> LocationDescriptor {
        LocationDescriptor {
            state: "CA".to_string(),
            county: county.map(String::from),
            city: city.map(String::from),
            zip: zip.map(String::from),
            point: None,
        }
    }

    #[test]
    fn test_zip_plus_four_matches_base_zip() {
        let holder = holder_with_addresses(vec![Address {
            zip: Some("94105-1234".to_string()),
            ..Default::default()
        }]);
        assert!(is_local_match(&holder, &location(Some("94105"), None, None)));
    }

    #[test]
    fn test_no_addresses_never_matches() {
        let holder = holder_with_addresses(vec![]);
        assert!(!is_local_match(
            &holder,
            &location(Some("94105"), Some("San Francisco"), Some("San Francisco"))
        ));
    }

    #[test]
    fn test_city_match_is_case_insensitive() {
        let holder = holder_with_addresses(vec![Address {
            city: Some("  OAKLAND ".to_string()),
            ..Default::default()
        }]);
        assert!(is_local_match(&holder, &location(None, Some("oakland"), None)));
    }

    #[test]
    fn test_county_match_via_description() {
        let mut holder = holder_with_addresses(vec![Address {
            zip: Some("90000".to_string()),
            ..Default::default()
        }]);
        holder.position.description = Some("Alameda County Water District".to_string());
        assert!(is_local_match(
            &holder,
            &location(None, None, Some("Alameda County"))
        ));
    }

    #[test]
    fn test_any_address_suffices() {
        let holder = holder_with_addresses(vec![
            Address {
                zip: Some("90001".to_string()),
                ..Default::default()
            },
            Address {
                zip: Some("94105".to_string()),
                ..Default::default()
            },
        ]);
        assert!(is_local_match(&holder, &location(Some("94105"), None, None)));
    }

    #[test]
    fn test_mismatch_everywhere_fails() {
        let holder = holder_with_addresses(vec![Address {
            zip: Some("90001".to_string()),
            city: Some("Fresno".to_string()),
            ..Default::default()
        }]);
        assert!(!is_local_match(
            &holder,
            &location(Some("94105"), Some("Oakland"), Some("Marin"))
        ));
    }
}
