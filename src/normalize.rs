//! Schema normalizer.
//!
//! Maps each provider's native record shape into the common [`OfficeHolder`]
//! schema. All defaults live here: absent collections become empty vectors
//! (never null), and a missing jurisdiction level is inferred from the
//! position title. The wire decoders keep optionality faithful; this module
//! is where "field may be absent" turns into something downstream code can
//! iterate unconditionally.

use chrono::NaiveDate;

use crate::models::{Address, Contact, Level, OfficeHolder, Party, Person, Position, Url};
use crate::provider_cursor::DirectoryNode;
use crate::provider_state::RawOfficial;

/// Best-effort jurisdiction level inference from a free-text position title.
///
/// Used when the provider does not supply a level directly. Keyword cues
/// only — not authoritative.
pub fn infer_level(title: &str) -> Level {
    let lower = title.to_lowercase();
    if lower.contains("congress") || lower.contains("senator") || lower.contains("representative")
    {
        return Level::Federal;
    }
    if lower.contains("state") || lower.contains("governor") {
        return Level::State;
    }
    if lower.contains("county") {
        return Level::County;
    }
    Level::Local
}

fn parse_level(raw: Option<&str>, title: &str) -> Level {
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| infer_level(title)),
        None => infer_level(title),
    }
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

/// Whole years between the start date and the end date (or today for a
/// sitting official).
fn years_in_office(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<i64> {
    let start = start?;
    let end = end.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let days = (end - start).num_days();
    if days < 0 {
        return None;
    }
    Some(days / 365)
}

/// Normalize a cursor-directory node.
pub fn from_directory(node: DirectoryNode) -> OfficeHolder {
    let position_name = node
        .position
        .as_ref()
        .and_then(|p| p.name.clone())
        .or_else(|| node.office_title.clone())
        .unwrap_or_default();

    let level = parse_level(
        node.position.as_ref().and_then(|p| p.level.as_deref()),
        &position_name,
    );

    let person = node.person.and_then(|p| {
        let full_name = p.full_name?;
        Some(Person {
            full_name,
            first_name: p.first_name,
            last_name: p.last_name,
            contacts: p
                .contacts
                .unwrap_or_default()
                .into_iter()
                .filter_map(|c| {
                    Some(Contact {
                        contact_type: c.contact_type,
                        value: c.value?,
                    })
                })
                .collect(),
            urls: p
                .urls
                .unwrap_or_default()
                .into_iter()
                .filter_map(|u| {
                    Some(Url {
                        url_type: u.url_type,
                        url: u.url?,
                    })
                })
                .collect(),
        })
    });

    let start_at = parse_date(node.start_at.as_deref());
    let end_at = parse_date(node.end_at.as_deref());

    OfficeHolder {
        id: node.id.unwrap_or_else(|| "directory-unknown".to_string()),
        is_current: node.is_current.unwrap_or(true),
        office_title: node.office_title,
        person,
        position: Position {
            name: position_name,
            level,
            description: node.position.as_ref().and_then(|p| p.description.clone()),
            state: node.position.as_ref().and_then(|p| p.state.clone()),
        },
        addresses: node
            .addresses
            .unwrap_or_default()
            .into_iter()
            .map(|a| Address {
                address_type: a.address_type,
                line1: a.line_1,
                city: a.city,
                state: a.state,
                zip: a.zip,
            })
            .collect(),
        parties: node
            .parties
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| Some(Party { name: p.name? }))
            .collect(),
        start_at,
        end_at,
        total_years_in_office: years_in_office(start_at, end_at),
    }
}

/// Normalize a state-roster record.
///
/// The roster nests the position under `office` and carries the governing
/// body under `organization`; the organization name lands in the position
/// description so the locality matcher can see it.
pub fn from_roster(raw: RawOfficial) -> OfficeHolder {
    let title = raw
        .office
        .as_ref()
        .and_then(|o| o.title.clone())
        .unwrap_or_default();

    let level = parse_level(raw.office.as_ref().and_then(|o| o.level.as_deref()), &title);

    let full_name = raw.name.clone().or_else(|| {
        match (raw.first_name.as_deref(), raw.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.to_string()),
            (None, Some(last)) => Some(last.to_string()),
            (None, None) => None,
        }
    });

    let person = full_name.map(|full_name| {
        let mut contacts: Vec<Contact> = Vec::new();
        for email in raw.email_addresses.clone().unwrap_or_default() {
            contacts.push(Contact {
                contact_type: Some("email".to_string()),
                value: email,
            });
        }
        for phone in raw.phone_numbers.clone().unwrap_or_default() {
            contacts.push(Contact {
                contact_type: Some("phone".to_string()),
                value: phone,
            });
        }
        Person {
            full_name,
            first_name: raw.first_name.clone(),
            last_name: raw.last_name.clone(),
            contacts,
            urls: raw
                .urls
                .clone()
                .unwrap_or_default()
                .into_iter()
                .map(|url| Url {
                    url_type: None,
                    url,
                })
                .collect(),
        }
    });

    let description = raw
        .organization
        .as_ref()
        .and_then(|o| o.name.clone())
        .or_else(|| raw.office.as_ref().and_then(|o| o.district.clone()));

    let start_at = parse_date(raw.start_date.as_deref());
    let end_at = parse_date(raw.end_date.as_deref());

    OfficeHolder {
        id: raw
            .id
            .map(|id| format!("roster-{}", id))
            .unwrap_or_else(|| "roster-unknown".to_string()),
        is_current: true,
        office_title: raw.office.as_ref().and_then(|o| o.title.clone()),
        person,
        position: Position {
            name: title,
            level,
            description,
            state: raw
                .addresses
                .as_ref()
                .and_then(|a| a.first())
                .and_then(|a| a.state.clone()),
        },
        addresses: raw
            .addresses
            .unwrap_or_default()
            .into_iter()
            .map(|a| Address {
                address_type: None,
                line1: a.address_1,
                city: a.city,
                state: a.state,
                zip: a.zip,
            })
            .collect(),
        parties: raw
            .party
            .into_iter()
            .map(|name| Party { name })
            .collect(),
        start_at,
        end_at,
        total_years_in_office: years_in_office(start_at, end_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider_state::{RawOffice, RawOrganization};

    fn bare_roster_official() -> RawOfficial {
        RawOfficial {
            id: Some(7),
            name: Some("Dana Whitfield".to_string()),
            first_name: None,
            last_name: None,
            office: None,
            organization: None,
            addresses: None,
            email_addresses: None,
            phone_numbers: None,
            urls: None,
            party: None,
            start_date: None,
            end_date: None,
        }
    }

    #[test]
    fn test_infer_level_keywords() {
        assert_eq!(infer_level("United States Senator"), Level::Federal);
        assert_eq!(infer_level("Member of Congress"), Level::Federal);
        assert_eq!(infer_level("Governor"), Level::State);
        assert_eq!(infer_level("State Treasurer"), Level::State);
        assert_eq!(infer_level("County Assessor"), Level::County);
        assert_eq!(infer_level("City Council Member"), Level::Local);
    }

    #[test]
    fn test_absent_collections_default_to_empty() {
        let holder = from_roster(bare_roster_official());
        assert!(holder.addresses.is_empty());
        assert!(holder.parties.is_empty());
        let person = holder.person.expect("named official has a person");
        assert!(person.contacts.is_empty());
        assert!(person.urls.is_empty());
    }

    #[test]
    fn test_roster_missing_name_is_vacant() {
        let mut raw = bare_roster_official();
        raw.name = None;
        let holder = from_roster(raw);
        assert!(holder.is_vacant());
    }

    #[test]
    fn test_roster_name_joined_from_parts() {
        let mut raw = bare_roster_official();
        raw.name = None;
        raw.first_name = Some("Ana".to_string());
        raw.last_name = Some("Reyes".to_string());
        let holder = from_roster(raw);
        assert_eq!(holder.person.unwrap().full_name, "Ana Reyes");
    }

    #[test]
    fn test_organization_name_lands_in_description() {
        let mut raw = bare_roster_official();
        raw.organization = Some(RawOrganization {
            name: Some("Marin County Board of Supervisors".to_string()),
        });
        let holder = from_roster(raw);
        assert_eq!(
            holder.position.description.as_deref(),
            Some("Marin County Board of Supervisors")
        );
    }

    #[test]
    fn test_roster_level_inferred_from_title() {
        let mut raw = bare_roster_official();
        raw.office = Some(RawOffice {
            title: Some("County Sheriff".to_string()),
            level: None,
            district: None,
        });
        let holder = from_roster(raw);
        assert_eq!(holder.position.level, Level::County);
    }

    #[test]
    fn test_years_in_office_from_term_dates() {
        let mut raw = bare_roster_official();
        raw.start_date = Some("2015-01-05".to_string());
        raw.end_date = Some("2023-01-02".to_string());
        let holder = from_roster(raw);
        assert_eq!(holder.total_years_in_office, Some(7));
    }
}
