//! Request orchestration.
//!
//! Runs one official-lookup request end to end: validate input, fetch from
//! both providers concurrently, normalize, locality-filter the state-dump
//! results, then rank and bucket the merged set.
//!
//! # Partial failure policy
//!
//! When one provider fails with an upstream error while the other succeeds,
//! the whole request fails with [`LookupError::PartialProviderFailure`] — a
//! roster that is silently missing a provider's worth of officials is worse
//! than an explicit error. Caller-level failures (`InvalidInput`,
//! `LocationUnresolved`) and missing credentials (`NotConfigured`) propagate
//! unwrapped so their status codes survive.

use crate::config::Config;
use crate::error::{LookupError, LookupResult};
use crate::geocode::{self, LocationQuery};
use crate::locality;
use crate::models::{Level, LocationDescriptor, OfficeHolder, RankedGroup};
use crate::normalize;
use crate::provider_cursor::{self, FetchOptions, LocationFilter};
use crate::provider_state;
use crate::ranking;

/// One aggregation request's parameters.
#[derive(Debug, Clone)]
pub struct AggregateRequest {
    pub query: LocationQuery,
    pub current_only: bool,
    pub level: Option<Level>,
}

/// The ranked, level-bucketed result set for one request.
#[derive(Debug)]
pub struct AggregateResponse {
    pub location: LocationDescriptor,
    /// Flat list in display order (buckets concatenated federal → local).
    pub office_holders: Vec<OfficeHolder>,
    pub by_level: Vec<RankedGroup>,
    pub count: usize,
}

/// Run a full lookup: resolve, fetch, normalize, filter, rank.
pub async fn lookup_officials(
    config: &Config,
    request: &AggregateRequest,
) -> LookupResult<AggregateResponse> {
    request.query.validate()?;

    let filter = LocationFilter::from_query(&request.query).ok_or_else(|| {
        LookupError::InvalidInput("one of address, zip, or lat+lng is required".to_string())
    })?;

    let options = FetchOptions {
        current_only: request.current_only,
        ..Default::default()
    };

    let directory_fut = provider_cursor::fetch_by_location(&config.directory, &filter, &options);

    // The roster provider only filters by state, so its branch resolves the
    // location first and locality-filters after normalization.
    let roster_fut = async {
        let location = geocode::resolve(&config.geocoder, &request.query).await?;
        let raw = provider_state::fetch_by_state(&config.roster, &location.state).await?;
        let local: Vec<OfficeHolder> = raw
            .into_iter()
            .map(normalize::from_roster)
            .filter(|holder| locality::is_local_match(holder, &location))
            .collect();
        Ok::<_, LookupError>((location, local))
    };

    let (directory_result, roster_result) = tokio::join!(directory_fut, roster_fut);

    let (location, mut merged) = match (directory_result, roster_result) {
        (Ok(from_directory), Ok((location, from_roster))) => {
            let mut merged = from_directory;
            merged.extend(from_roster);
            (location, merged)
        }
        // Both failed: surface the directory's error.
        (Err(directory_err), Err(_)) => return Err(directory_err),
        (Err(directory_err), Ok(_)) => {
            return Err(wrap_partial("directory", "roster", directory_err))
        }
        (Ok(_), Err(roster_err)) => return Err(wrap_partial("roster", "directory", roster_err)),
    };

    // Keep only the seats the provider marked current when asked to.
    if request.current_only {
        merged.retain(|holder| holder.is_current);
    }

    Ok(assemble_response(location, merged, request.level))
}

/// Upstream errors become partial failures; caller- and operator-level
/// errors keep their identity.
fn wrap_partial(
    failed: &'static str,
    succeeded: &'static str,
    err: LookupError,
) -> LookupError {
    match err {
        LookupError::Provider { message, status, .. } => LookupError::PartialProviderFailure {
            failed,
            succeeded,
            message: match status {
                Some(s) => format!("({}) {}", s, message),
                None => message,
            },
        },
        other => other,
    }
}

/// Pure assembly step: rank, bucket, apply the optional level filter.
pub fn assemble_response(
    location: LocationDescriptor,
    merged: Vec<OfficeHolder>,
    level: Option<Level>,
) -> AggregateResponse {
    let mut by_level = ranking::rank_and_group(merged);

    if let Some(wanted) = level {
        for bucket in &mut by_level {
            if bucket.level != wanted {
                bucket.members.clear();
            }
        }
    }

    let office_holders: Vec<OfficeHolder> = by_level
        .iter()
        .flat_map(|bucket| bucket.members.iter().cloned())
        .collect();
    let count = office_holders.len();

    AggregateResponse {
        location,
        office_holders,
        by_level,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Person, Position};

    fn holder(name: &str, level: Level) -> OfficeHolder {
        OfficeHolder {
            id: format!("t-{}", name),
            is_current: true,
            office_title: None,
            person: Some(Person {
                full_name: "Someone".to_string(),
                first_name: None,
                last_name: None,
                contacts: vec![],
                urls: vec![],
            }),
            position: Position {
                name: name.to_string(),
                level,
                description: None,
                state: None,
            },
            addresses: vec![],
            parties: vec![],
            start_at: None,
            end_at: None,
            total_years_in_office: None,
        }
    }

    fn location() -> LocationDescriptor {
        LocationDescriptor {
            state: "CA".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_flat_list_follows_bucket_order() {
        let response = assemble_response(
            location(),
            vec![
                holder("Mayor", Level::City),
                holder("Governor", Level::State),
                holder("United States Senator", Level::Federal),
            ],
            None,
        );
        let names: Vec<&str> = response
            .office_holders
            .iter()
            .map(|h| h.position.name.as_str())
            .collect();
        assert_eq!(names, vec!["United States Senator", "Governor", "Mayor"]);
        assert_eq!(response.count, 3);
    }

    #[test]
    fn test_level_filter_empties_other_buckets() {
        let response = assemble_response(
            location(),
            vec![
                holder("Mayor", Level::City),
                holder("Governor", Level::State),
            ],
            Some(Level::City),
        );
        assert_eq!(response.count, 1);
        assert_eq!(response.office_holders[0].position.name, "Mayor");
        // All six buckets are still present.
        assert_eq!(response.by_level.len(), Level::ALL.len());
        let state = response
            .by_level
            .iter()
            .find(|g| g.level == Level::State)
            .unwrap();
        assert!(state.members.is_empty());
    }

    #[test]
    fn test_wrap_partial_preserves_caller_errors() {
        let err = wrap_partial("roster", "directory", LookupError::LocationUnresolved);
        assert!(matches!(err, LookupError::LocationUnresolved));

        let err = wrap_partial(
            "roster",
            "directory",
            LookupError::provider("roster", Some(500), "boom"),
        );
        assert!(matches!(err, LookupError::PartialProviderFailure { .. }));
    }
}
