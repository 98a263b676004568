//! Error taxonomy for the aggregation core.
//!
//! Every provider and geocoder failure is converted into a [`LookupError`] at
//! the adapter boundary; raw transport errors never cross into ranking or the
//! HTTP layer.

use thiserror::Error;

/// Failure modes of an official-lookup request.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Caller-supplied parameters are unusable. Always a 4xx, never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required credential is missing. Operator-fixable; surfaced before
    /// any network call is made.
    #[error("{0} credential is not configured")]
    NotConfigured(&'static str),

    /// Geocoding and the state-code fallback both failed to produce a state.
    #[error("could not resolve a state for the supplied location")]
    LocationUnresolved,

    /// An upstream directory returned a non-2xx status or a malformed
    /// payload. Pages already fetched are discarded.
    #[error("{provider} request failed{}: {message}", fmt_status(.status))]
    Provider {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// One provider failed while the other succeeded. The whole request
    /// fails; a silently short roster is never returned.
    #[error("{failed} failed while {succeeded} succeeded: {message}")]
    PartialProviderFailure {
        failed: &'static str,
        succeeded: &'static str,
        message: String,
    },
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(s) => format!(" ({})", s),
        None => String::new(),
    }
}

impl LookupError {
    pub fn provider(provider: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        LookupError::Provider {
            provider,
            status,
            message: message.into(),
        }
    }
}

pub type LookupResult<T> = Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_includes_status() {
        let err = LookupError::provider("directory", Some(503), "upstream down");
        assert_eq!(
            err.to_string(),
            "directory request failed (503): upstream down"
        );
    }

    #[test]
    fn test_provider_error_without_status() {
        let err = LookupError::provider("roster", None, "connection reset");
        assert_eq!(err.to_string(), "roster request failed: connection reset");
    }
}
