use anyhow::Result;

use crate::config::Config;

/// Print each upstream provider and whether its credential is present.
pub fn list_providers(config: &Config) -> Result<()> {
    let rows = [
        (
            "geocoder",
            config.geocoder.credential().is_some(),
            "resolves addresses to state/county/city (optional, has fallback)",
        ),
        (
            "directory",
            config.directory.credential().is_some(),
            "cursor-paginated directory with precise location filtering",
        ),
        (
            "roster",
            config.roster.credential().is_some(),
            "state-wide official dump, locality-matched locally",
        ),
    ];

    println!("{:<12} {:<16} DESCRIPTION", "PROVIDER", "STATUS");
    for (name, configured, description) in rows {
        let status = if configured {
            "CONFIGURED"
        } else {
            "NOT CONFIGURED"
        };
        println!("{:<12} {:<16} {}", name, status, description);
    }

    Ok(())
}
