//! Classification and ranking engine.
//!
//! Position titles arrive as free text with no controlled vocabulary, so
//! display order is driven by two hand-maintained, first-match-wins rule
//! tables:
//!
//! - [`priority`] maps a title to a numeric display rank (lower sorts first),
//! - [`group`] maps a title to a label that clusters near-duplicate offices
//!   ("City Council Member Ward 1" and "Ward 2" both land in "City Council").
//!
//! The unmatched default (priority 100, group = the raw title) is a
//! permanent, expected bucket — new title patterns keep appearing in the
//! source data and unmatched ones simply sort last.
//!
//! Within a level the sort is total and deterministic: priority ascending,
//! then group label, then the full position name (so "Ward 1" precedes
//! "Ward 2").

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Level, OfficeHolder, RankedGroup};

struct PriorityRule {
    /// Matches when any of these substrings appears in the lowercased title.
    any: &'static [&'static str],
    /// ...and none of these do.
    none: &'static [&'static str],
    priority: u32,
}

const DEFAULT_PRIORITY: u32 = 100;

/// Ordered rule table, evaluated top to bottom. Order matters: the bare
/// "governor" rule must exclude "lieutenant" so the lieutenant rule below it
/// can fire.
const PRIORITY_RULES: &[PriorityRule] = &[
    PriorityRule { any: &["governor"], none: &["lieutenant"], priority: 1 },
    PriorityRule { any: &["lieutenant governor"], none: &[], priority: 2 },
    PriorityRule { any: &["mayor"], none: &["pro tem", "vice"], priority: 3 },
    PriorityRule { any: &["mayor pro tem", "vice mayor"], none: &[], priority: 4 },
    // Long-form federal titles contain the substring "state" ("United
    // States Senator"), so they need their own rules ahead of the generic
    // ones with the "state" exclusion.
    PriorityRule { any: &["united states senator", "u.s. senator"], none: &[], priority: 5 },
    PriorityRule { any: &["senator"], none: &["state"], priority: 5 },
    PriorityRule { any: &["united states representative", "u.s. representative"], none: &[], priority: 6 },
    PriorityRule { any: &["congress", "representative"], none: &["state"], priority: 6 },
    PriorityRule { any: &["attorney general"], none: &[], priority: 10 },
    PriorityRule { any: &["secretary of state"], none: &[], priority: 11 },
    PriorityRule { any: &["treasurer"], none: &["city"], priority: 12 },
    PriorityRule { any: &["controller", "comptroller"], none: &[], priority: 13 },
    PriorityRule { any: &["state senator", "state senate"], none: &[], priority: 20 },
    PriorityRule { any: &["state representative", "assembly"], none: &[], priority: 21 },
    PriorityRule { any: &["supervisor"], none: &[], priority: 30 },
    PriorityRule { any: &["sheriff"], none: &[], priority: 31 },
    PriorityRule { any: &["district attorney"], none: &[], priority: 32 },
    PriorityRule { any: &["county clerk", "assessor", "auditor", "recorder"], none: &[], priority: 33 },
    PriorityRule { any: &["city council", "council member", "councilmember"], none: &[], priority: 40 },
    PriorityRule { any: &["city clerk"], none: &[], priority: 41 },
    PriorityRule { any: &["city treasurer"], none: &[], priority: 42 },
    PriorityRule { any: &["city attorney"], none: &[], priority: 43 },
    PriorityRule { any: &["school board", "board of education", "trustee"], none: &[], priority: 60 },
    PriorityRule { any: &["water"], none: &[], priority: 61 },
    PriorityRule { any: &["community college"], none: &[], priority: 62 },
];

/// Display priority for a position title. Lower sorts first; unmatched
/// titles get [`DEFAULT_PRIORITY`] and sort last.
pub fn priority(position_name: &str) -> u32 {
    let lower = position_name.to_lowercase();
    for rule in PRIORITY_RULES {
        let hit = rule.any.iter().any(|pattern| lower.contains(pattern));
        let blocked = rule.none.iter().any(|pattern| lower.contains(pattern));
        if hit && !blocked {
            return rule.priority;
        }
    }
    DEFAULT_PRIORITY
}

/// Pulls the proper name of a specific district out of a board title, so
/// "Trustee, Oak Grove School District" and "Trustee, Pine Valley School
/// District" stay in separate groups.
static DISTRICT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)([a-z][a-z'.\- ]*?(?:unified school district|school district|elementary school district|high school district|community college district|water district|unified))\b",
    )
    .expect("district regex")
});

struct GroupRule {
    any: &'static [&'static str],
    label: &'static str,
}

const GROUP_RULES: &[GroupRule] = &[
    GroupRule { any: &["city council", "council member", "councilmember"], label: "City Council" },
    GroupRule { any: &["board of supervisors", "supervisor"], label: "Board of Supervisors" },
    GroupRule { any: &["school board", "board of education"], label: "School Board" },
    GroupRule { any: &["state senator", "state senate"], label: "State Senate" },
    GroupRule { any: &["state representative", "assembly"], label: "State Assembly" },
    GroupRule { any: &["mayor"], label: "Mayor" },
    GroupRule { any: &["sheriff"], label: "Sheriff" },
];

/// Grouping key for a position title: the extracted district name when the
/// title names a specific district, a normalized label when a rule matches,
/// otherwise the raw title as its own group.
pub fn group(position_name: &str) -> String {
    if let Some(captures) = DISTRICT_RE.captures(position_name) {
        return captures[1].trim().to_string();
    }

    let lower = position_name.to_lowercase();
    for rule in GROUP_RULES {
        if rule.any.iter().any(|pattern| lower.contains(pattern)) {
            return rule.label.to_string();
        }
    }

    position_name.to_string()
}

/// Rank officeholders and bucket them by level.
///
/// Vacant seats are dropped first. Every [`Level`] gets a bucket, empty ones
/// included, in display order federal → local. The output is deterministic
/// for any permutation of the input.
pub fn rank_and_group(office_holders: Vec<OfficeHolder>) -> Vec<RankedGroup> {
    let mut buckets: Vec<RankedGroup> = Level::ALL
        .iter()
        .map(|&level| RankedGroup {
            level,
            members: Vec::new(),
        })
        .collect();

    for holder in office_holders {
        if holder.is_vacant() {
            continue;
        }
        let index = Level::ALL
            .iter()
            .position(|&l| l == holder.position.level)
            .unwrap_or(Level::ALL.len() - 1);
        buckets[index].members.push(holder);
    }

    for bucket in &mut buckets {
        bucket.members.sort_by_cached_key(|holder| {
            (
                priority(&holder.position.name),
                group(&holder.position.name),
                holder.position.name.clone(),
            )
        });
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, Position};

    fn holder(name: &str, level: Level) -> OfficeHolder {
        OfficeHolder {
            id: format!("t-{}", name),
            is_current: true,
            office_title: Some(name.to_string()),
            person: Some(crate::models::Person {
                full_name: "Test Person".to_string(),
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

    fn names(group: &RankedGroup) -> Vec<&str> {
        group
            .members
            .iter()
            .map(|m| m.position.name.as_str())
            .collect()
    }

    #[test]
    fn test_governor_outranks_lieutenant() {
        assert!(priority("Governor") < priority("Lieutenant Governor"));
    }

    #[test]
    fn test_mayor_outranks_pro_tem() {
        assert!(priority("Mayor") < priority("Mayor Pro Tem"));
    }

    #[test]
    fn test_pinned_priorities() {
        assert_eq!(priority("Governor"), 1);
        assert_eq!(priority("Lieutenant Governor"), 2);
        assert_eq!(priority("Mayor"), 3);
        assert_eq!(priority("County Sheriff"), 31);
        assert_eq!(priority("City Council Member Ward 3"), 40);
        assert_eq!(priority("School Board Trustee"), 60);
        assert_eq!(priority("Chief Esoteric Officer"), DEFAULT_PRIORITY);
    }

    #[test]
    fn test_council_wards_share_a_group() {
        assert_eq!(group("City Council Member Ward 1"), "City Council");
        assert_eq!(group("City Council Member Ward 2"), "City Council");
    }

    #[test]
    fn test_distinct_districts_stay_apart() {
        assert_eq!(
            group("Trustee, Oak Grove School District"),
            "Oak Grove School District"
        );
        assert_eq!(
            group("Trustee, Pine Valley School District"),
            "Pine Valley School District"
        );
    }

    #[test]
    fn test_unmatched_title_groups_as_itself() {
        assert_eq!(group("Harbor Commissioner Seat 4"), "Harbor Commissioner Seat 4");
    }

    #[test]
    fn test_council_sorts_after_mayor_and_clusters() {
        let groups = rank_and_group(vec![
            holder("City Council Member Ward 2", Level::City),
            holder("Mayor", Level::City),
            holder("City Council Member Ward 1", Level::City),
        ]);
        let city = groups.iter().find(|g| g.level == Level::City).unwrap();
        assert_eq!(
            names(city),
            vec![
                "Mayor",
                "City Council Member Ward 1",
                "City Council Member Ward 2"
            ]
        );
    }

    #[test]
    fn test_ordering_is_stable_under_permutation() {
        let build = |order: &[&str]| {
            let holders = order
                .iter()
                .map(|name| holder(name, Level::Local))
                .collect();
            let groups = rank_and_group(holders);
            groups
                .into_iter()
                .find(|g| g.level == Level::Local)
                .unwrap()
                .members
                .iter()
                .map(|m| m.position.name.clone())
                .collect::<Vec<_>>()
        };

        let titles = [
            "School Board Trustee Seat 2",
            "Harbor Commissioner",
            "City Council Member Ward 1",
            "School Board Trustee Seat 1",
            "Mayor Pro Tem",
        ];
        let mut shuffled = titles;
        shuffled.reverse();
        assert_eq!(build(&titles), build(&shuffled));
    }

    #[test]
    fn test_vacant_seats_never_ranked() {
        let mut vacant = holder("Governor", Level::State);
        vacant.person = None;
        let groups = rank_and_group(vec![vacant, holder("State Treasurer", Level::State)]);
        let state = groups.iter().find(|g| g.level == Level::State).unwrap();
        assert_eq!(names(state), vec!["State Treasurer"]);
    }

    #[test]
    fn test_every_level_bucket_is_present() {
        let groups = rank_and_group(vec![holder("Mayor", Level::City)]);
        assert_eq!(groups.len(), Level::ALL.len());
        let federal = groups.iter().find(|g| g.level == Level::Federal).unwrap();
        assert!(federal.members.is_empty());
    }

    #[test]
    fn test_seat_numbers_break_ties_lexicographically() {
        let groups = rank_and_group(vec![
            holder("Water Board Seat 2", Level::Local),
            holder("Water Board Seat 1", Level::Local),
        ]);
        let local = groups.iter().find(|g| g.level == Level::Local).unwrap();
        assert_eq!(names(local), vec!["Water Board Seat 1", "Water Board Seat 2"]);
    }
}
