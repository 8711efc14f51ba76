use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::debug;

use crate::{ConflictRecord, Judge, RankResolver};

/// At most this many replacement candidates are surfaced per table.
pub const MAX_CANDIDATES: usize = 10;

/// Candidates beyond this driving distance (miles) are not considered.
/// The bound is strict on both sides: a zero distance means the lookup
/// table had no usable value for that site.
pub const MAX_TRAVEL_MILES: u32 = 100;

/// A judge from the master roster, considered as a possible replacement or
/// addition for an understaffed or conflicted table.
///
/// Distances are precomputed externally (geocoding) and supplied as a flat
/// per-site lookup; this module treats them as static input data.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RosterJudge {
    pub name: String,
    pub rank: String,
    pub entered_styles: Vec<String>,
    pub active: bool,
    /// Site name (uppercase) to driving distance in miles.
    pub distances: BTreeMap<String, u32>,
}

/// A roster judge suitable for a given table, with the distance to its site.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReplacementCandidate {
    pub name: String,
    pub rank: String,
    pub certified: bool,
    pub distance: u32,
}

/// Finds roster judges who could step in at one table.
///
/// A candidate must be active, not already assigned anywhere on the same
/// date (`unavailable` holds those names), have no substyle conflict with
/// the table, and live strictly between 0 and [MAX_TRAVEL_MILES] miles from
/// the site. Candidates are ranked by ascending distance only, not by rank;
/// ties break on name so the order is deterministic. At most
/// [MAX_CANDIDATES] are returned.
pub fn suggest_replacements(
    resolver: &RankResolver,
    roster: &[RosterJudge],
    site: &str,
    table_styles: &BTreeSet<String>,
    unavailable: &HashSet<String>,
) -> Vec<ReplacementCandidate> {
    let mut candidates: Vec<ReplacementCandidate> = Vec::new();
    for rj in roster.iter() {
        if !rj.active || unavailable.contains(&rj.name) {
            continue;
        }
        let probe = Judge {
            name: rj.name.clone(),
            rank: rj.rank.clone(),
            entered_styles: rj.entered_styles.clone(),
        };
        let conflicts: Vec<ConflictRecord> =
            crate::find_conflicts(std::slice::from_ref(&probe), table_styles);
        if !conflicts.is_empty() {
            continue;
        }
        let distance = match rj.distances.get(site) {
            Some(&d) if d > 0 && d < MAX_TRAVEL_MILES => d,
            _ => continue,
        };
        candidates.push(ReplacementCandidate {
            name: rj.name.clone(),
            rank: rj.rank.clone(),
            certified: resolver.is_certified(&rj.rank),
            distance,
        });
    }
    candidates.sort_by(|a, b| (a.distance, &a.name).cmp(&(b.distance, &b.name)));
    candidates.truncate(MAX_CANDIDATES);
    debug!(
        "suggest_replacements: {} candidates for site {}",
        candidates.len(),
        site
    );
    candidates
}
