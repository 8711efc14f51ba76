mod config;
pub mod builder;
pub mod manual;
mod replacement;

use log::debug;

use std::cmp::Reverse;
use std::collections::BTreeSet;

pub use crate::config::*;
pub use crate::replacement::*;

/// A judge is certified-or-higher iff their rank weight is at least this.
/// Policy constant, not derived.
pub const CERTIFIED_MIN_WEIGHT: u32 = 3;

/// Inclusive upper bound of the Acceptable workload band, in beers per pair.
pub const ACCEPTABLE_MAX_BEERS: u32 = 12;

// The known rank labels. Two families occur in the wild: the roster labels
// ("Certified, Professional Brewer") and the normalized display labels
// ("Level 3: Certified"). Both resolve here.
const RANK_TABLE: &[(&str, u32)] = &[
    ("Non-BJCP", 0),
    ("Non-BJCP, Judge with Sensory Training", 0),
    ("Non-BJCP, Certified Cicerone", 0),
    ("Level 0: Non-BJCP", 0),
    ("Provisional, Judge with Sensory Training", 1),
    ("Level 1: Rank Pending", 1),
    ("Level 1: Provisional", 1),
    ("Rank Pending", 2),
    ("Recognized", 2),
    ("Recognized, Judge with Sensory Training", 2),
    ("Level 2: Recognized", 2),
    ("certified", 3),
    ("Certified", 3),
    ("CERTIFIED", 3),
    ("Certified+ Mead", 3),
    ("Certified+Mead", 3),
    ("Certified+Mead+cider", 3),
    ("Certified, Judge with Sensory Training", 3),
    ("Certified, Professional Brewer", 3),
    ("Level 3: Certified", 3),
    ("national", 4),
    ("National", 4),
    ("National, Advanced Cicerone", 4),
    ("Level 4: National", 4),
];

/// Resolves free-text rank labels to integer weights in 0..=4.
///
/// Unrecognized labels resolve to weight 0: an unknown label is treated as
/// the lowest rank rather than raising an error.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankResolver {
    table: Vec<(String, u32)>,
}

impl RankResolver {
    /// The standard BJCP label table.
    pub fn standard() -> RankResolver {
        RankResolver {
            table: RANK_TABLE
                .iter()
                .map(|(label, w)| (label.to_string(), *w))
                .collect(),
        }
    }

    pub fn weight(&self, label: &str) -> u32 {
        let label = label.trim();
        self.table
            .iter()
            .find(|(known, _)| known == label)
            .map(|(_, w)| *w)
            .unwrap_or(0)
    }

    pub fn is_certified(&self, label: &str) -> bool {
        self.weight(label) >= CERTIFIED_MIN_WEIGHT
    }
}

/// Suggests pairs for the judges at one table.
///
/// Judges are partitioned into certified and non-certified, each side is
/// sorted by descending rank weight (stable: ties keep roster order), and
/// the two sorted lists are zipped index-wise. This is a heuristic to pair
/// the most experienced judges together first; there is no claim of global
/// optimality. When certified judges remain and the pairing cap has not
/// been reached, they are paired with each other two at a time.
///
/// An empty result signals that no valid pairing is possible (zero
/// certified judges).
pub fn suggest_pairs(resolver: &RankResolver, judges: &[Judge]) -> Vec<Pair> {
    let mut certified: Vec<&Judge> = judges
        .iter()
        .filter(|j| resolver.is_certified(&j.rank))
        .collect();
    let mut non_certified: Vec<&Judge> = judges
        .iter()
        .filter(|j| !resolver.is_certified(&j.rank))
        .collect();
    certified.sort_by_key(|j| Reverse(resolver.weight(&j.rank)));
    non_certified.sort_by_key(|j| Reverse(resolver.weight(&j.rank)));

    let max_pairs = max_pairs(resolver, judges);
    debug!(
        "suggest_pairs: {} certified, {} non-certified, cap {}",
        certified.len(),
        non_certified.len(),
        max_pairs
    );

    let mut pairs: Vec<Pair> = Vec::new();
    let zipped = certified.len().min(non_certified.len()).min(max_pairs);
    for i in 0..zipped {
        pairs.push(Pair {
            lead: certified[i].clone(),
            partner: non_certified[i].clone(),
            fallback: false,
        });
    }

    // Leftover certified judges pair with each other, as a fallback only.
    for chunk in certified[zipped..].chunks_exact(2) {
        if pairs.len() >= max_pairs {
            break;
        }
        pairs.push(Pair {
            lead: chunk[0].clone(),
            partner: chunk[1].clone(),
            fallback: true,
        });
    }
    pairs
}

/// The pairing cap for one table: `min(certified, total / 2)`, capped by
/// both the certified-judge supply and the physical headcount. Zero when
/// there are no certified judges.
pub fn max_pairs(resolver: &RankResolver, judges: &[Judge]) -> usize {
    let certified = judges
        .iter()
        .filter(|j| resolver.is_certified(&j.rank))
        .count();
    if certified == 0 {
        0
    } else {
        certified.min(judges.len() / 2)
    }
}

/// Rates the workload of one table.
///
/// `max_pairs == 0` is a distinct Critical case with no beers-per-pair
/// figure, regardless of the entry count. The band boundaries 9, 12 and 15
/// are inclusive upper bounds.
pub fn classify_workload(entry_count: u32, max_pairs: usize) -> (Option<f64>, WorkloadBand) {
    if max_pairs == 0 {
        return (None, WorkloadBand::Critical);
    }
    let beers_per_pair = entry_count as f64 / max_pairs as f64;
    let band = if beers_per_pair <= 9.0 {
        WorkloadBand::Excellent
    } else if beers_per_pair <= 12.0 {
        WorkloadBand::Acceptable
    } else if beers_per_pair <= 15.0 {
        WorkloadBand::Overworked
    } else {
        WorkloadBand::Critical
    };
    (Some(beers_per_pair), band)
}

/// Finds the judges whose entered substyles intersect the table's judged
/// substyles. Codes must match exactly as strings; there is no fuzzy
/// matching. The overlap is reported in sorted order.
pub fn find_conflicts(judges: &[Judge], table_styles: &BTreeSet<String>) -> Vec<ConflictRecord> {
    let mut res: Vec<ConflictRecord> = Vec::new();
    for j in judges.iter() {
        let overlap: Vec<String> = j
            .entered_styles
            .iter()
            .filter(|s| table_styles.contains(*s))
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        if !overlap.is_empty() {
            res.push(ConflictRecord {
                judge: j.name.clone(),
                overlap,
            });
        }
    }
    res
}

/// How many more certified judges a table needs to bring the workload down
/// to the acceptable band.
pub fn certified_shortfall(entry_count: u32, certified: usize) -> usize {
    let pairs_needed = entry_count.div_ceil(ACCEPTABLE_MAX_BEERS) as usize;
    pairs_needed.saturating_sub(certified)
}

/// Runs the full classifier for one table: certified partition, suggested
/// pairs, workload rating, conflict list and derived issues.
///
/// All degenerate inputs (empty judge list, zero entries, no certified
/// judges) resolve to a defined classification. This function never fails.
pub fn assess_table(
    resolver: &RankResolver,
    judges: &[Judge],
    entry_count: u32,
    table_styles: &BTreeSet<String>,
) -> TableAssessment {
    let certified = judges
        .iter()
        .filter(|j| resolver.is_certified(&j.rank))
        .count();
    let non_certified = judges.len() - certified;

    let max_pairs = max_pairs(resolver, judges);
    let pairs = suggest_pairs(resolver, judges);
    let (beers_per_pair, band) = classify_workload(entry_count, max_pairs);
    let conflicts = find_conflicts(judges, table_styles);

    let mut issues: Vec<Issue> = Vec::new();
    if certified == 0 {
        issues.push(Issue::NoCertifiedJudges);
    }
    if let Some(bpp) = beers_per_pair {
        if matches!(band, WorkloadBand::Overworked | WorkloadBand::Critical) {
            issues.push(Issue::Workload {
                beers_per_pair: bpp,
            });
        }
    }
    if certified > 0 && non_certified > certified {
        issues.push(Issue::PairingImbalance {
            certified,
            non_certified,
        });
    }
    if !conflicts.is_empty() {
        issues.push(Issue::EntryConflicts {
            judges: conflicts.len(),
        });
    }

    debug!(
        "assess_table: {} judges, {} entries -> {:?}, {} pairs, {} conflicts",
        judges.len(),
        entry_count,
        band,
        pairs.len(),
        conflicts.len()
    );

    TableAssessment {
        certified,
        non_certified,
        max_pairs,
        pairs,
        entry_count,
        beers_per_pair,
        band,
        conflicts,
        issues,
    }
}
