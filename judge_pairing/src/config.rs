// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A judge assigned to one judging table.
///
/// The rank is kept as the free-text label from the roster; it is resolved
/// to a numeric weight by [crate::RankResolver].
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Judge {
    pub name: String,
    /// Free-text BJCP rank label, e.g. "Certified" or "Level 4: National".
    pub rank: String,
    /// Substyle codes this judge has entries in, e.g. "23A".
    pub entered_styles: Vec<String>,
}

// ******** Output data structures *********

/// Two judges jointly scoring a table's entries.
///
/// Invariant: the lead judge is certified-or-higher, unless the pair was
/// formed by the certified-with-certified fallback, in which case both are.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Pair {
    pub lead: Judge,
    pub partner: Judge,
    /// True for pairs formed by pairing leftover certified judges together.
    pub fallback: bool,
}

/// Workload rating for one table, as a step function of beers per pair.
///
/// The boundaries are fixed domain constants from competition judging-time
/// norms: 9, 12 and 15 are inclusive upper bounds of their band.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum WorkloadBand {
    Excellent,
    Acceptable,
    Overworked,
    Critical,
}

impl WorkloadBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadBand::Excellent => "EXCELLENT",
            WorkloadBand::Acceptable => "ACCEPTABLE",
            WorkloadBand::Overworked => "OVERWORKED",
            WorkloadBand::Critical => "CRITICAL",
        }
    }
}

/// A judge who has entries in one of the substyles judged at their table.
///
/// Such a judge must not remain assigned to that table. This is reported,
/// not enforced.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConflictRecord {
    pub judge: String,
    /// The exact substyle codes shared between the judge's entries and the
    /// table, in sorted order.
    pub overlap: Vec<String>,
}

/// A problem detected at one table that requires organizer action.
#[derive(PartialEq, Debug, Clone)]
pub enum Issue {
    /// No pairing is possible at all.
    NoCertifiedJudges,
    /// The band is Overworked or Critical.
    Workload { beers_per_pair: f64 },
    /// More non-certified judges than certified leads to pair them with.
    PairingImbalance {
        certified: usize,
        non_certified: usize,
    },
    /// Judges with entries in the styles judged at this table.
    EntryConflicts { judges: usize },
}

/// The full classification of one table: partition sizes, suggested pairs,
/// workload rating and conflict list.
#[derive(PartialEq, Debug, Clone)]
pub struct TableAssessment {
    pub certified: usize,
    pub non_certified: usize,
    /// Pairing cap: min(certified, total / 2), zero without certified judges.
    pub max_pairs: usize,
    pub pairs: Vec<Pair>,
    pub entry_count: u32,
    /// None when no pairing is possible; the band is Critical in that case.
    pub beers_per_pair: Option<f64>,
    pub band: WorkloadBand,
    pub conflicts: Vec<ConflictRecord>,
    pub issues: Vec<Issue>,
}

/// Errors raised when assembling a table's input.
///
/// The classifier itself never fails: every degenerate input resolves to a
/// defined classification.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PairingErrors {
    /// A judge name may appear only once at a given table.
    DuplicateJudge(String),
}

impl Error for PairingErrors {}

impl Display for PairingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingErrors::DuplicateJudge(name) => {
                write!(f, "duplicate judge at table: {}", name)
            }
        }
    }
}
