pub use crate::config::*;
use crate::{assess_table, RankResolver, TableAssessment};

use std::collections::BTreeSet;

/// A builder for assembling one table's input before classification.
///
/// ```
/// pub use judge_pairing::builder::TableBuilder;
/// # use judge_pairing::PairingErrors;
///
/// let mut builder = TableBuilder::new().entry_count(18);
/// builder.add_judge("Anna", "Certified", &[])?;
/// builder.add_judge("Bob", "Non-BJCP", &[])?;
///
/// let assessment = builder.assess();
/// assert_eq!(assessment.pairs.len(), 1);
///
/// # Ok::<(), PairingErrors>(())
/// ```
pub struct TableBuilder {
    resolver: RankResolver,
    judges: Vec<Judge>,
    entry_count: u32,
    styles: BTreeSet<String>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> TableBuilder {
        TableBuilder {
            resolver: RankResolver::standard(),
            judges: Vec::new(),
            entry_count: 0,
            styles: BTreeSet::new(),
        }
    }

    pub fn entry_count(mut self, count: u32) -> TableBuilder {
        self.entry_count = count;
        self
    }

    /// Sets the substyle codes judged at this table.
    pub fn styles(mut self, codes: &[&str]) -> TableBuilder {
        self.styles = codes.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Adds a judge. Names must be unique within one table.
    pub fn add_judge(
        &mut self,
        name: &str,
        rank: &str,
        entered_styles: &[&str],
    ) -> Result<(), PairingErrors> {
        if self.judges.iter().any(|j| j.name == name) {
            return Err(PairingErrors::DuplicateJudge(name.to_string()));
        }
        self.judges.push(Judge {
            name: name.to_string(),
            rank: rank.to_string(),
            entered_styles: entered_styles.iter().map(|s| s.to_string()).collect(),
        });
        Ok(())
    }

    pub fn assess(&self) -> TableAssessment {
        assess_table(&self.resolver, &self.judges, self.entry_count, &self.styles)
    }
}
