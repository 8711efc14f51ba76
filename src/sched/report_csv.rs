use log::debug;
use snafu::prelude::*;

use judge_pairing::{Pair, RankResolver};

use crate::sched::{CsvRecordSnafu, OpeningCsvSnafu, SchedResult, TableReport, WritingOutputSnafu};

const COLUMNS: [&str; 13] = [
    "Site",
    "Table",
    "Entries",
    "Pair #",
    "Judge 1 Name",
    "Judge 1 Rank",
    "Judge 2 Name",
    "Judge 2 Rank",
    "Beers per Pair",
    "Conflict?",
    "Issue",
    "Action Needed",
    "Notes",
];

fn pair_issues(resolver: &RankResolver, report: &TableReport, pair: &Pair) -> (String, String) {
    let a = &report.assessment;
    let mut issues: Vec<String> = Vec::new();
    let mut actions: Vec<String> = Vec::new();
    for judge in [&pair.lead, &pair.partner] {
        if let Some(c) = a.conflicts.iter().find(|c| c.judge == judge.name) {
            issues.push(format!("{} entered {}", c.judge, c.overlap.join(", ")));
            actions.push("REASSIGN JUDGE".to_string());
        }
    }
    match a.beers_per_pair {
        Some(bpp) if bpp > 15.0 => {
            issues.push(format!("{:.1} beers/pair", bpp));
            actions.push("ADD JUDGES".to_string());
        }
        Some(bpp) if bpp > 12.0 => {
            issues.push(format!("{:.1} beers/pair", bpp));
            actions.push("Consider adding judges".to_string());
        }
        _ => {}
    }
    if !resolver.is_certified(&pair.lead.rank) && !resolver.is_certified(&pair.partner.rank) {
        issues.push("No certified judge in pair".to_string());
        actions.push("REASSIGN JUDGE".to_string());
    }
    actions.sort();
    actions.dedup();
    (issues.join("; "), actions.join("; "))
}

/// Writes the pairing worksheet, one row per suggested pair, for manual
/// adjustment in a spreadsheet. Tables where no pairing is possible get a
/// single N/A row so they still show up.
pub fn write_worksheet(
    path: String,
    resolver: &RankResolver,
    reports: &[TableReport],
) -> SchedResult<()> {
    debug!("write_worksheet: writing {} tables to {}", reports.len(), path);
    let mut wtr = csv::Writer::from_path(path.clone()).context(OpeningCsvSnafu { path: path.clone() })?;
    wtr.write_record(COLUMNS)
        .context(CsvRecordSnafu { path: path.clone() })?;
    for report in reports.iter() {
        let a = &report.assessment;
        let site = format!("{} {}", report.key.date, report.key.site);
        let table = format!("T{}", report.key.table);
        let entries = a.entry_count.to_string();
        if a.pairs.is_empty() {
            let issue = if report.rows.is_empty() {
                "No judges assigned".to_string()
            } else {
                "No certified judges available".to_string()
            };
            wtr.write_record([
                site.as_str(),
                table.as_str(),
                entries.as_str(),
                "N/A",
                "",
                "",
                "",
                "",
                "N/A",
                "",
                issue.as_str(),
                "ADD JUDGES",
                "",
            ])
            .context(CsvRecordSnafu { path: path.clone() })?;
            continue;
        }
        // Workload in this sheet reflects the pairs actually suggested.
        let beers = format!("{:.1}", f64::from(a.entry_count) / a.pairs.len() as f64);
        for (n, pair) in a.pairs.iter().enumerate() {
            let conflicted = [&pair.lead, &pair.partner]
                .iter()
                .any(|j| a.conflicts.iter().any(|c| c.judge == j.name));
            let (issue, action) = pair_issues(resolver, report, pair);
            let notes = if pair.fallback {
                "Both certified"
            } else {
                ""
            };
            wtr.write_record([
                site.as_str(),
                table.as_str(),
                entries.as_str(),
                (n + 1).to_string().as_str(),
                pair.lead.name.as_str(),
                pair.lead.rank.as_str(),
                pair.partner.name.as_str(),
                pair.partner.rank.as_str(),
                beers.as_str(),
                if conflicted { "YES" } else { "" },
                issue.as_str(),
                action.as_str(),
                notes,
            ])
            .context(CsvRecordSnafu { path: path.clone() })?;
        }
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    Ok(())
}
