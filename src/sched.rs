use log::{debug, info, warn};

use judge_pairing::*;
use snafu::{prelude::*, Snafu};

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Display;
use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod io_assignments;
pub mod io_common;
pub mod io_roster;
pub mod io_tables;
pub mod report_csv;
pub mod report_html;

#[derive(Debug, Snafu)]
pub enum SchedError {
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading a record from {path}"))]
    CsvRecord { source: csv::Error, path: String },
    #[snafu(display("Missing column {column} in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing output file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SchedResult<T> = Result<T, SchedError>;

/// Composite key for one judging table: date, site and table number.
/// The ordering gives the schedule its display order.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct TableKey {
    /// Two-digit month/day, e.g. "02/06".
    pub date: String,
    /// Site name, uppercase, e.g. "ARLINGTON".
    pub site: String,
    pub table: u32,
}

impl Display for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} T{}", self.date, self.site, self.table)
    }
}

/// The typed result of parsing a free-text desired-table field.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedTable {
    pub key: TableKey,
    /// The optional AM/PM token, when present.
    pub session: Option<String>,
}

/// Parses a desired-table string such as "02/06 Arlington T68 American
/// Pale Ale" or "02/07 AM Dallas T55 Kolsch" into a typed record.
///
/// The pattern is fixed: two-digit month/day, an optional AM/PM token, one
/// site word, then `T` followed by digits. Anything after the table token
/// is a style description and is ignored. Returns None for anything else;
/// callers route unparseable rows to a reported-skip list.
pub fn parse_desired_table(raw: &str) -> Option<ParsedTable> {
    let mut tokens = raw.split_whitespace();
    let date = tokens.next()?;
    if !is_month_day(date) {
        return None;
    }
    let mut next = tokens.next()?;
    let mut session: Option<String> = None;
    if next.eq_ignore_ascii_case("AM") || next.eq_ignore_ascii_case("PM") {
        session = Some(next.to_ascii_uppercase());
        next = tokens.next()?;
    }
    let site = next;
    let table_token = tokens.next()?;
    let digits = table_token.strip_prefix('T')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let table: u32 = digits.parse().ok()?;
    Some(ParsedTable {
        key: TableKey {
            date: date.to_string(),
            site: site.to_ascii_uppercase(),
            table,
        },
        session,
    })
}

fn is_month_day(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 5
        && b[2] == b'/'
        && [0usize, 1, 3, 4].iter().all(|&i| b[i].is_ascii_digit())
}

/// One judge-to-table assignment, as parsed from the assignment sheet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AssignmentRow {
    pub name: String,
    pub key: TableKey,
    pub session: Option<String>,
    /// Free-text pairing number from the sheet, possibly empty.
    pub pairing: String,
    pub rank: String,
    pub substyles: Vec<String>,
}

/// A row of the assignment sheet that could not be scheduled. These are
/// reported rather than silently dropped.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SkippedRow {
    pub lineno: usize,
    pub reason: String,
}

/// Everything known about one table after classification.
#[derive(PartialEq, Debug, Clone)]
pub struct TableReport {
    pub key: TableKey,
    pub session: Option<String>,
    pub category: Option<String>,
    pub styles: BTreeSet<String>,
    pub rows: Vec<AssignmentRow>,
    pub assessment: TableAssessment,
    pub candidates: Vec<ReplacementCandidate>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunStats {
    pub tables: usize,
    pub assignments: usize,
    pub skipped: usize,
    pub tables_with_issues: usize,
}

/// A human-readable label for an issue, shared by the summary, the HTML
/// schedule and the worksheet.
pub fn issue_label(issue: &Issue) -> String {
    match issue {
        Issue::NoCertifiedJudges => "No certified judges available".to_string(),
        Issue::Workload { beers_per_pair } => {
            format!("Workload: {:.1} beers/pair", beers_per_pair)
        }
        Issue::PairingImbalance {
            certified,
            non_certified,
        } => format!(
            "Pairing imbalance: {}C vs {}NC",
            certified, non_certified
        ),
        Issue::EntryConflicts { judges } => format!("{} entry conflicts", judges),
    }
}

fn group_assignments(rows: Vec<AssignmentRow>) -> BTreeMap<TableKey, Vec<AssignmentRow>> {
    let mut grouped: BTreeMap<TableKey, Vec<AssignmentRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.key.clone()).or_default().push(row);
    }
    grouped
}

/// A table gets replacement candidates when a judge must be swapped out
/// (conflict), when no pairing is possible, or when the load on each pair
/// is above the excellent band.
fn needs_candidates(assessment: &TableAssessment) -> bool {
    if !assessment.conflicts.is_empty() {
        return true;
    }
    match assessment.beers_per_pair {
        None => true,
        Some(bpp) => bpp > 9.0,
    }
}

fn build_reports(
    resolver: &RankResolver,
    rows: Vec<AssignmentRow>,
    styles: &BTreeMap<u32, io_tables::TableStyles>,
    counts: &BTreeMap<u32, u32>,
    roster: Option<&Vec<RosterJudge>>,
) -> Vec<TableReport> {
    // Judges already assigned anywhere on a date are not replacement
    // candidates on that date.
    let mut busy_by_date: HashMap<String, HashSet<String>> = HashMap::new();
    for row in rows.iter() {
        busy_by_date
            .entry(row.key.date.clone())
            .or_default()
            .insert(row.name.clone());
    }

    let grouped = group_assignments(rows);
    let mut reports: Vec<TableReport> = Vec::new();
    for (key, rows_at) in grouped {
        let judges: Vec<Judge> = rows_at
            .iter()
            .map(|r| Judge {
                name: r.name.clone(),
                rank: r.rank.clone(),
                entered_styles: r.substyles.clone(),
            })
            .collect();
        let table_styles = styles.get(&key.table);
        let style_set: BTreeSet<String> = table_styles
            .map(|t| t.styles.clone())
            .unwrap_or_default();
        // A table with no entry-count record defaults to zero entries.
        let entry_count = counts.get(&key.table).copied().unwrap_or(0);

        let assessment = assess_table(resolver, &judges, entry_count, &style_set);
        debug!("table {}: {:?}", key, assessment.band);

        let candidates = match roster {
            Some(roster) if needs_candidates(&assessment) => {
                let empty = HashSet::new();
                let busy = busy_by_date.get(&key.date).unwrap_or(&empty);
                suggest_replacements(resolver, roster, &key.site, &style_set, busy)
            }
            _ => Vec::new(),
        };

        reports.push(TableReport {
            session: rows_at.iter().find_map(|r| r.session.clone()),
            category: table_styles.and_then(|t| t.category.clone()),
            styles: style_set,
            rows: rows_at,
            assessment,
            candidates,
            key,
        });
    }
    reports
}

fn table_to_js(report: &TableReport) -> JSValue {
    let a = &report.assessment;
    let pairs: Vec<JSValue> = a
        .pairs
        .iter()
        .map(|p| {
            json!({
                "lead": p.lead.name,
                "partner": p.partner.name,
                "fallback": p.fallback,
            })
        })
        .collect();
    let conflicts: Vec<JSValue> = a
        .conflicts
        .iter()
        .map(|c| json!({"judge": c.judge, "styles": c.overlap}))
        .collect();
    let issues: Vec<JSValue> = a.issues.iter().map(|i| json!(issue_label(i))).collect();
    let candidates: Vec<JSValue> = report
        .candidates
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "rank": c.rank,
                "certified": c.certified,
                "distanceMiles": c.distance,
            })
        })
        .collect();
    json!({
        "date": report.key.date,
        "site": report.key.site,
        "table": format!("T{}", report.key.table),
        "session": report.session,
        "category": report.category,
        "entries": a.entry_count,
        "judges": report.rows.len(),
        "certified": a.certified,
        "nonCertified": a.non_certified,
        "maxPairs": a.max_pairs,
        "pairs": pairs,
        "beersPerPair": a.beers_per_pair.map(|b| format!("{:.1}", b)),
        "certifiedShortfall": certified_shortfall(a.entry_count, a.certified),
        "band": a.band.as_str(),
        "conflicts": conflicts,
        "issues": issues,
        "candidates": candidates,
    })
}

fn build_summary_js(reports: &[TableReport], skipped: &[SkippedRow]) -> JSValue {
    let tables: Vec<JSValue> = reports.iter().map(table_to_js).collect();
    let critical = reports
        .iter()
        .filter(|r| r.assessment.band == WorkloadBand::Critical)
        .count();
    let overworked = reports
        .iter()
        .filter(|r| r.assessment.band == WorkloadBand::Overworked)
        .count();
    let with_conflicts = reports
        .iter()
        .filter(|r| !r.assessment.conflicts.is_empty())
        .count();
    json!({
        "tables": tables,
        "totals": {
            "tables": reports.len(),
            "assignments": reports.iter().map(|r| r.rows.len()).sum::<usize>(),
            "skippedRows": skipped.len(),
            "critical": critical,
            "overworked": overworked,
            "withConflicts": with_conflicts,
        }
    })
}

fn read_reference(path: String) -> SchedResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Runs the full batch: load the input tables, classify every judging
/// table, write the requested outputs and optionally compare the summary
/// against a reference file.
pub fn run_schedule(args: &Args) -> SchedResult<RunStats> {
    let resolver = RankResolver::standard();

    let (rows, skipped) = io_assignments::read_assignments(args.assignments.clone())?;
    info!(
        "Loaded {} judge assignments ({} rows skipped)",
        rows.len(),
        skipped.len()
    );
    for s in skipped.iter() {
        warn!("skipped assignment row {}: {}", s.lineno, s.reason);
    }

    let styles = io_tables::read_styles(args.styles.clone())?;
    info!("Loaded {} table style mappings", styles.len());

    let counts = match args.counts.clone() {
        Some(path) => io_tables::read_entry_counts(path)?,
        None => BTreeMap::new(),
    };
    info!("Loaded entry counts for {} tables", counts.len());

    let roster = match args.roster.clone() {
        Some(path) => {
            let r = io_roster::read_roster(path)?;
            info!("Loaded roster data for {} judges", r.len());
            Some(r)
        }
        None => None,
    };

    let assignments = rows.len();
    let reports = build_reports(&resolver, rows, &styles, &counts, roster.as_ref());

    if let Some(path) = args.out_html.clone() {
        let html = report_html::render_schedule(&reports);
        fs::write(path.clone(), html).context(WritingOutputSnafu { path: path.clone() })?;
        info!("Wrote HTML schedule to {}", path);
    }

    if let Some(path) = args.out_worksheet.clone() {
        report_csv::write_worksheet(path.clone(), &resolver, &reports)?;
        info!("Wrote pairing worksheet to {}", path);
    }

    let summary_js = build_summary_js(&reports, &skipped);
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    match args.out.clone() {
        Some(path) if path != "stdout" => {
            fs::write(path.clone(), &pretty_js).context(WritingOutputSnafu { path })?;
        }
        Some(_) => println!("{}", pretty_js),
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = args.reference.clone() {
        let reference = read_reference(reference_path)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        if pretty_reference != pretty_js {
            warn!("Found differences with the reference summary");
            print_diff(pretty_reference.as_str(), pretty_js.as_str(), "\n");
            whatever!("Difference detected between computed summary and reference summary");
        }
    }

    let tables_with_issues = reports
        .iter()
        .filter(|r| !r.assessment.issues.is_empty())
        .count();
    Ok(RunStats {
        tables: reports.len(),
        assignments,
        skipped: skipped.len(),
        tables_with_issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(date: &str, site: &str, table: u32) -> TableKey {
        TableKey {
            date: date.to_string(),
            site: site.to_string(),
            table,
        }
    }

    fn row(name: &str, rank: &str, k: TableKey) -> AssignmentRow {
        AssignmentRow {
            name: name.to_string(),
            key: k,
            session: None,
            pairing: String::new(),
            rank: rank.to_string(),
            substyles: vec![],
        }
    }

    #[test]
    fn parses_plain_desired_table() {
        let p = parse_desired_table("02/06 Arlington T68 American Pale Ale").unwrap();
        assert_eq!(p.key, key("02/06", "ARLINGTON", 68));
        assert_eq!(p.session, None);
    }

    #[test]
    fn parses_desired_table_with_session() {
        let p = parse_desired_table("02/07 AM Dallas T55 Kolsch and Blonde").unwrap();
        assert_eq!(p.key, key("02/07", "DALLAS", 55));
        assert_eq!(p.session, Some("AM".to_string()));
    }

    #[test]
    fn rejects_malformed_desired_tables() {
        for raw in [
            "",
            "no table yet",
            "02/06 Arlington",
            "2/6 Arlington T68",
            "02/06 Arlington Table 68",
            "02/06 Arlington T",
            "02/06 Arlington Tsixty",
            "02/06 Morning Dallas T55",
        ] {
            assert_eq!(parse_desired_table(raw), None, "input: {:?}", raw);
        }
    }

    #[test]
    fn grouping_uses_composite_key_order() {
        let rows = vec![
            row("C", "Non-BJCP", key("02/07", "DALLAS", 3)),
            row("A", "Certified", key("02/06", "ARLINGTON", 68)),
            row("B", "Non-BJCP", key("02/06", "ARLINGTON", 68)),
        ];
        let grouped = group_assignments(rows);
        let keys: Vec<TableKey> = grouped.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![key("02/06", "ARLINGTON", 68), key("02/07", "DALLAS", 3)]
        );
        assert_eq!(grouped[&key("02/06", "ARLINGTON", 68)].len(), 2);
    }

    #[test]
    fn reports_carry_entry_counts_and_styles() {
        let resolver = RankResolver::standard();
        let rows = vec![
            row("A", "Certified", key("02/06", "ARLINGTON", 68)),
            row("B", "Non-BJCP", key("02/06", "ARLINGTON", 68)),
        ];
        let styles: BTreeMap<u32, io_tables::TableStyles> = [(
            68,
            io_tables::TableStyles {
                styles: ["21A".to_string()].into_iter().collect(),
                category: Some("India Pale Ale".to_string()),
            },
        )]
        .into_iter()
        .collect();
        let counts: BTreeMap<u32, u32> = [(68, 18)].into_iter().collect();
        let reports = build_reports(&resolver, rows, &styles, &counts, None);
        assert_eq!(reports.len(), 1);
        let r = &reports[0];
        assert_eq!(r.assessment.entry_count, 18);
        assert_eq!(r.assessment.band, WorkloadBand::Critical);
        assert_eq!(r.category, Some("India Pale Ale".to_string()));
    }

    #[test]
    fn missing_entry_count_defaults_to_zero() {
        let resolver = RankResolver::standard();
        let rows = vec![
            row("A", "Certified", key("02/06", "ARLINGTON", 99)),
            row("B", "Non-BJCP", key("02/06", "ARLINGTON", 99)),
        ];
        let reports = build_reports(&resolver, rows, &BTreeMap::new(), &BTreeMap::new(), None);
        assert_eq!(reports[0].assessment.entry_count, 0);
        assert_eq!(reports[0].assessment.band, WorkloadBand::Excellent);
    }

    #[test]
    fn no_certified_table_gets_candidates_even_without_entries() {
        let resolver = RankResolver::standard();
        let rows = vec![row("A", "Non-BJCP", key("02/06", "ARLINGTON", 5))];
        let roster = vec![RosterJudge {
            name: "Zed Zymurgy".to_string(),
            rank: "Certified".to_string(),
            entered_styles: vec![],
            active: true,
            distances: [("ARLINGTON".to_string(), 10)].into_iter().collect(),
        }];
        let reports = build_reports(
            &resolver,
            rows,
            &BTreeMap::new(),
            &BTreeMap::new(),
            Some(&roster),
        );
        assert_eq!(reports[0].assessment.entry_count, 0);
        assert_eq!(reports[0].assessment.band, WorkloadBand::Critical);
        assert_eq!(reports[0].candidates.len(), 1);
        assert_eq!(reports[0].candidates[0].name, "Zed Zymurgy");
    }

    #[test]
    fn summary_totals_count_bands() {
        let resolver = RankResolver::standard();
        let rows = vec![
            row("A", "Certified", key("02/06", "ARLINGTON", 1)),
            row("B", "Non-BJCP", key("02/06", "ARLINGTON", 1)),
            row("C", "Non-BJCP", key("02/06", "ARLINGTON", 2)),
        ];
        let reports = build_reports(&resolver, rows, &BTreeMap::new(), &BTreeMap::new(), None);
        let js = build_summary_js(&reports, &[]);
        assert_eq!(js["totals"]["tables"], json!(2));
        assert_eq!(js["totals"]["assignments"], json!(3));
        // Table 2 has no certified judge at all.
        assert_eq!(js["totals"]["critical"], json!(1));
        assert_eq!(js["tables"][1]["band"], json!("CRITICAL"));
        assert_eq!(js["tables"][0]["table"], json!("T1"));
    }
}
