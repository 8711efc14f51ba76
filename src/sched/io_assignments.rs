use log::debug;
use snafu::prelude::*;

use crate::sched::io_common::{header_index, required_column, split_codes, strip_quotes};
use crate::sched::{
    parse_desired_table, AssignmentRow, CsvRecordSnafu, OpeningCsvSnafu, SchedResult, SkippedRow,
};

const COL_NAME: &str = "FULL NAME";
const COL_TABLE: &str = "DESIRED TABLE TO JUDGE";
const COL_PAIRING: &str = "PAIRING";
const COL_RANK: &str = "RANKING";
const COL_SUBSTYLES: &str = "SUBSTYLES ENTERED";

/// Reads the tab-separated assignment sheet.
///
/// Returns the parsed assignments plus the rows that could not be
/// scheduled, with line numbers and reasons, so the caller can report
/// them. A malformed row is never a hard error; a missing contractual
/// column is.
pub fn read_assignments(path: String) -> SchedResult<(Vec<AssignmentRow>, Vec<SkippedRow>)> {
    debug!("read_assignments: attempting to read path {}", path);
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path.clone())
        .context(OpeningCsvSnafu { path: path.clone() })?;
    let headers = rdr
        .headers()
        .context(CsvRecordSnafu { path: path.clone() })?
        .clone();
    let index = header_index(&headers);
    let name_idx = required_column(&index, COL_NAME, &path)?;
    let table_idx = required_column(&index, COL_TABLE, &path)?;
    let rank_idx = required_column(&index, COL_RANK, &path)?;
    // Optional columns: older exports may not carry them.
    let pairing_idx = index.get(COL_PAIRING).copied();
    let substyles_idx = index.get(COL_SUBSTYLES).copied();

    let mut rows: Vec<AssignmentRow> = Vec::new();
    let mut skipped: Vec<SkippedRow> = Vec::new();
    for (rec_idx, rec_result) in rdr.into_records().enumerate() {
        // Header is line 1, first record line 2.
        let lineno = rec_idx + 2;
        let rec = rec_result.context(CsvRecordSnafu { path: path.clone() })?;
        let name = strip_quotes(rec.get(name_idx).unwrap_or("").trim()).trim();
        if name.is_empty() {
            skipped.push(SkippedRow {
                lineno,
                reason: "missing judge name".to_string(),
            });
            continue;
        }
        let raw_table = strip_quotes(rec.get(table_idx).unwrap_or("").trim()).trim();
        if raw_table.is_empty() || raw_table.to_ascii_lowercase().contains("no table") {
            skipped.push(SkippedRow {
                lineno,
                reason: format!("{}: no table assignment", name),
            });
            continue;
        }
        let parsed = match parse_desired_table(raw_table) {
            Some(p) => p,
            None => {
                skipped.push(SkippedRow {
                    lineno,
                    reason: format!("{}: unparseable desired table {:?}", name, raw_table),
                });
                continue;
            }
        };
        let pairing = pairing_idx
            .and_then(|i| rec.get(i))
            .unwrap_or("")
            .trim()
            .to_string();
        let substyles = substyles_idx
            .and_then(|i| rec.get(i))
            .map(split_codes)
            .unwrap_or_default();
        rows.push(AssignmentRow {
            name: name.to_string(),
            key: parsed.key,
            session: parsed.session,
            pairing,
            rank: rec.get(rank_idx).unwrap_or("").trim().to_string(),
            substyles,
        });
    }
    debug!(
        "read_assignments: {} rows parsed, {} skipped",
        rows.len(),
        skipped.len()
    );
    Ok((rows, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sched::TableKey;
    use std::fs;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn reads_assignment_sheet() {
        let path = write_temp(
            "brewsched_assignments_basic.tsv",
            "FULL NAME\tDESIRED TABLE TO JUDGE\tPAIRING\tRANKING\tSUBSTYLES ENTERED\n\
             Anna Ale\t02/06 Arlington T68 American Pale Ale\t1\tCertified\t21A, 23B\n\
             Bob Brown\t02/07 AM Dallas T55 Kolsch\t\tNon-BJCP\t\n",
        );
        let (rows, skipped) = read_assignments(path).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].key,
            TableKey {
                date: "02/06".to_string(),
                site: "ARLINGTON".to_string(),
                table: 68
            }
        );
        assert_eq!(rows[0].substyles, vec!["21A", "23B"]);
        assert_eq!(rows[1].session, Some("AM".to_string()));
        assert_eq!(rows[1].rank, "Non-BJCP");
    }

    #[test]
    fn bad_rows_are_reported_not_dropped() {
        let path = write_temp(
            "brewsched_assignments_skips.tsv",
            "FULL NAME\tDESIRED TABLE TO JUDGE\tPAIRING\tRANKING\tSUBSTYLES ENTERED\n\
             \t02/06 Arlington T68\t\tCertified\t\n\
             Carol Cask\tNo table yet\t\tCertified\t\n\
             Dave Dunkel\tsomeday maybe\t\tNovice\t\n\
             Erin Export\t02/06 Arlington T68 IPA\t\tCertified\t\n",
        );
        let (rows, skipped) = read_assignments(path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Erin Export");
        assert_eq!(skipped.len(), 3);
        assert_eq!(skipped[0].lineno, 2);
        assert!(skipped[1].reason.contains("no table"));
        assert!(skipped[2].reason.contains("unparseable"));
    }

    #[test]
    fn missing_contractual_column_is_an_error() {
        let path = write_temp(
            "brewsched_assignments_nocol.tsv",
            "NAME\tTABLE\tRANKING\nAnna\t02/06 Arlington T68\tCertified\n",
        );
        assert!(read_assignments(path).is_err());
    }
}
