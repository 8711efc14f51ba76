use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::Deserialize;
use snafu::prelude::*;

use crate::sched::{CsvRecordSnafu, OpeningCsvSnafu, SchedResult};

/// The substyles judged at one table, plus its display category.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TableStyles {
    pub styles: BTreeSet<String>,
    pub category: Option<String>,
}

#[derive(Deserialize, Debug)]
struct StyleRow {
    #[serde(rename = "Table Number")]
    table: String,
    #[serde(rename = "BJCP Style Id")]
    style_id: String,
    #[serde(rename = "BJCP Style Name")]
    _style_name: Option<String>,
    #[serde(rename = "Medal Category Name")]
    category: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CountRow {
    #[serde(rename = "Table Number")]
    table: String,
    #[serde(rename = "Count")]
    count: String,
}

/// Reads the table-to-style mapping. One row per (table, substyle);
/// the first non-empty medal category seen for a table becomes its
/// display category. Rows without a numeric table number or a style id
/// are ignored.
pub fn read_styles(path: String) -> SchedResult<BTreeMap<u32, TableStyles>> {
    debug!("read_styles: attempting to read path {}", path);
    let mut rdr = csv::Reader::from_path(path.clone()).context(OpeningCsvSnafu { path: path.clone() })?;
    let mut res: BTreeMap<u32, TableStyles> = BTreeMap::new();
    for row_result in rdr.deserialize::<StyleRow>() {
        let row = row_result.context(CsvRecordSnafu { path: path.clone() })?;
        let table: u32 = match row.table.trim().parse() {
            Ok(t) => t,
            Err(_) => continue,
        };
        let style_id = row.style_id.trim();
        if style_id.is_empty() {
            continue;
        }
        let entry = res.entry(table).or_default();
        entry.styles.insert(style_id.to_string());
        if entry.category.is_none() {
            entry.category = row
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string());
        }
    }
    Ok(res)
}

/// Reads the per-table entry counts. Rows with a non-numeric count are
/// reported and skipped.
pub fn read_entry_counts(path: String) -> SchedResult<BTreeMap<u32, u32>> {
    debug!("read_entry_counts: attempting to read path {}", path);
    let mut rdr = csv::Reader::from_path(path.clone()).context(OpeningCsvSnafu { path: path.clone() })?;
    let mut res: BTreeMap<u32, u32> = BTreeMap::new();
    for row_result in rdr.deserialize::<CountRow>() {
        let row = row_result.context(CsvRecordSnafu { path: path.clone() })?;
        let table: u32 = match row.table.trim().parse() {
            Ok(t) => t,
            Err(_) => continue,
        };
        match row.count.trim().parse::<u32>() {
            Ok(count) => {
                res.insert(table, count);
            }
            Err(_) => {
                warn!("table {}: ignoring non-numeric count {:?}", table, row.count);
            }
        }
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn styles_group_by_table_with_first_category() {
        let path = write_temp(
            "brewsched_styles.csv",
            "Table Number,BJCP Style Id,BJCP Style Name,Medal Category Name\n\
             68,21A,American IPA,India Pale Ale\n\
             68,21B,Specialty IPA,\n\
             ,14A,Scottish Light,Orphan\n\
             55,5B,Kolsch,Pale European Beer\n",
        );
        let styles = read_styles(path).unwrap();
        assert_eq!(styles.len(), 2);
        let t68 = &styles[&68];
        assert_eq!(
            t68.styles,
            ["21A".to_string(), "21B".to_string()].into_iter().collect()
        );
        assert_eq!(t68.category, Some("India Pale Ale".to_string()));
        assert_eq!(styles[&55].category, Some("Pale European Beer".to_string()));
    }

    #[test]
    fn counts_skip_non_numeric_cells() {
        let path = write_temp(
            "brewsched_counts.csv",
            "Table Number,Count\n68,24\n55,n/a\n3,7\n",
        );
        let counts = read_entry_counts(path).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&68], 24);
        assert_eq!(counts[&3], 7);
    }
}
