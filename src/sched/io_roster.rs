use std::collections::BTreeMap;

use log::debug;
use snafu::prelude::*;

use judge_pairing::RosterJudge;

use crate::sched::io_common::{header_index, required_column, split_codes};
use crate::sched::{CsvRecordSnafu, OpeningCsvSnafu, SchedResult};

const COL_FIRST: &str = "First Name";
const COL_LAST: &str = "Last Name";
const COL_RANK: &str = "BJCP Rank";
const COL_STATUS: &str = "JUDGE STATUS";
const COL_SUBSTYLES: &str = "SUBSTYLES ENTERED";
// Older roster exports used this name for the substyle list.
const COL_SUBSTYLES_LEGACY: &str = "Entries";
const SITE_SUFFIX: &str = " SITE";

/// Reads the master judge roster.
///
/// Every column whose name ends in ` SITE` is a driving distance in miles
/// to that site; blank or non-numeric distance cells are treated as
/// unknown. Rows without both name parts are ignored.
pub fn read_roster(path: String) -> SchedResult<Vec<RosterJudge>> {
    debug!("read_roster: attempting to read path {}", path);
    let mut rdr = csv::Reader::from_path(path.clone()).context(OpeningCsvSnafu { path: path.clone() })?;
    let headers = rdr
        .headers()
        .context(CsvRecordSnafu { path: path.clone() })?
        .clone();
    let index = header_index(&headers);
    let first_idx = required_column(&index, COL_FIRST, &path)?;
    let last_idx = required_column(&index, COL_LAST, &path)?;
    let rank_idx = required_column(&index, COL_RANK, &path)?;
    let status_idx = required_column(&index, COL_STATUS, &path)?;
    let substyles_idx = index
        .get(COL_SUBSTYLES)
        .or_else(|| index.get(COL_SUBSTYLES_LEGACY))
        .copied();
    let site_columns: Vec<(usize, String)> = index
        .iter()
        .filter_map(|(name, &idx)| {
            name.strip_suffix(SITE_SUFFIX)
                .filter(|site| !site.is_empty())
                .map(|site| (idx, site.trim().to_ascii_uppercase()))
        })
        .collect();

    let mut roster: Vec<RosterJudge> = Vec::new();
    for rec_result in rdr.into_records() {
        let rec = rec_result.context(CsvRecordSnafu { path: path.clone() })?;
        let first = rec.get(first_idx).unwrap_or("").trim();
        let last = rec.get(last_idx).unwrap_or("").trim();
        if first.is_empty() || last.is_empty() {
            continue;
        }
        let status = rec.get(status_idx).unwrap_or("").trim();
        let mut distances: BTreeMap<String, u32> = BTreeMap::new();
        for (idx, site) in site_columns.iter() {
            if let Ok(miles) = rec.get(*idx).unwrap_or("").trim().parse::<u32>() {
                distances.insert(site.clone(), miles);
            }
        }
        roster.push(RosterJudge {
            name: format!("{} {}", first, last),
            rank: rec.get(rank_idx).unwrap_or("").trim().to_string(),
            entered_styles: substyles_idx
                .and_then(|i| rec.get(i))
                .map(split_codes)
                .unwrap_or_default(),
            active: status.eq_ignore_ascii_case("ACTIVE"),
            distances,
        });
    }
    debug!("read_roster: {} judges loaded", roster.len());
    Ok(roster)
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
    fn reads_roster_with_site_distances() {
        let path = write_temp(
            "brewsched_roster.csv",
            "First Name,Last Name,BJCP Rank,JUDGE STATUS,SUBSTYLES ENTERED,ARLINGTON SITE,DALLAS SITE\n\
             Anna,Ale,Certified,Active,\"21A, 23B\",12,45\n\
             Bob,Brown,Novice,inactive,,7,\n\
             ,Orphan,Certified,Active,,3,3\n",
        );
        let roster = read_roster(path).unwrap();
        assert_eq!(roster.len(), 2);
        let anna = &roster[0];
        assert_eq!(anna.name, "Anna Ale");
        assert!(anna.active);
        assert_eq!(anna.entered_styles, vec!["21A", "23B"]);
        assert_eq!(anna.distances[&"ARLINGTON".to_string()], 12);
        assert_eq!(anna.distances[&"DALLAS".to_string()], 45);
        let bob = &roster[1];
        assert!(!bob.active);
        assert!(!bob.distances.contains_key("DALLAS"));
    }

    #[test]
    fn legacy_entries_column_is_accepted() {
        let path = write_temp(
            "brewsched_roster_legacy.csv",
            "First Name,Last Name,BJCP Rank,JUDGE STATUS,Entries,AUSTIN SITE\n\
             Carol,Cask,National,ACTIVE,17A,2\n",
        );
        let roster = read_roster(path).unwrap();
        assert_eq!(roster[0].entered_styles, vec!["17A"]);
        assert_eq!(roster[0].distances[&"AUSTIN".to_string()], 2);
    }
}
