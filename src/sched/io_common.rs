use std::collections::HashMap;

use crate::sched::{MissingColumnSnafu, SchedResult};
use snafu::prelude::*;

/// Normalizes a header cell: strips a UTF-8 byte order mark, surrounding
/// whitespace and surrounding quotes. Spreadsheet exports are inconsistent
/// about all three.
pub fn clean_header(raw: &str) -> String {
    let s = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    strip_quotes(s.trim()).to_string()
}

/// Strips one pair of surrounding double quotes, if present.
pub fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

/// Maps cleaned header names to their column index.
pub fn header_index(headers: &csv::StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, h)| (clean_header(h), idx))
        .collect()
}

/// Looks up a contractual column by name, failing with the file path for
/// context.
pub fn required_column(
    index: &HashMap<String, usize>,
    column: &str,
    path: &str,
) -> SchedResult<usize> {
    index
        .get(column)
        .copied()
        .context(MissingColumnSnafu { column, path })
}

/// Splits a comma-separated list of substyle codes into trimmed,
/// non-empty entries.
pub fn split_codes(raw: &str) -> Vec<String> {
    strip_quotes(raw.trim())
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_lose_bom_quotes_and_whitespace() {
        assert_eq!(clean_header("\u{feff}\"FULL NAME\" "), "FULL NAME");
        assert_eq!(clean_header("RANKING"), "RANKING");
    }

    #[test]
    fn code_lists_are_trimmed_and_filtered() {
        assert_eq!(split_codes("21A, 23B , "), vec!["21A", "23B"]);
        assert_eq!(split_codes("\"21A,23B\""), vec!["21A", "23B"]);
        assert!(split_codes("").is_empty());
    }
}
