/// Shared text helpers for the outage cleaning pipeline
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Extract the 4-digit year prefix from an annual summary file name
///
/// OE-417 summaries are named after the year they cover, e.g.
/// "2019_Annual_Summary.xls". The year decides which layout the file uses.
///
/// # Examples
///
/// ```
/// use outage_history::utils::source_year;
///
/// assert_eq!(source_year("2019_Annual_Summary.xls"), Some("2019"));
/// assert_eq!(source_year("2021_Annual_Summary"), Some("2021"));
/// assert_eq!(source_year("Annual_Summary_2019.xls"), None);
/// assert_eq!(source_year("201_Annual_Summary.xls"), None);
/// ```
pub fn source_year(file_name: &str) -> Option<&str> {
    let prefix = file_name.get(..4)?;
    if prefix.chars().all(|c| c.is_ascii_digit()) {
        Some(prefix)
    } else {
        None
    }
}

/// Final path component as text, falling back to the whole path
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Collapse runs of whitespace (including embedded newlines) into single spaces
///
/// Spreadsheet cells often wrap long text, so "Date Event\nBegan" and
/// "Date Event Began" must compare equal.
///
/// ```
/// use outage_history::utils::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  Date Event\nBegan "), "Date Event Began");
/// ```
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}
