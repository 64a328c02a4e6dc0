//! Import configuration: the CSV column headers the pipeline looks for.

use regex::Regex;

/// Column header configuration for the check-in CSV format.
///
/// Header strings are deployment data, not code. The defaults suit a
/// Japanese-language deployment; others swap them out without touching the
/// pipeline.
#[derive(Debug, Clone)]
pub struct CsvColumns {
    /// Header of the required timestamp column.
    pub timestamp: String,
    /// Header of the optional note column.
    pub note: String,
    /// Header of the optional link column.
    pub link: String,
    /// Prefix of tag columns; a full tag column name is the prefix followed
    /// by one or two digits.
    pub tag_prefix: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            timestamp: "日時".to_string(),
            note: "ノート".to_string(),
            link: "リンク".to_string(),
            tag_prefix: "タグ".to_string(),
        }
    }
}

impl CsvColumns {
    /// Compile the matcher for tag column names (`{prefix}1` .. `{prefix}99`).
    pub(crate) fn tag_column_regex(&self) -> Regex {
        Regex::new(&format!(
            r"\A{}\d{{1,2}}\z",
            regex::escape(&self.tag_prefix)
        ))
        .expect("escaped prefix always forms a valid pattern")
    }
}
