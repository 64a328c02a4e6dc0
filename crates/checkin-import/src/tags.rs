//! Tag column extraction.
//!
//! Tag columns are named `{prefix}1` through `{prefix}99`. Scanning walks
//! the row's columns in header order; the first invalid value aborts the
//! row (it is skipped for persistence), while empty cells are simply passed
//! over. Resolution of accepted names to persistent tags happens in the
//! orchestrator through the import transaction.

use regex::Regex;

use checkin_core::defaults::{MAX_TAGS_PER_CHECKIN, MAX_TAG_CHARS};

use crate::config::CsvColumns;
use crate::reader::CsvRecord;

pub(crate) struct TagScanner {
    pattern: Regex,
}

impl TagScanner {
    pub fn new(columns: &CsvColumns) -> Self {
        Self {
            pattern: columns.tag_column_regex(),
        }
    }

    /// Collect the tag values of one row, in header order.
    ///
    /// Trims each cell, skips empties, deduplicates by exact name, and stops
    /// silently once [`MAX_TAGS_PER_CHECKIN`] tags are accepted. Returns the
    /// first validation failure as the row's error message.
    pub fn scan(&self, record: &CsvRecord) -> Result<Vec<String>, String> {
        let mut tags: Vec<String> = Vec::new();

        for (column, value) in record.cells() {
            if !self.pattern.is_match(column) {
                continue;
            }

            let tag = value.trim();
            if tag.is_empty() {
                continue;
            }
            if tag.chars().count() > MAX_TAG_CHARS {
                return Err(format!(
                    "{}は{}文字以内にしてください。",
                    column, MAX_TAG_CHARS
                ));
            }
            if tag.contains('\n') {
                return Err(format!("{}に改行を含めることはできません。", column));
            }

            if tags.iter().any(|t| t == tag) {
                continue;
            }
            tags.push(tag.to_string());
            if tags.len() >= MAX_TAGS_PER_CHECKIN {
                break;
            }
        }

        Ok(tags)
    }
}
