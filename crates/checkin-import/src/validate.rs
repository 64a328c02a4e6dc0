//! Per-row field validation.
//!
//! Rules apply independently and every failing rule contributes one message,
//! so a row with a bad timestamp and an over-long note reports both.
//! Messages here carry no line prefix; the orchestrator addresses them when
//! appending to the report.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use checkin_core::defaults::{MAX_LINK_CHARS, MAX_NOTE_CHARS};

use crate::config::CsvColumns;
use crate::reader::CsvRecord;

/// Timestamp shape: `20xx(-|/)M(-|/)D H:mm[:ss]`, leading zeros optional.
/// The regex admits hour 24 and day 31 in any month; calendar validity is
/// the parser's job and fails with a distinct message.
static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A20\d{2}[-/](1[0-2]|0?\d)[-/](0?\d|[1-2]\d|3[01]) (0?\d|1\d|2[0-4]):(0?\d|[1-5]\d)(?P<second>:(0?\d|[1-5]\d))?\z",
    )
    .expect("timestamp pattern is valid")
});

/// Field values extracted from one valid row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidRow {
    pub checked_in_at: NaiveDateTime,
    pub note: String,
    pub link: String,
}

enum TimestampError {
    /// Input does not match the expected shape.
    Format,
    /// Shape matched but the value is not a real calendar time.
    Value,
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let caps = TIMESTAMP_RE.captures(raw).ok_or(TimestampError::Format)?;

    let mut value = raw.replace('/', "-");
    if caps.name("second").is_none() {
        value.push_str(":00");
    }
    NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M:%S").map_err(|_| TimestampError::Value)
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Validate one record's fields, collecting every failing rule.
pub(crate) fn validate_row(
    columns: &CsvColumns,
    record: &CsvRecord,
) -> Result<ValidRow, Vec<String>> {
    let mut errors = Vec::new();

    let mut checked_in_at = None;
    match record.get(&columns.timestamp) {
        None | Some("") => errors.push(format!("{}列は必須です。", columns.timestamp)),
        Some(raw) => match parse_timestamp(raw) {
            Ok(ts) => checked_in_at = Some(ts),
            Err(TimestampError::Format) => {
                errors.push(format!("{}列の書式が正しくありません。", columns.timestamp))
            }
            Err(TimestampError::Value) => errors.push(format!(
                "{}列に不正な値が入力されています。",
                columns.timestamp
            )),
        },
    }

    let raw_note = record.get(&columns.note).unwrap_or("");
    if raw_note.chars().count() > MAX_NOTE_CHARS {
        errors.push(format!(
            "{}は{}文字以内にしてください。",
            columns.note, MAX_NOTE_CHARS
        ));
    }
    let note = normalize_newlines(raw_note);

    let link = record.get(&columns.link).unwrap_or("").to_string();
    if !link.is_empty() {
        if link.chars().count() > MAX_LINK_CHARS {
            errors.push(format!(
                "{}は{}文字以内にしてください。",
                columns.link, MAX_LINK_CHARS
            ));
        }
        if Url::parse(&link).is_err() {
            errors.push(format!("{}には正しいURLを入力してください。", columns.link));
        }
    }

    match (checked_in_at, errors.is_empty()) {
        (Some(checked_in_at), true) => Ok(ValidRow {
            checked_in_at,
            note,
            link,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::RecordStream;
    use chrono::NaiveDate;

    fn record(header: &str, row: &str) -> CsvRecord {
        RecordStream::new(format!("{}\n{}\n", header, row))
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
    }

    fn columns() -> CsvColumns {
        CsvColumns::default()
    }

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_valid_row_with_note() {
        let row = validate_row(&columns(), &record("日時,ノート", "2024-01-15 10:30,hello")).unwrap();
        assert_eq!(row.checked_in_at, dt(2024, 1, 15, 10, 30, 0));
        assert_eq!(row.note, "hello");
        assert_eq!(row.link, "");
    }

    #[test]
    fn test_slash_dates_and_optional_padding() {
        let row = validate_row(&columns(), &record("日時", "2024/3/5 9:05")).unwrap();
        assert_eq!(row.checked_in_at, dt(2024, 3, 5, 9, 5, 0));
    }

    #[test]
    fn test_explicit_seconds_are_kept() {
        let row = validate_row(&columns(), &record("日時", "2024-01-15 10:30:42")).unwrap();
        assert_eq!(row.checked_in_at, dt(2024, 1, 15, 10, 30, 42));
    }

    #[test]
    fn test_missing_timestamp_is_required_error() {
        let errors = validate_row(&columns(), &record("日時,ノート", ",hi")).unwrap_err();
        assert_eq!(errors, vec!["日時列は必須です。"]);
    }

    #[test]
    fn test_pre_2000_year_is_format_error() {
        let errors = validate_row(&columns(), &record("日時", "1999-01-15 10:30")).unwrap_err();
        assert_eq!(errors, vec!["日時列の書式が正しくありません。"]);
    }

    #[test]
    fn test_impossible_calendar_date_is_value_error() {
        let errors = validate_row(&columns(), &record("日時", "2024-02-30 10:00")).unwrap_err();
        assert_eq!(errors, vec!["日時列に不正な値が入力されています。"]);
    }

    #[test]
    fn test_hour_24_matches_shape_but_fails_parsing() {
        let errors = validate_row(&columns(), &record("日時", "2024-01-15 24:00")).unwrap_err();
        assert_eq!(errors, vec!["日時列に不正な値が入力されています。"]);
    }

    #[test]
    fn test_note_at_limit_is_accepted() {
        let note = "あ".repeat(MAX_NOTE_CHARS);
        let row = validate_row(
            &columns(),
            &record("日時,ノート", &format!("2024-01-15 10:30,{}", note)),
        )
        .unwrap();
        assert_eq!(row.note.chars().count(), MAX_NOTE_CHARS);
    }

    #[test]
    fn test_note_over_limit_is_rejected() {
        let note = "x".repeat(MAX_NOTE_CHARS + 1);
        let errors = validate_row(
            &columns(),
            &record("日時,ノート", &format!("2024-01-15 10:30,{}", note)),
        )
        .unwrap_err();
        assert_eq!(errors, vec!["ノートは500文字以内にしてください。"]);
    }

    #[test]
    fn test_note_newlines_are_normalized() {
        let row = validate_row(
            &columns(),
            &record("日時,ノート", "2024-01-15 10:30,\"a\r\nb\rc\""),
        )
        .unwrap();
        assert_eq!(row.note, "a\nb\nc");
    }

    #[test]
    fn test_link_must_be_a_url() {
        let errors = validate_row(
            &columns(),
            &record("日時,リンク", "2024-01-15 10:30,not-a-url"),
        )
        .unwrap_err();
        assert_eq!(errors, vec!["リンクには正しいURLを入力してください。"]);
    }

    #[test]
    fn test_valid_link_is_kept() {
        let row = validate_row(
            &columns(),
            &record("日時,リンク", "2024-01-15 10:30,https://example.com/page"),
        )
        .unwrap();
        assert_eq!(row.link, "https://example.com/page");
    }

    #[test]
    fn test_link_over_limit_is_rejected() {
        let link = format!("https://example.com/{}", "p".repeat(MAX_LINK_CHARS));
        let errors = validate_row(
            &columns(),
            &record("日時,リンク", &format!("2024-01-15 10:30,{}", link)),
        )
        .unwrap_err();
        assert_eq!(errors, vec!["リンクは2000文字以内にしてください。"]);
    }

    #[test]
    fn test_over_long_non_url_link_reports_both_rules() {
        let link = "p".repeat(MAX_LINK_CHARS + 1);
        let errors = validate_row(
            &columns(),
            &record("日時,リンク", &format!("2024-01-15 10:30,{}", link)),
        )
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                "リンクは2000文字以内にしてください。",
                "リンクには正しいURLを入力してください。"
            ]
        );
    }

    #[test]
    fn test_multiple_failures_all_reported() {
        let note = "x".repeat(MAX_NOTE_CHARS + 1);
        let errors = validate_row(
            &columns(),
            &record(
                "日時,ノート,リンク",
                &format!("bogus,{},not-a-url", note),
            ),
        )
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                "日時列の書式が正しくありません。",
                "ノートは500文字以内にしてください。",
                "リンクには正しいURLを入力してください。"
            ]
        );
    }
}
