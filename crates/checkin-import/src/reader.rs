//! Decoding CSV record stream.
//!
//! Turns raw upload bytes into a single-pass sequence of header-keyed
//! records. Shift_JIS input is transliterated to UTF-8 up front so header
//! matching and every downstream value are canonical UTF-8.

use std::io::Cursor;

use crate::charset::DetectedEncoding;

/// Decode raw file bytes into UTF-8 text according to the detected charset.
///
/// Undecodable sequences past the detection sample are replaced rather than
/// aborting the import; a UTF-8 BOM is stripped.
pub(crate) fn decode_bytes(bytes: &[u8], encoding: DetectedEncoding) -> String {
    let encoding = match encoding {
        DetectedEncoding::Utf8 => encoding_rs::UTF_8,
        DetectedEncoding::ShiftJis => encoding_rs::SHIFT_JIS,
    };
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// One data row: cell values keyed by header name, in column order, plus the
/// 1-based file line (the header row is line 1).
#[derive(Debug, Clone)]
pub(crate) struct CsvRecord {
    pub line: u64,
    cells: Vec<(String, String)>,
}

impl CsvRecord {
    /// Look up a cell by exact header name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(header, _)| header == column)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(header, value)| (header.as_str(), value.as_str()))
    }
}

/// Lazy, single-pass stream of [`CsvRecord`] over decoded CSV text.
///
/// The first row is consumed as the header. Standard CSV quoting applies:
/// comma delimiter, double-quote escaping, embedded newlines preserved
/// inside quoted fields. Rows shorter than the header yield empty cells for
/// the missing columns; extra cells are dropped.
pub(crate) struct RecordStream {
    records: csv::StringRecordsIntoIter<Cursor<Vec<u8>>>,
    headers: csv::StringRecord,
    line: u64,
}

impl RecordStream {
    pub fn new(content: String) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(Cursor::new(content.into_bytes()));
        let headers = reader.headers()?.clone();
        Ok(Self {
            records: reader.into_records(),
            headers,
            line: 1,
        })
    }

    /// Whether the header row contains the given column.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

impl Iterator for RecordStream {
    type Item = Result<CsvRecord, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.line += 1;
        let line = self.line;

        Some(record.map(|rec| CsvRecord {
            line,
            cells: self
                .headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.to_string(), rec.get(i).unwrap_or("").to_string()))
                .collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(content: &str) -> Vec<CsvRecord> {
        RecordStream::new(content.to_string())
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_records_are_header_keyed() {
        let rows = collect("日時,ノート\n2024-01-15 10:30,hello\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("日時"), Some("2024-01-15 10:30"));
        assert_eq!(rows[0].get("ノート"), Some("hello"));
        assert_eq!(rows[0].get("リンク"), None);
    }

    #[test]
    fn test_line_numbers_start_after_header() {
        let rows = collect("日時\na\nb\n");
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_quoted_embedded_newline_is_preserved() {
        let rows = collect("日時,ノート\n2024-01-15 10:30,\"line one\nline two\"\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("ノート"), Some("line one\nline two"));
        // Record position, not physical line, drives line numbering.
        assert_eq!(rows[0].line, 2);
    }

    #[test]
    fn test_short_row_yields_empty_cells() {
        let rows = collect("日時,ノート,リンク\n2024-01-15 10:30\n");
        assert_eq!(rows[0].get("ノート"), Some(""));
        assert_eq!(rows[0].get("リンク"), Some(""));
    }

    #[test]
    fn test_has_column() {
        let stream = RecordStream::new("日時,タグ1\n".to_string()).unwrap();
        assert!(stream.has_column("日時"));
        assert!(!stream.has_column("ノート"));
    }

    #[test]
    fn test_shift_jis_bytes_decode_to_utf8() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("日時,ノート\n");
        let text = decode_bytes(&bytes, DetectedEncoding::ShiftJis);
        assert_eq!(text, "日時,ノート\n");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("日時\n".as_bytes());
        let text = decode_bytes(&bytes, DetectedEncoding::Utf8);
        assert_eq!(text, "日時\n");
    }

    #[test]
    fn test_cells_iterate_in_column_order() {
        let rows = collect("タグ2,タグ1\nb,a\n");
        let cells: Vec<_> = rows[0].cells().collect();
        assert_eq!(cells, vec![("タグ2", "b"), ("タグ1", "a")]);
    }
}
