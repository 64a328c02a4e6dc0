//! CSV import orchestrator.
//!
//! Drives one import call end to end: open the file, detect its charset,
//! decode, check the header, then scan every record inside a single
//! transaction. Row failures accumulate in the report and the scan keeps
//! going; any non-empty report at the end rolls the whole transaction back,
//! so an import either lands completely or not at all.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use checkin_core::{CheckinSource, CreateCheckinRequest, ImportStore, ImportTransaction};

use crate::charset::{detect_charset, CharsetError};
use crate::config::CsvColumns;
use crate::reader::{decode_bytes, RecordStream};
use crate::report::{CsvImportError, ImportReport};
use crate::tags::TagScanner;
use crate::validate::validate_row;

/// Message for a file that cannot be opened or read.
const READ_ERROR_MESSAGE: &str = "CSVファイルの読み込み中にエラーが発生しました。";

/// Message for unexpected failures mid-scan (I/O, database).
const UNEXPECTED_ERROR_MESSAGE: &str = "CSVファイルの読み込み中に予期せぬエラーが発生しました。";

/// Message for an undetermined or unsupported charset.
const CHARSET_ERROR_MESSAGE: &str =
    "文字コード判定に失敗しました。UTF-8 (BOM無し) または Shift_JIS をお使いください。";

/// Summary of a committed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of check-ins persisted.
    pub rows: usize,
}

/// One CSV bulk-import invocation for a single user.
pub struct CheckinCsvImporter<S> {
    store: S,
    user_id: Uuid,
    path: PathBuf,
    columns: CsvColumns,
}

impl<S: ImportStore> CheckinCsvImporter<S> {
    pub fn new(store: S, user_id: Uuid, path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            user_id,
            path: path.into(),
            columns: CsvColumns::default(),
        }
    }

    /// Override the column header configuration.
    pub fn with_columns(mut self, columns: CsvColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Run the import: persist every row or nothing.
    ///
    /// On failure the returned report lists every error found in the file,
    /// in discovery order, and no check-in from this call survives.
    pub async fn execute(&self) -> Result<ImportSummary, CsvImportError> {
        let start = Instant::now();

        // The handle is scoped to this call and drops on every exit path.
        let mut file = File::open(&self.path).map_err(|e| {
            warn!(
                subsystem = "import",
                component = "importer",
                op = "open",
                path = %self.path.display(),
                error = %e,
                "Failed to open CSV file"
            );
            CsvImportError::fatal(READ_ERROR_MESSAGE)
        })?;

        let encoding = match detect_charset(&mut file) {
            Ok(encoding) => encoding,
            Err(CharsetError::Undetermined) => {
                return Err(CsvImportError::fatal(CHARSET_ERROR_MESSAGE))
            }
            Err(CharsetError::Io(_)) => return Err(CsvImportError::fatal(READ_ERROR_MESSAGE)),
        };

        let mut raw = Vec::new();
        file.rewind()
            .and_then(|_| file.read_to_end(&mut raw))
            .map_err(|_| CsvImportError::fatal(READ_ERROR_MESSAGE))?;
        drop(file);

        let content = decode_bytes(&raw, encoding);
        let stream = match RecordStream::new(content) {
            Ok(stream) => stream,
            Err(_) => return Err(CsvImportError::fatal(READ_ERROR_MESSAGE)),
        };

        // The transaction brackets the whole scan; the header check happens
        // inside it so every exit path below goes through commit or rollback.
        let mut tx = self
            .store
            .begin()
            .await
            .map_err(|_| CsvImportError::fatal(UNEXPECTED_ERROR_MESSAGE))?;

        let mut report = ImportReport::new();
        let mut imported = 0usize;

        if stream.has_column(&self.columns.timestamp) {
            let scanner = TagScanner::new(&self.columns);

            for result in stream {
                let record = match result {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(
                            subsystem = "import",
                            component = "importer",
                            op = "scan",
                            error = %e,
                            "CSV record read failed"
                        );
                        report.push_fatal(UNEXPECTED_ERROR_MESSAGE);
                        break;
                    }
                };
                let line = record.line;

                let valid = match validate_row(&self.columns, &record) {
                    Ok(valid) => valid,
                    Err(messages) => {
                        for message in messages {
                            report.push_row(line, message);
                        }
                        continue;
                    }
                };

                let tags = match scanner.scan(&record) {
                    Ok(tags) => tags,
                    Err(message) => {
                        report.push_row(line, message);
                        continue;
                    }
                };

                let persisted = async {
                    for tag in &tags {
                        tx.ensure_tag(tag).await?;
                    }
                    let checkin_id = tx
                        .insert_checkin(CreateCheckinRequest {
                            user_id: self.user_id,
                            checked_in_at: valid.checked_in_at,
                            note: valid.note,
                            link: valid.link,
                            source: CheckinSource::Csv,
                            tags: None,
                        })
                        .await?;
                    if !tags.is_empty() {
                        tx.set_checkin_tags(checkin_id, &tags).await?;
                    }
                    Ok::<_, checkin_core::Error>(())
                }
                .await;

                match persisted {
                    Ok(()) => imported += 1,
                    Err(e) => {
                        warn!(
                            subsystem = "import",
                            component = "importer",
                            op = "scan",
                            line,
                            error = %e,
                            "Unexpected store error during scan"
                        );
                        report.push_fatal(UNEXPECTED_ERROR_MESSAGE);
                        break;
                    }
                }
            }
        } else {
            // Without the timestamp header nothing is scanned.
            report.push_fatal(format!("{}列は必須です。", self.columns.timestamp));
        }

        if report.is_empty() {
            tx.commit()
                .await
                .map_err(|_| CsvImportError::fatal(UNEXPECTED_ERROR_MESSAGE))?;
            info!(
                subsystem = "import",
                component = "importer",
                op = "commit",
                user_id = %self.user_id,
                charset = encoding.name(),
                row_count = imported,
                duration_ms = start.elapsed().as_millis() as u64,
                "CSV import committed"
            );
            Ok(ImportSummary { rows: imported })
        } else {
            let error_count = report.len();
            if let Err(e) = tx.rollback().await {
                warn!(
                    subsystem = "import",
                    component = "importer",
                    op = "rollback",
                    error = %e,
                    "Rollback failed after import errors"
                );
            }
            info!(
                subsystem = "import",
                component = "importer",
                op = "rollback",
                user_id = %self.user_id,
                error_count,
                duration_ms = start.elapsed().as_millis() as u64,
                "CSV import rolled back"
            );
            Err(report.into_error())
        }
    }
}
