//! Charset detection for uploaded CSV files.
//!
//! Uploads are accepted in UTF-8 (no BOM required) or Shift_JIS. Detection
//! reads a bounded sample from the head of the file and validates it
//! strictly against each candidate in order. A sample that ends in the
//! middle of a multi-byte character matches nothing; extending it by one
//! byte and retrying resolves that ambiguity without reading the whole file.

use std::io::Read;

use tracing::debug;

use checkin_core::defaults::{CHARSET_DETECT_ATTEMPTS, CHARSET_SAMPLE_BYTES};

/// Supported text encodings for uploaded CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    /// Canonical encoding; pure-ASCII input also lands here.
    Utf8,
    /// Legacy Japanese encoding, transliterated to UTF-8 before parsing.
    ShiftJis,
}

impl DetectedEncoding {
    /// Human-readable charset name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            DetectedEncoding::Utf8 => "UTF-8",
            DetectedEncoding::ShiftJis => "Shift_JIS",
        }
    }
}

/// Charset detection failure.
#[derive(Debug, thiserror::Error)]
pub enum CharsetError {
    /// No supported encoding matched within the attempt budget.
    #[error("could not determine charset within {CHARSET_DETECT_ATTEMPTS} attempts")]
    Undetermined,
    /// The underlying source failed to read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Guess the charset of `reader` from its leading bytes.
///
/// Reads an initial sample of [`CHARSET_SAMPLE_BYTES`]; on an ambiguous
/// result the sample grows by exactly one byte per retry, up to
/// [`CHARSET_DETECT_ATTEMPTS`] attempts total. Hitting end of input without
/// a determination fails early.
///
/// The reader is left positioned mid-file; callers rewind before parsing.
pub fn detect_charset<R: Read>(reader: &mut R) -> Result<DetectedEncoding, CharsetError> {
    let mut sample = Vec::with_capacity(CHARSET_SAMPLE_BYTES);
    reader
        .by_ref()
        .take(CHARSET_SAMPLE_BYTES as u64)
        .read_to_end(&mut sample)?;
    let mut eof = sample.len() < CHARSET_SAMPLE_BYTES;

    for attempt in 0..CHARSET_DETECT_ATTEMPTS {
        if let Some(encoding) = match_candidates(&sample) {
            debug!(
                subsystem = "import",
                component = "charset",
                op = "detect",
                charset = encoding.name(),
                attempt,
                sample_len = sample.len(),
                "Charset determined"
            );
            return Ok(encoding);
        }

        if eof {
            break;
        }
        // One more byte may complete a character split by the sample edge.
        let mut next = [0u8; 1];
        if reader.read(&mut next)? == 0 {
            eof = true;
        } else {
            sample.push(next[0]);
        }
    }

    Err(CharsetError::Undetermined)
}

/// Match the sample against the ordered candidate set.
///
/// ASCII folds into the canonical UTF-8 path. A sample that is valid UTF-8
/// except for an incomplete trailing sequence stays undecided rather than
/// falling through to Shift_JIS, so the retry can settle it.
fn match_candidates(sample: &[u8]) -> Option<DetectedEncoding> {
    if sample.iter().all(|b| b.is_ascii()) {
        return Some(DetectedEncoding::Utf8);
    }

    match std::str::from_utf8(sample) {
        Ok(_) => return Some(DetectedEncoding::Utf8),
        Err(e) if e.error_len().is_none() => return None,
        Err(_) => {}
    }

    if encoding_rs::SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(sample)
        .is_some()
    {
        return Some(DetectedEncoding::ShiftJis);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sjis(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    #[test]
    fn test_ascii_detects_as_utf8() {
        let mut cursor = Cursor::new(b"date,note\n2024-01-01 10:00,hello\n".to_vec());
        assert_eq!(detect_charset(&mut cursor).unwrap(), DetectedEncoding::Utf8);
    }

    #[test]
    fn test_utf8_detects_first_attempt() {
        let mut cursor = Cursor::new("日時,ノート\n".as_bytes().to_vec());
        assert_eq!(detect_charset(&mut cursor).unwrap(), DetectedEncoding::Utf8);
    }

    #[test]
    fn test_shift_jis_detects() {
        let mut cursor = Cursor::new(sjis("日時,ノート\n2024-01-01 10:00,テスト\n"));
        assert_eq!(
            detect_charset(&mut cursor).unwrap(),
            DetectedEncoding::ShiftJis
        );
    }

    #[test]
    fn test_shift_jis_split_at_sample_edge_detects_after_extension() {
        // 1023 ASCII bytes, then a double-byte character straddling the
        // 1024-byte sample boundary.
        let mut bytes = vec![b'a'; CHARSET_SAMPLE_BYTES - 1];
        bytes.extend_from_slice(&sjis("あいう"));
        let mut cursor = Cursor::new(bytes);
        assert_eq!(
            detect_charset(&mut cursor).unwrap(),
            DetectedEncoding::ShiftJis
        );
    }

    #[test]
    fn test_utf8_split_at_sample_edge_detects_after_extension() {
        let mut bytes = vec![b'a'; CHARSET_SAMPLE_BYTES - 1];
        bytes.extend_from_slice("あいう".as_bytes());
        let mut cursor = Cursor::new(bytes);
        assert_eq!(detect_charset(&mut cursor).unwrap(), DetectedEncoding::Utf8);
    }

    #[test]
    fn test_utf16_bom_is_rejected() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "unsupported".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let mut cursor = Cursor::new(bytes);
        assert!(matches!(
            detect_charset(&mut cursor),
            Err(CharsetError::Undetermined)
        ));
    }

    #[test]
    fn test_short_invalid_file_fails_at_eof() {
        // A lone 0xFF is invalid in every candidate and the file ends before
        // the retry budget is exhausted.
        let mut cursor = Cursor::new(vec![b'a', 0xFF]);
        assert!(matches!(
            detect_charset(&mut cursor),
            Err(CharsetError::Undetermined)
        ));
    }

    #[test]
    fn test_empty_input_detects_as_utf8() {
        let mut cursor = Cursor::new(Vec::new());
        assert_eq!(detect_charset(&mut cursor).unwrap(), DetectedEncoding::Utf8);
    }
}
