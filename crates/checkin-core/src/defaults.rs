//! Centralized default constants for the checkinlog system.
//!
//! **This module is the single source of truth** for all shared default
//! values. The database layer and the import pipeline reference these
//! constants instead of defining their own magic numbers.

// =============================================================================
// FIELD LIMITS
// =============================================================================

/// Maximum length of a check-in note, in characters.
pub const MAX_NOTE_CHARS: usize = 500;

/// Maximum length of a check-in link, in characters.
pub const MAX_LINK_CHARS: usize = 2000;

/// Maximum length of a tag name, in characters.
pub const MAX_TAG_CHARS: usize = 255;

/// Maximum number of tags associated with a single check-in.
pub const MAX_TAGS_PER_CHECKIN: usize = 32;

// =============================================================================
// CSV IMPORT
// =============================================================================

/// Bytes read from the head of an uploaded file for charset detection.
pub const CHARSET_SAMPLE_BYTES: usize = 1024;

/// Detection attempts before giving up. Each retry after the first extends
/// the sample by one byte to step over a split multi-byte character.
pub const CHARSET_DETECT_ATTEMPTS: usize = 4;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for check-in listings.
pub const PAGE_LIMIT: i64 = 50;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;
