//! Structured logging field name constants for checkinlog.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-row iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "db", "import"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "charset", "importer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "detect", "scan", "commit"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Check-in UUID being operated on.
pub const CHECKIN_ID: &str = "checkin_id";

/// Owning user UUID.
pub const USER_ID: &str = "user_id";

/// 1-based CSV line number.
pub const LINE: &str = "line";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows scanned during an import.
pub const ROW_COUNT: &str = "row_count";

/// Number of accumulated import errors.
pub const ERROR_COUNT: &str = "error_count";

/// Number of tags resolved for a row.
pub const TAG_COUNT: &str = "tag_count";

/// Detected charset name.
pub const CHARSET: &str = "charset";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
