//! Structured logging schema for tagtune.
//!
//! All crates log with the same field names so events can be queried
//! uniformly. Field names are written literally in `tracing` macros; the
//! subsystem values below are passed as field values.
//!
//! ## Field names
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | Originating subsystem (values below) |
//! | `component` | Component within the subsystem ("http", "memory", "resolver") |
//! | `op` | Logical operation ("load", "commit", "fetch_catalog") |
//! | `plugin` | Plugin identifier whose settings are touched |
//! | `tag_key` | Normalized tag key |
//! | `category` | Tag category |
//! | `tag_count` | Number of tags in a catalog or write-back document |
//! | `attempt` | Readiness probe attempt number |
//! | `duration_ms` | Wall-clock duration in milliseconds |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Store unreachable or rejected a write |
//! | WARN  | Recoverable issue, fallback applied (numeric coercion, key collision) |
//! | INFO  | Load and commit completions |
//! | DEBUG | Decision points, request URLs |
//! | TRACE | Per-tag iteration |

/// Subsystem value for settings store clients.
pub const SUBSYSTEM_STORE: &str = "store";

/// Subsystem value for the tag settings editor.
pub const SUBSYSTEM_EDITOR: &str = "editor";

/// Requests slower than this are logged with `slow = true`.
pub const SLOW_REQUEST_MS: u64 = 2_000;
