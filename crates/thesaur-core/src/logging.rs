//! Structured logging schema and field name constants for thesaur.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same field names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, query phases |
//! | TRACE | Per-item iteration, high-volume data (result rows, statements) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request and its store calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "search", "store", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "concept_search", "materializer", "sparql_http", "skos_repository"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "count", "materialize", "load_concept"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// URI of the resource being loaded.
pub const URI: &str = "uri";

/// Name of the SPARQL query template being executed.
pub const QUERY_NAME: &str = "query_name";

/// Regex pattern derived from a search query.
pub const PATTERN: &str = "pattern";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of statements consumed by a materialization pass.
pub const STATEMENT_COUNT: &str = "statement_count";

/// Number of entities built by a materialization pass.
pub const ENTITY_COUNT: &str = "entity_count";

// ─── Search-specific fields ────────────────────────────────────────────────

/// Total number of matches reported by the count phase.
pub const TOTAL_MATCHES: &str = "total_matches";

/// 1-based page number.
pub const PAGE: &str = "page";

// ─── Store fields ──────────────────────────────────────────────────────────

/// SPARQL endpoint URL.
pub const ENDPOINT: &str = "endpoint";

/// HTTP status returned by the endpoint.
pub const HTTP_STATUS: &str = "http_status";
