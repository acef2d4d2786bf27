//! Centralized default constants for thesaur.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates and the CLI reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// STORE
// =============================================================================

/// Default SPARQL endpoint (RDF4J repository layout).
pub const SPARQL_ENDPOINT: &str = "http://localhost:8080/rdf4j-server/repositories/thesaurus";

/// Timeout for a single SPARQL request in seconds.
pub const SPARQL_TIMEOUT_SECS: u64 = 30;

/// User agent sent with SPARQL requests.
pub const USER_AGENT: &str = concat!("thesaur/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for concept search.
pub const PAGE_SIZE_SEARCH: i64 = 20;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// HIGHLIGHT
// =============================================================================

/// Maximum width (characters) of a highlighted excerpt.
pub const HIGHLIGHT_MAX_OCCURRENCE_WIDTH: usize = 80;

/// Maximum width (characters) of the context on each side of a match.
pub const HIGHLIGHT_MAX_CONTEXT_WIDTH: usize = 30;

/// Opening tag wrapped around the matched text.
pub const HIGHLIGHT_PRE_TAG: &str = "<b>";

/// Closing tag wrapped around the matched text.
pub const HIGHLIGHT_POST_TAG: &str = "</b>";

/// Marker inserted where text was cut.
pub const ELLIPSIS: &str = "...";

// =============================================================================
// COLLATION
// =============================================================================

/// Number of collators kept in the per-language cache.
pub const COLLATOR_CACHE_SIZE: usize = 16;

/// Languages preferred when resolving labels, in priority order.
pub const LANGUAGES: &[&str] = &["fr", "en"];

// =============================================================================
// CONFIG
// =============================================================================

/// Environment variable pointing at an explicit config file.
pub const ENV_CONFIG_PATH: &str = "THESAUR_CONFIG";

/// Environment variable for the SPARQL endpoint.
pub const ENV_SPARQL_ENDPOINT: &str = "THESAUR_SPARQL_ENDPOINT";

/// Environment variable for the SPARQL timeout in seconds.
pub const ENV_SPARQL_TIMEOUT_SECS: &str = "THESAUR_SPARQL_TIMEOUT_SECS";

/// Environment variable for the default search page size.
pub const ENV_PAGE_SIZE: &str = "THESAUR_PAGE_SIZE";

/// Environment variable for the comma-separated language priority list.
pub const ENV_LANGUAGES: &str = "THESAUR_LANGUAGES";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_widths_are_consistent() {
        assert!(HIGHLIGHT_MAX_OCCURRENCE_WIDTH > 2 * HIGHLIGHT_MAX_CONTEXT_WIDTH);
    }

    #[test]
    fn test_pagination_defaults() {
        assert!(PAGE_SIZE_SEARCH > 0);
        assert_eq!(PAGE_OFFSET, 0);
    }

    #[test]
    fn test_user_agent_has_version() {
        assert!(USER_AGENT.starts_with("thesaur/"));
    }
}
