//! Domain-level constants.
//!
//! These constants define business rules and storage conventions.

// =============================================================================
// Users
// =============================================================================

/// Name written to every row by the bulk rename update.
pub const ATOMIC_PLACEHOLDER_NAME: &str = "Test Atomic";

/// Message returned when the mailer reports an address as taken
pub const EMAIL_IN_USE_MESSAGE: &str = "email is already in use";

// =============================================================================
// Cache
// =============================================================================

/// Key namespace for cached users (`users:<id>`)
pub const USER_CACHE_PREFIX: &str = "users";

/// Cached user lifetime (15 minutes)
pub const USER_CACHE_TTL_SECONDS: u64 = 15 * 60;
