/// Service name reported by the root and health endpoints
pub const PROJECT_NAME: &str = "Wellness Guide";

/// Prefix every API route is nested under
pub const API_V1_PREFIX: &str = "/api/v1";

/// Access token lifetime when ACCESS_TOKEN_EXPIRE_MINUTES is not set
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Value of `token_type` in login responses
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Number of most recent progress rows walked when computing the streak.
/// Any gap breaks the streak, so older history cannot contribute.
pub const STREAK_WINDOW: i64 = 365;

/// Default pagination for list endpoints
pub const DEFAULT_SKIP: i64 = 0;
pub const DEFAULT_LIMIT: i64 = 100;

/// Upper bound on a single page
pub const MAX_LIMIT: i64 = 1000;

/// Default look-back window for practice history
pub const DEFAULT_HISTORY_DAYS: i64 = 30;
pub const MAX_HISTORY_DAYS: i64 = 36_500;

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_INVALID_CREDENTIALS: &str = "Invalid credentials";

pub const ERR_NOT_AUTHENTICATED: &str = "Not authenticated";

pub const ERR_COULD_NOT_VALIDATE: &str = "Could not validate credentials";

pub const ERR_INACTIVE_USER: &str = "Inactive user";

pub const ERR_ALREADY_REGISTERED: &str = "Email or username already registered";

pub const ERR_ROUTINE_NOT_FOUND: &str = "Routine not found";

pub const ERR_PROGRESS_NOT_FOUND: &str = "Progress record not found";
