// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Storefront";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "storefront";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".storefront";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "storefront.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "STOREFRONT_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "STOREFRONT_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "STOREFRONT_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "STOREFRONT_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5380;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "STOREFRONT_DATA_DIR";

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable for the bearer token signing secret
pub const ENV_JWT_SECRET: &str = "STOREFRONT_JWT_SECRET";

/// Default bearer token lifetime in hours
pub const DEFAULT_TOKEN_TTL_HOURS: u32 = 24;

/// Minimum accepted length of a configured signing secret
pub const MIN_JWT_SECRET_LEN: usize = 16;

/// User ID used for every request when auth is disabled
pub const DEFAULT_USER_ID: &str = "local";

/// Display name used for every request when auth is disabled
pub const DEFAULT_USER_NAME: &str = "Local Admin";

// =============================================================================
// Catalog
// =============================================================================

/// Environment variable for the default product page size
pub const ENV_PAGE_SIZE: &str = "STOREFRONT_PAGE_SIZE";

/// Products per page when the request does not override it
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Upper bound for the `limit` query parameter
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Maximum number of generic filter pairs in one listing request
pub const MAX_FILTER_PARAMS: usize = 50;

/// Maximum length of a product name
pub const MAX_PRODUCT_NAME_LEN: u64 = 100;

/// Maximum number of images attached to a product
pub const MAX_PRODUCT_IMAGES: u64 = 20;

/// Maximum length of a review comment
pub const MAX_REVIEW_COMMENT_LEN: u64 = 2000;

/// Maximum number of line items in one order
pub const MAX_ORDER_ITEMS: u64 = 100;

/// Maximum length of a user display name
pub const MAX_USER_NAME_LEN: u64 = 50;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "storefront.db";

/// Maximum connections in the SQLite pool
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// Busy timeout for SQLite connections
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite page cache size (negative = KiB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// Pages between automatic WAL checkpoints
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval for the background WAL checkpoint task
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default request body limit (1 MiB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Maximum time to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
