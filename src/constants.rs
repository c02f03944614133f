/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const CHAT_ENDPOINT: &str = "chat/";
pub const UPLOAD_ENDPOINT: &str = "upload-document/";
pub const DOCUMENTS_ENDPOINT: &str = "documents/";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120; // documents are embedded server-side
pub const STATUS_CHECK_TIMEOUT_SECS: u64 = 3;

// Upload defaults
pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
pub const STAGED_FILE_PREFIX: &str = "docchat-upload-";

// Upload response keys
pub const FILE_INFO_KEY: &str = "file_info";
pub const HASH_CODE_KEY: &str = "hash_code";
pub const EXISTING_KEY: &str = "existing";
pub const EMBEDDING_ID_KEY: &str = "embedding_id";
pub const DB_ID_KEY: &str = "db_id";

// Chat fallbacks
pub const NO_RESPONSE_TEXT: &str = "No response received";

// UI Configuration
pub const UI_REFRESH_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const UI_PAGE_SCROLL_LINES: u16 = 10;
pub const UI_EVENT_CHANNEL_CAPACITY: usize = 16;
