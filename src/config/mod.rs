use std::env;
use std::path::PathBuf;

/// Runtime configuration, read once at startup and injected into the
/// components that need it. Request handling never consults the
/// environment directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Storage directory for uploaded files (default: "./files")
    pub files_dir: PathBuf,

    /// Shared secret gating uploads; empty disables the check
    pub upload_token: String,

    /// Shared secret gating the listing/view pages; empty disables the check
    pub index_token: String,

    /// Reject empty or corrupt zip archives at upload and download
    pub block_empty_zip: bool,

    /// Maximum accepted request body in bytes (default: 200 MB)
    pub max_content_length: usize,

    /// Listening port (default: 8080)
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            files_dir: PathBuf::from("./files"),
            upload_token: String::new(),
            index_token: String::new(),
            block_empty_zip: false,
            max_content_length: 200 * 1024 * 1024, // 200 MB
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            files_dir: env::var("FILES_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.files_dir),

            upload_token: env::var("UPLOAD_TOKEN").unwrap_or(default.upload_token),

            index_token: env::var("INDEX_TOKEN").unwrap_or(default.index_token),

            block_empty_zip: env::var("BLOCK_EMPTY_ZIP")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(default.block_empty_zip),

            max_content_length: env::var("MAX_CONTENT_LENGTH_MB")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(default.max_content_length),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),
        }
    }
}
