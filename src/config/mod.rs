use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
    pub chat: ChatConfig,
    pub export: ExportConfig,
}

/// Remote case service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub analyze_path: String,
    pub relevance_path: String,
    pub ask_path: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
}

/// Conversation persistence configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Durable storage key holding the serialized history.
    pub storage_key: String,
}

/// Transcript export configuration
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory used when no explicit save path is given.
    pub download_dir: PathBuf,
}

/// Storage key used by every release of the client so far.
pub const DEFAULT_CHAT_STORAGE_KEY: &str = "legal_assistant_chat_v1";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = env::var("CASE_SERVICE_BASE_URL")
            .unwrap_or_else(|_| ServiceConfig::default().base_url);
        if base_url.trim().is_empty() {
            return Err(AppError::Config {
                message: "CASE_SERVICE_BASE_URL cannot be empty".to_string(),
            });
        }

        let defaults = ServiceConfig::default();
        let service = ServiceConfig {
            base_url,
            analyze_path: env::var("CASE_SERVICE_ANALYZE_PATH").unwrap_or(defaults.analyze_path),
            relevance_path: env::var("CASE_SERVICE_RELEVANCE_PATH")
                .unwrap_or(defaults.relevance_path),
            ask_path: env::var("CASE_SERVICE_ASK_PATH").unwrap_or(defaults.ask_path),
        };

        let database = DatabaseConfig {
            path: PathBuf::from(
                env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/case_assistant.db".to_string()),
            ),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: match env::var("REQUEST_TIMEOUT_MS") {
                Ok(raw) => raw.parse().map_err(|_| AppError::Config {
                    message: format!("REQUEST_TIMEOUT_MS must be a number, got '{}'", raw),
                })?,
                Err(_) => RequestConfig::default().timeout_ms,
            },
        };

        let chat = ChatConfig {
            storage_key: env::var("CHAT_STORAGE_KEY")
                .unwrap_or_else(|_| DEFAULT_CHAT_STORAGE_KEY.to_string()),
        };

        let export = ExportConfig {
            download_dir: PathBuf::from(
                env::var("EXPORT_DOWNLOAD_DIR").unwrap_or_else(|_| "./downloads".to_string()),
            ),
        };

        Ok(Config {
            service,
            database,
            logging,
            request,
            chat,
            export,
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8001".to_string(),
            analyze_path: "/api/analyze-case".to_string(),
            relevance_path: "/api/relevance-check".to_string(),
            ask_path: "/api/ask".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Build a config for the given base URL with default endpoint paths
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        // Analysis of large document sets routinely takes minutes.
        Self { timeout_ms: 300_000 }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/case_assistant.db"),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("./downloads"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            request: RequestConfig::default(),
            chat: ChatConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CHAT_STORAGE_KEY.to_string(),
        }
    }
}
