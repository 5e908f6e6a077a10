use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::ValueEnum;
use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::cli::Args;

/// Application-level constants
pub const APP_NAME: &str = "Arogya";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_PREFIX: &str = "AROGYA";
pub const DEFAULT_CONFIG_FILE: &str = "arogya.toml";
pub const MEMORY_DATABASE_URL: &str = ":memory:";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("auth.enabled is true but auth.tokens is empty")]
    MissingAuthTokens,

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: String, value: String },
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub emergency: EmergencyConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            ai: AiConfig::default(),
            cors: CorsConfig::default(),
            auth: AuthConfig::default(),
            emergency: EmergencyConfig::default(),
            log: LogConfig::default(),
            seed_sample_data: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl ServerConfig {
    pub fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    pub fn default_port() -> u16 {
        8001
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the store file, or `:memory:`.
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
    #[serde(default = "DatabaseConfig::default_name")]
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            name: Self::default_name(),
        }
    }
}

impl DatabaseConfig {
    pub fn default_url() -> String {
        ".".to_string()
    }

    pub fn default_name() -> String {
        "arogya".to_string()
    }

    pub fn is_memory(&self) -> bool {
        self.url.trim() == MEMORY_DATABASE_URL
    }

    /// `<url>/<name>.sqlite3`, accepting an optional `sqlite://` scheme on the url.
    pub fn file_path(&self) -> PathBuf {
        let dir = self.url.trim();
        let dir = dir.strip_prefix("sqlite://").unwrap_or(dir);
        PathBuf::from(dir).join(format!("{}.sqlite3", self.name))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AiConfig {
    pub api_key: Option<String>,
    #[serde(default = "AiConfig::default_model")]
    pub model: String,
    #[serde(default = "AiConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "AiConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Self::default_model(),
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl AiConfig {
    pub fn default_model() -> String {
        "gemini-1.5-flash".to_string()
    }

    pub fn default_base_url() -> String {
        crate::llm::DEFAULT_BASE_URL.to_string()
    }

    pub fn default_timeout_secs() -> u64 {
        20
    }

    /// The key, unless absent or blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "CorsConfig::default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Self::default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    pub fn default_allowed_origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o.trim() == "*")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tokens: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmergencyConfig {
    #[serde(default = "EmergencyConfig::default_radius_km")]
    pub responder_radius_km: f64,
    #[serde(default = "EmergencyConfig::default_max_responders")]
    pub max_responders: usize,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            responder_radius_km: Self::default_radius_km(),
            max_responders: Self::default_max_responders(),
        }
    }
}

impl EmergencyConfig {
    pub fn default_radius_km() -> f64 {
        25.0
    }

    pub fn default_max_responders() -> usize {
        10
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_level")]
    pub level: String,
    #[serde(default = "LogConfig::default_format")]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
        }
    }
}

impl LogConfig {
    pub fn default_level() -> String {
        "info".to_string()
    }

    pub fn default_format() -> LogFormat {
        LogFormat::Text
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[serde(alias = "Pretty", alias = "PRETTY")]
    Pretty,
    #[serde(alias = "Structured", alias = "STRUCTURED", alias = "json")]
    Structured,
    #[serde(alias = "Text", alias = "TEXT")]
    Text,
}

impl AppConfig {
    /// Load from the configured file and `AROGYA_*` environment, then apply CLI overrides.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        if !PathBuf::from(&args.config_file).exists() {
            eprintln!(
                "Configuration file was not found: {}. Using environment variables.",
                args.config_file
            );
        }
        let mut config = Self::build(&args.config_file)?;

        if let Some(level) = &args.log_level {
            config.log.level = level.clone();
        }
        if let Some(format) = args.log_format {
            config.log.format = format;
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn build(path: &str) -> Result<Self, ConfigError> {
        // AROGYA_PORT style top-level values and AROGYA_DATABASE__URL style nested ones
        let env_source = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .separator("__")
            .prefix_separator("_")
            .list_separator(",")
            .with_list_parse_key("auth.tokens")
            .with_list_parse_key("cors.allowed_origins");

        let config: Self = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(env_source)
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.enabled && self.auth.tokens.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::MissingAuthTokens);
        }

        if !self.cors.allows_any() {
            for origin in &self.cors.allowed_origins {
                if HeaderValue::from_str(origin.trim()).is_err() {
                    return Err(ConfigError::InvalidParameter {
                        name: "cors.allowed_origins".into(),
                        value: origin.clone(),
                    });
                }
            }
        }

        let radius = self.emergency.responder_radius_km;
        if radius.is_nan() || radius <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "emergency.responder_radius_km".into(),
                value: self.emergency.responder_radius_km.to_string(),
            });
        }

        if self.ai.timeout_secs == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "ai.timeout_secs".into(),
                value: "0".into(),
            });
        }

        Ok(())
    }

    /// Configuration for tests: in-memory store, no AI, auth on with one token.
    pub fn for_tests(token: &str) -> Self {
        Self {
            database: DatabaseConfig {
                url: MEMORY_DATABASE_URL.into(),
                name: DatabaseConfig::default_name(),
            },
            auth: AuthConfig {
                enabled: true,
                tokens: vec![token.to_string()],
            },
            seed_sample_data: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn app_name_is_arogya() {
        assert_eq!(APP_NAME, "Arogya");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.ai.model, "gemini-1.5-flash");
        assert_eq!(config.ai.timeout_secs, 20);
        assert_eq!(config.emergency.max_responders, 10);
        assert!(config.auth.enabled);
        assert!(config.cors.allows_any());
    }

    #[test]
    fn database_file_path_joins_url_and_name() {
        let db = DatabaseConfig {
            url: "sqlite:///var/lib/arogya".into(),
            name: "clinic".into(),
        };
        assert_eq!(db.file_path(), PathBuf::from("/var/lib/arogya/clinic.sqlite3"));
        assert!(!db.is_memory());
        assert!(DatabaseConfig { url: ":memory:".into(), name: "x".into() }.is_memory());
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let ai = AiConfig {
            api_key: Some("  ".into()),
            ..AiConfig::default()
        };
        assert_eq!(ai.api_key(), None);
    }

    #[test]
    fn auth_enabled_without_tokens_is_rejected() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingAuthTokens)));
        assert!(AppConfig::for_tests("secret").validate().is_ok());
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let mut config = AppConfig::for_tests("secret");
        config.cors.allowed_origins = vec!["https://ok.example".into(), "bad\norigin".into()];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn builds_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arogya.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
seed_sample_data = false

[server]
port = 9100

[database]
url = ":memory:"

[auth]
tokens = ["field-app-token"]

[emergency]
responder_radius_km = 12.5

[log]
format = "structured"
"#
        )
        .unwrap();

        let config = AppConfig::build(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert!(config.database.is_memory());
        assert_eq!(config.auth.tokens, vec!["field-app-token"]);
        assert_eq!(config.emergency.responder_radius_km, 12.5);
        assert_eq!(config.log.format, LogFormat::Structured);
        assert!(!config.seed_sample_data);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::build("/nonexistent/arogya-test.toml").unwrap();
        assert_eq!(config.database.name, "arogya");
    }
}
