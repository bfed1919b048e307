//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_DEPARTMENTS};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub protocol: ProtocolSettings,
    #[serde(default)]
    pub portal: PortalSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Read the client address from `X-Forwarded-For`/`X-Real-IP`. Only
    /// enable behind a reverse proxy that overwrites those headers.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/portal".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

fn default_access_token_expiry() -> i64 {
    DEFAULT_ACCESS_TOKEN_EXPIRY
}

/// How daily protocol sequence numbers are obtained.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SequencerKind {
    /// Count today's messages, then insert. Racy under concurrent submits.
    #[default]
    Counting,
    /// Single conditional increment on a per-day counter row.
    Atomic,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProtocolSettings {
    #[serde(default)]
    pub sequencer: SequencerKind,
}

/// Download format of the submission receipt.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptFormat {
    #[default]
    Pdf,
    Text,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default = "default_admin_department")]
    pub department: String,
}

fn default_admin_department() -> String {
    "Diretoria".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortalSettings {
    #[serde(default = "default_departments")]
    pub departments: Vec<String>,
    #[serde(default)]
    pub hard_delete_employees: bool,
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
    #[serde(default)]
    pub receipt_format: ReceiptFormat,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            departments: default_departments(),
            hard_delete_employees: false,
            bootstrap_admin: None,
            receipt_format: ReceiptFormat::Pdf,
        }
    }
}

fn default_departments() -> Vec<String> {
    DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect()
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "portal-server")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }
}
