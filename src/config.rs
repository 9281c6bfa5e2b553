//! Configuration management for the library web client

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub health_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub page_size: u32,
    pub debounce_ms: u64,
    /// Delay between a successful checkout and the refreshing search
    pub refresh_delay_ms: u64,
    pub max_page_buttons: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ProfileConfig {
    /// Card used when neither storage nor the caller provides one.
    /// An empty value disables the fallback and sends the patron back to the entry page.
    pub default_card_id: String,
    pub renewal_days: i64,
    pub fine_rate: Decimal,
    pub due_soon_days: i64,
    pub logout_delay_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub catalog: CatalogConfig,
    pub profile: ProfileConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables, e.g. LIBRARY_WEB__API__TIMEOUT_MS=5000
            .add_source(
                Environment::with_prefix("LIBRARY_WEB")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("LIBRARY_API_URL").ok())?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        let url = reqwest::Url::parse(&self.api.base_url).map_err(|e| {
            AppError::Config(format!("invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AppError::Config(format!(
                "api.base_url must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.api.timeout_ms == 0 || self.api.health_timeout_ms == 0 {
            return Err(AppError::Config("request timeouts must be positive".to_string()));
        }
        if self.catalog.page_size == 0 {
            return Err(AppError::Config("catalog.page_size must be positive".to_string()));
        }
        if self.catalog.max_page_buttons == 0 {
            return Err(AppError::Config(
                "catalog.max_page_buttons must be positive".to_string(),
            ));
        }
        if self.profile.renewal_days <= 0 {
            return Err(AppError::Config("profile.renewal_days must be positive".to_string()));
        }
        if self.profile.fine_rate.is_sign_negative() {
            return Err(AppError::Config("profile.fine_rate must not be negative".to_string()));
        }
        Ok(())
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

impl CatalogConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}

impl ProfileConfig {
    pub fn logout_delay(&self) -> Duration {
        Duration::from_millis(self.logout_delay_ms)
    }
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        expand_tilde(&self.path)
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001/api".to_string(),
            timeout_ms: 10_000,
            health_timeout_ms: 5_000,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            debounce_ms: 300,
            refresh_delay_ms: 1_500,
            max_page_buttons: 5,
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            default_card_id: "1001".to_string(),
            renewal_days: 14,
            fine_rate: Decimal::new(25, 2),
            due_soon_days: 3,
            logout_delay_ms: 1_500,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "~/.library-web/storage.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
