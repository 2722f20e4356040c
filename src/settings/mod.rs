use std::{env, fs, path::Path};
use serde::Deserialize;
use tracing::debug;

use crate::middleware::CorsConfig;

mod cache;
mod error;
pub mod logging;
mod server;

pub use cache::CacheSettings;
pub use error::SettingsError;
pub use logging::{LogFormat, LogOutput, LogSettings};
pub use server::{parse_env_var, ServerSettings};

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    /// CORS 정책 (TOML 전용)
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Settings {
    pub fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("MODWARE_CONFIG_FILE") {
            Self::from_toml_file(&config_path)
        } else {
            Self::from_env()
        }
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        debug!("설정 파일 로드: {}", path_ref.display());

        let path = path_ref.to_string_lossy().to_string();
        let content = fs::read_to_string(path_ref).map_err(|e| SettingsError::ConfigRead {
            path: path.clone(),
            source: e,
        })?;

        Self::parse_toml(&content, Some(path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse_toml(content, None)
    }

    fn parse_toml(content: &str, path: Option<String>) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| SettingsError::ConfigParse { path, source: e })?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            cache: CacheSettings::from_env()?,
            cors: CorsConfig::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub fn validate(&self) -> Result<()> {
        self.server.validate()
    }
}
