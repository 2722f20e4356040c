use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use super::SettingsError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ServerSettings {
    /// HTTP 리스너 주소 (기본값: 0.0.0.0:8080)
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(name: &str, default: F) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Self {
            http_addr: env::var("MODWARE_HTTP_ADDR").unwrap_or_else(|_| default_http_addr()),
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.http_addr
            .parse::<SocketAddr>()
            .map_err(|e| SettingsError::EnvVarInvalid {
                var_name: "MODWARE_HTTP_ADDR".to_string(),
                value: self.http_addr.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
        }
    }
}
