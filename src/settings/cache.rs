use serde::Deserialize;
use super::{parse_env_var, SettingsError};

/// 응답 캐시 헤더 설정
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CacheSettings {
    /// 캐시 유효 기간 (개월). 0이면 no-cache 헤더를 사용합니다.
    #[serde(default)]
    pub months: u32,
}

impl CacheSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            months: parse_env_var("MODWARE_CACHE_MONTHS", || 0)?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.months > 0
    }
}
