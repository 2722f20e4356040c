use std::fmt;

/// 설정 로드 실패 사유
#[derive(Debug)]
pub enum SettingsError {
    /// `MODWARE_*` 환경 변수 값을 해석할 수 없음
    EnvVarInvalid {
        var_name: String,
        value: String,
        reason: String,
    },
    /// `MODWARE_CONFIG_FILE`이 가리키는 파일을 읽지 못함
    ConfigRead {
        path: String,
        source: std::io::Error,
    },
    /// TOML 문서 해석 실패. 파일에서 읽은 경우 `path`가 채워집니다.
    ConfigParse {
        path: Option<String>,
        source: toml::de::Error,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVarInvalid { var_name, value, reason } => {
                write!(f, "{var_name}={value:?} 값을 사용할 수 없음: {reason}")
            }
            Self::ConfigRead { path, source } => {
                write!(f, "modware 설정 파일 {path}을(를) 읽을 수 없음: {source}")
            }
            Self::ConfigParse { path: Some(path), source } => {
                write!(f, "modware 설정 파일 {path}의 TOML 형식 오류: {source}")
            }
            Self::ConfigParse { path: None, source } => {
                write!(f, "modware TOML 설정 형식 오류: {source}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigParse { source, .. } => Some(source),
            Self::ConfigRead { source, .. } => Some(source),
            Self::EnvVarInvalid { .. } => None,
        }
    }
}
