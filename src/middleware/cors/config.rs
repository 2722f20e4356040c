use serde::{Deserialize, Serialize};

/// 설정 기반 CORS 정책
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorsConfig {
    /// 허용할 Origin 목록 (`*`는 모든 Origin)
    #[serde(default)]
    pub allow_origins: Vec<String>,

    /// 허용할 HTTP 메서드 목록
    #[serde(default = "default_methods")]
    pub allow_methods: Vec<String>,

    /// 허용할 헤더 목록
    #[serde(default)]
    pub allow_headers: Vec<String>,

    /// 노출할 헤더 목록
    #[serde(default)]
    pub expose_headers: Vec<String>,

    /// preflight 요청 캐시 시간 (초)
    #[serde(default)]
    pub max_age: Option<u32>,

    /// credentials 허용 여부
    #[serde(default)]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            allow_methods: default_methods(),
            allow_headers: Vec::new(),
            expose_headers: Vec::new(),
            max_age: None,
            allow_credentials: false,
        }
    }
}

fn default_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl CorsConfig {
    /// 모든 Origin을 허용하는 정책
    pub fn permissive() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            ..Self::default()
        }
    }

    /// Origin 검증
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allow_origins
            .iter()
            .any(|allowed| allowed == "*" || allowed == origin)
    }
}
