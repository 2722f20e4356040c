use std::fmt;

/// 라우트 등록 관련 에러
#[derive(Debug, PartialEq)]
pub enum RouterError {
    /// 잘못되었거나 기존 라우트와 충돌하는 경로 패턴
    InvalidRoute {
        method: String,
        path: String,
        reason: String,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidRoute { method, path, reason } =>
                write!(f, "잘못된 라우트 {} {}: {}", method, path, reason),
        }
    }
}

impl std::error::Error for RouterError {}
