use std::fmt;

#[derive(Debug)]
pub enum ServerError {
    /// 잘못된 바인딩 주소
    InvalidAddress { addr: String, reason: String },
    /// 리스너 바인딩 실패
    Bind { addr: String, source: std::io::Error },
    IoError(std::io::Error),
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::IoError(err)
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::InvalidAddress { addr, reason } =>
                write!(f, "잘못된 주소 '{}': {}", addr, reason),
            ServerError::Bind { addr, source } =>
                write!(f, "{} 바인딩 실패: {}", addr, source),
            ServerError::IoError(e) => write!(f, "IO Error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::IoError(e) => Some(e),
            ServerError::InvalidAddress { .. } => None,
        }
    }
}
