use std::fmt;

use hyper::StatusCode;

use crate::middleware::jsonapi::ErrorDocument;
use crate::middleware::Response;

/// 쿼리 파라미터 처리 중 요청을 거부하는 사유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// filter 사용 시 Accept 헤더가 확장 미디어 타입과 다름
    NotAcceptable {
        value: String,
    },
    /// Content-Type 헤더가 Accept 헤더와 다름
    UnsupportedMediaType {
        value: String,
    },
    /// `name[key]` 형식이 아닌 쿼리 키
    MalformedKey {
        key: String,
    },
}

impl QueryError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::MalformedKey { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NotAcceptable { .. } => "Accept header is not acceptable",
            Self::UnsupportedMediaType { .. } => "Media type is not supported",
            Self::MalformedKey { .. } => "Invalid query parameter",
        }
    }

    /// JSON:API 에러 문서 응답으로 변환합니다.
    pub fn into_response(self) -> Response {
        ErrorDocument::single(self.status(), self.title(), self.to_string()).into_response()
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAcceptable { value } => write!(
                f,
                "Not Acceptable: The given Accept header value {} is incorrect for filter query extension",
                value
            ),
            Self::UnsupportedMediaType { value } => write!(
                f,
                "Unsupported Media Type: The given Content-Type header value {} is incorrect for filter query extension",
                value
            ),
            Self::MalformedKey { key } => {
                write!(f, "Bad Request: unable to parse query parameter {}", key)
            }
        }
    }
}

impl std::error::Error for QueryError {}
