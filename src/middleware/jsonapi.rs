//! JSON:API 에러 문서
//!
//! ```json
//! {"errors":[{"status":"406","title":"...","detail":"...","meta":{"creator":"api error helper"}}]}
//! ```

use hyper::StatusCode;
use serde::{Deserialize, Serialize};

use super::response::bytes_response;
use super::Response;

/// JSON:API 미디어 타입
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

const ERROR_CREATOR: &str = "api error helper";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMeta {
    pub creator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub status: String,
    pub title: String,
    pub detail: String,
    pub meta: ErrorMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

impl ErrorDocument {
    /// 에러 객체 하나로 구성된 문서를 생성합니다.
    pub fn single(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorObject {
                status: status.as_u16().to_string(),
                title: title.into(),
                detail: detail.into(),
                meta: ErrorMeta {
                    creator: ERROR_CREATOR.to_string(),
                },
            }],
        }
    }

    /// 문서를 HTTP 응답으로 변환합니다.
    ///
    /// 상태 코드는 첫 번째 에러 객체의 값을 따릅니다.
    pub fn into_response(self) -> Response {
        let status = self
            .errors
            .first()
            .and_then(|e| e.status.parse::<u16>().ok())
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match serde_json::to_vec(&self) {
            Ok(body) => bytes_response(status, JSONAPI_MEDIA_TYPE, body),
            Err(_) => bytes_response(StatusCode::INTERNAL_SERVER_ERROR, JSONAPI_MEDIA_TYPE, Vec::new()),
        }
    }
}
