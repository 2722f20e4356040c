//! JSON:API 쿼리 파라미터 미들웨어
//!
//! 다음 쿼리 파라미터를 해석합니다.
//!
//! - include: `/url?include=foo,bar,baz`
//! - fields (sparse fieldsets): `/url?fields[articles]=title,body&fields[people]=name`
//! - filter: `/url?filter[name]=foo&filter[country]=argentina`
//!
//! include와 fields는 JSON:API 표준이고 filter는 dictybase 확장입니다.
//! filter를 사용하려면 `Accept`와 `Content-Type` 헤더가 모두
//! [`FILTER_MEDIA_TYPE`]이어야 하며, 그렇지 않으면 406 또는 415 응답으로
//! 체인이 중단됩니다.

mod error;
mod params;

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use hyper::header;
use regex_lite::Regex;
use tracing::debug;

use super::{BoxedHandler, Handler, Middleware, Request, Response};

pub use error::QueryError;
pub use params::{FieldSet, QueryParams};

/// filter 확장을 사용하기 위한 미디어 타입
pub const FILTER_MEDIA_TYPE: &str =
    r#"application/vnd.api+json; supported-ext="dictybase/filtering-resouce""#;

fn bracket_key() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\[(\w+)\]$").expect("valid bracket key pattern"))
}

/// `name[key]` 형식의 키에서 괄호 안의 값을 추출합니다.
fn bracketed(key: &str) -> Result<String, QueryError> {
    bracket_key()
        .captures(key)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| QueryError::MalformedKey {
            key: key.to_string(),
        })
}

fn header_value<'a>(req: &'a Request, name: header::HeaderName) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// filter 사용을 위한 콘텐츠 협상 조건을 검사합니다.
fn check_filter_headers(req: &Request) -> Result<(), QueryError> {
    let accept = header_value(req, header::ACCEPT);
    if accept != FILTER_MEDIA_TYPE {
        return Err(QueryError::NotAcceptable {
            value: accept.to_string(),
        });
    }

    let content_type = header_value(req, header::CONTENT_TYPE);
    if content_type != accept {
        return Err(QueryError::UnsupportedMediaType {
            value: content_type.to_string(),
        });
    }

    Ok(())
}

/// 요청의 쿼리 문자열을 해석합니다.
///
/// 키는 입력 순서대로 처리되며 같은 키가 반복되면 마지막 값이 남습니다.
/// 해석할 파라미터가 하나도 없으면 `Ok(None)`을 반환합니다.
pub fn parse_request(req: &Request) -> Result<Option<QueryParams>, QueryError> {
    let query = match req.uri().query() {
        Some(query) => query,
        None => return Ok(None),
    };

    let mut params = QueryParams::default();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key.starts_with("filter") {
            check_filter_headers(req)?;
            params.insert_filter(bracketed(&key)?, value.into_owned());
        } else if key.starts_with("fields") {
            params.insert_fields(bracketed(&key)?, &value);
        } else if key == "include" {
            params.set_includes(&value);
        }
    }

    Ok(params.is_populated().then_some(params))
}

/// JSON:API 쿼리 파라미터 미들웨어
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for QueryParser {
    fn name(&self) -> &str {
        "query"
    }

    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(QueryHandler { next })
    }
}

struct QueryHandler {
    next: BoxedHandler,
}

#[async_trait]
impl Handler for QueryHandler {
    async fn call(&self, mut req: Request) -> Response {
        match parse_request(&req) {
            Ok(Some(params)) => {
                req.extensions_mut().insert(params);
                self.next.call(req).await
            }
            Ok(None) => self.next.call(req).await,
            Err(e) => {
                debug!(error = %e, uri = %req.uri(), "쿼리 파라미터 거부");
                e.into_response()
            }
        }
    }
}
