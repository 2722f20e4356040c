//! JSON:API 페이지네이션 미들웨어
//!
//! `page[number]={num}&page[size]={size}` 쿼리 파라미터를 읽어
//! [`PaginationProps`]를 요청 extensions에 저장합니다. 두 키가 모두 있을
//! 때만 값을 저장하며, 그렇지 않으면 요청을 그대로 전달합니다.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{BoxedHandler, Handler, Middleware, Request, Response};

/// 페이지당 기본 항목 수
pub const DEFAULT_ENTRIES: u64 = 10;

const PAGE_NUMBER: &str = "page[number]";
const PAGE_SIZE: &str = "page[size]";

/// 페이지네이션 속성
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationProps {
    /// 전체 레코드 수 (다운스트림 핸들러가 설정)
    pub records: u64,
    /// 페이지당 항목 수
    pub entries: u64,
    /// 현재 페이지 번호
    pub current: u64,
}

impl PaginationProps {
    /// 요청에 저장된 페이지네이션 속성을 반환합니다.
    pub fn from_request(req: &Request) -> Option<&Self> {
        req.extensions().get::<Self>()
    }

    /// 현재 페이지 첫 항목의 0 기반 위치
    pub fn offset(&self) -> u64 {
        self.current.saturating_sub(1).saturating_mul(self.entries)
    }

    /// `records`를 기준으로 한 마지막 페이지 번호
    pub fn last_page(&self) -> u64 {
        let entries = if self.entries == 0 { DEFAULT_ENTRIES } else { self.entries };
        self.records.div_ceil(entries).max(1)
    }
}

/// 부호 없는 정수로 해석할 수 없는 값(음수 포함)은 0이 됩니다.
fn parse_or_zero(key: &str, value: &str) -> u64 {
    value.parse().unwrap_or_else(|_| {
        debug!(key, value, "숫자가 아닌 페이지 값은 0으로 처리");
        0
    })
}

/// 쿼리 문자열에서 페이지네이션 속성을 추출합니다.
///
/// 같은 키가 여러 번 나오면 첫 번째 값을 사용합니다.
pub fn parse_props(query: &str) -> Option<PaginationProps> {
    let mut number = None;
    let mut size = None;

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            PAGE_NUMBER if number.is_none() => number = Some(value),
            PAGE_SIZE if size.is_none() => size = Some(value),
            _ => {}
        }
    }

    match (number, size) {
        (Some(number), Some(size)) => Some(PaginationProps {
            records: 0,
            entries: parse_or_zero(PAGE_SIZE, &size),
            current: parse_or_zero(PAGE_NUMBER, &number),
        }),
        _ => None,
    }
}

/// 페이지네이션 미들웨어
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination;

impl Pagination {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for Pagination {
    fn name(&self) -> &str {
        "pagination"
    }

    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(PaginationHandler { next })
    }
}

struct PaginationHandler {
    next: BoxedHandler,
}

#[async_trait]
impl Handler for PaginationHandler {
    async fn call(&self, mut req: Request) -> Response {
        if let Some(props) = req.uri().query().and_then(parse_props) {
            req.extensions_mut().insert(props);
        }
        self.next.call(req).await
    }
}
