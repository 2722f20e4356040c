//! 캐시 헤더 미들웨어
//!
//! 모든 응답에 `Cache-Control: public, max-age=<초>`와 `Expires` 헤더를
//! 설정합니다. 핸들러가 같은 헤더를 직접 설정한 경우 핸들러의 값이 우선합니다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hyper::header::{self, HeaderValue};
use time::error::ComponentRange;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, UtcOffset};

use super::{BoxedHandler, Handler, Middleware, Request, Response};

/// RFC 7231 IMF-fixdate 형식으로 시각을 변환합니다.
///
/// 예: `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn http_date(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
        ))
        .unwrap_or_default()
}

/// `at`에 달력 기준 `months`개월을 더합니다. 일자는 해당 월의 마지막 날로 맞춰집니다.
pub fn add_months(at: OffsetDateTime, months: u32) -> Result<OffsetDateTime, ComponentRange> {
    let total = i64::from(u8::from(at.month())) - 1 + i64::from(months);
    let year = at.year() + (total / 12) as i32;
    let month = Month::try_from((total % 12) as u8 + 1)?;
    let day = at.day().min(time::util::days_in_year_month(year, month));
    let date = Date::from_calendar_date(year, month, day)?;
    Ok(at.replace_date(date))
}

fn header_value(value: String) -> HeaderValue {
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// 캐시 헤더 미들웨어
#[derive(Debug, Clone)]
pub struct HttpCache {
    max_age: u64,
    expires: String,
}

impl HttpCache {
    /// 만료까지 남은 기간과 만료 시각으로 생성합니다.
    pub fn new(max_age: Duration, expires: OffsetDateTime) -> Self {
        Self {
            max_age: max_age.as_secs(),
            expires: http_date(expires),
        }
    }

    /// 현재 시각으로부터 `months`개월 뒤에 만료되도록 생성합니다.
    pub fn months(months: u32) -> Result<Self, ComponentRange> {
        let now = OffsetDateTime::now_utc();
        let expires = add_months(now, months)?;
        let remaining = Duration::try_from(expires - now).unwrap_or_default();
        Ok(Self::new(remaining, expires))
    }

    /// `Cache-Control`의 max-age 값(초)
    pub fn max_age(&self) -> u64 {
        self.max_age
    }

    /// `Expires` 헤더 값
    pub fn expires(&self) -> &str {
        &self.expires
    }
}

impl Middleware for HttpCache {
    fn name(&self) -> &str {
        "cache"
    }

    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(CacheHandler {
            next,
            cache_control: header_value(format!("public, max-age={}", self.max_age)),
            expires: header_value(self.expires.clone()),
        })
    }
}

struct CacheHandler {
    next: BoxedHandler,
    cache_control: HeaderValue,
    expires: HeaderValue,
}

#[async_trait]
impl Handler for CacheHandler {
    async fn call(&self, req: Request) -> Response {
        let mut res = self.next.call(req).await;
        let headers = res.headers_mut();
        headers
            .entry(header::CACHE_CONTROL)
            .or_insert_with(|| self.cache_control.clone());
        headers
            .entry(header::EXPIRES)
            .or_insert_with(|| self.expires.clone());
        res
    }
}
