//! 캐시 금지 헤더 미들웨어
//!
//! 브라우저와 프록시가 응답을 저장하지 않도록 고정된 네 개의 헤더를 설정합니다.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::header::{self, HeaderName, HeaderValue};

use super::{BoxedHandler, Handler, Middleware, Request, Response};

const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";
const NO_CACHE_CONTROL: &str = "no-cache, no-store, no-transform, must-revalidate, private, max-age=0";

/// 캐시 금지 미들웨어
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl NoCache {
    pub fn new() -> Self {
        Self
    }

    fn headers() -> [(HeaderName, HeaderValue); 4] {
        [
            (header::PRAGMA, HeaderValue::from_static("no-cache")),
            (header::EXPIRES, HeaderValue::from_static(EPOCH_HTTP_DATE)),
            (header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_CONTROL)),
            // nginx 프록시 캐시
            (HeaderName::from_static("x-accel-expires"), HeaderValue::from_static("0")),
        ]
    }
}

impl Middleware for NoCache {
    fn name(&self) -> &str {
        "nocache"
    }

    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(NoCacheHandler { next })
    }
}

struct NoCacheHandler {
    next: BoxedHandler,
}

#[async_trait]
impl Handler for NoCacheHandler {
    async fn call(&self, req: Request) -> Response {
        let mut res = self.next.call(req).await;
        let headers = res.headers_mut();
        for (name, value) in NoCache::headers() {
            headers.insert(name, value);
        }
        res
    }
}
