use std::sync::Arc;

use hyper::header::{self, HeaderName};
use hyper::Method;
use modware::middleware::cache::{add_months, http_date};
use modware::middleware::{
    handler_fn, text_response, Handler, HttpCache, MiddlewareChain, NoCache, Request,
};
use time::OffsetDateTime;

use crate::common::request;

fn hello() -> impl Handler {
    handler_fn(|_req: Request| async { text_response("hello") })
}

#[tokio::test]
async fn test_eleven_month_cache_headers() {
    let before = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
    let cache = HttpCache::months(11).unwrap();
    let after = OffsetDateTime::now_utc();

    let handler = MiddlewareChain::new(vec![Arc::new(cache)]).then(hello());
    let res = handler.call(request(Method::GET, "/genes", &[])).await;

    // 테스트 중 초가 바뀌는 경우를 허용
    let mut candidates = Vec::new();
    let mut at = before;
    while at <= after + time::Duration::seconds(1) {
        candidates.push(http_date(add_months(at, 11).unwrap()));
        at += time::Duration::seconds(1);
    }
    let expires = res.headers()[header::EXPIRES].to_str().unwrap();
    assert!(candidates.iter().any(|c| c == expires), "unexpected Expires: {expires}");

    let expected = (add_months(before, 11).unwrap() - before).whole_seconds();
    let cache_control = res.headers()[header::CACHE_CONTROL].to_str().unwrap();
    let max_age: i64 = cache_control
        .strip_prefix("public, max-age=")
        .unwrap()
        .parse()
        .unwrap();
    assert!((max_age - expected).abs() <= 2, "max-age {max_age} vs {expected}");
}

#[tokio::test]
async fn test_no_cache_headers_for_any_request() {
    let handler = MiddlewareChain::new(vec![Arc::new(NoCache)]).then(hello());

    for (method, path) in [
        (Method::GET, "/"),
        (Method::POST, "/genes"),
        (Method::DELETE, "/genes/DDB_G0267364"),
        (Method::OPTIONS, "/strains?page[number]=2"),
    ] {
        let res = handler.call(request(method, path, &[])).await;
        let headers = res.headers();
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers[header::EXPIRES], "Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(
            headers[header::CACHE_CONTROL],
            "no-cache, no-store, no-transform, must-revalidate, private, max-age=0"
        );
        assert_eq!(headers[HeaderName::from_static("x-accel-expires")], "0");
    }
}
