use std::sync::{Arc, Mutex};

use hyper::header::{self, HeaderName};
use hyper::{Method, StatusCode};
use modware::middleware::jsonapi::ErrorDocument;
use modware::middleware::{
    handler_fn, text_response, BoxedHandler, Handler, MiddlewareChain, QueryParams, QueryParser,
    Request, Response, FILTER_MEDIA_TYPE,
};
use serde_json::json;

use crate::common::{body_string, request};

/// 핸들러가 호출되었다면 받은 QueryParams를 기록
type Seen = Arc<Mutex<Option<Option<QueryParams>>>>;

fn app(seen: Seen) -> BoxedHandler {
    MiddlewareChain::new(vec![Arc::new(QueryParser::new())]).then(handler_fn(
        move |req: Request| {
            let seen = seen.clone();
            async move {
                *seen.lock().unwrap() = Some(QueryParams::from_request(&req).cloned());
                text_response("ok")
            }
        },
    ))
}

fn filter_headers() -> Vec<(HeaderName, &'static str)> {
    vec![
        (header::ACCEPT, FILTER_MEDIA_TYPE),
        (header::CONTENT_TYPE, FILTER_MEDIA_TYPE),
    ]
}

#[tokio::test]
async fn test_filters_with_negotiated_headers() {
    let seen: Seen = Arc::default();
    let res = app(seen.clone())
        .call(request(
            Method::GET,
            "/genes?filter[name]=foo&filter[country]=argentina",
            &filter_headers(),
        ))
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let params = seen.lock().unwrap().clone().unwrap().unwrap();
    assert!(params.has_filters);
    assert_eq!(params.filters.len(), 2);
    assert_eq!(params.filters["name"], "foo");
    assert_eq!(params.filters["country"], "argentina");
    assert!(!params.has_includes);
    assert!(!params.has_sparse_fields);
}

#[tokio::test]
async fn test_filters_without_headers_are_not_acceptable() {
    let seen: Seen = Arc::default();
    let res = app(seen.clone())
        .call(request(
            Method::GET,
            "/genes?filter[name]=foo&filter[country]=argentina",
            &[],
        ))
        .await;

    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/vnd.api+json");
    let doc: ErrorDocument = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(doc.errors.len(), 1);
    assert_eq!(doc.errors[0].status, "406");
    assert_eq!(doc.errors[0].meta.creator, "api error helper");
    assert!(seen.lock().unwrap().is_none(), "handler must not run");
}

#[tokio::test]
async fn test_filters_with_mismatched_content_type() {
    let seen: Seen = Arc::default();
    let res = app(seen.clone())
        .call(request(
            Method::GET,
            "/genes?filter[name]=foo",
            &[
                (header::ACCEPT, FILTER_MEDIA_TYPE),
                (header::CONTENT_TYPE, "application/vnd.api+json"),
            ],
        ))
        .await;

    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(seen.lock().unwrap().is_none());
}

#[tokio::test]
async fn test_sparse_fieldsets() {
    let seen: Seen = Arc::default();
    app(seen.clone())
        .call(request(
            Method::GET,
            "/genes?fields[name]=lola,bantu&fields[blogs]=title",
            &[],
        ))
        .await;

    let params = seen.lock().unwrap().clone().unwrap().unwrap();
    assert!(params.has_sparse_fields);
    assert_eq!(params.sparse_fields.len(), 2);
    assert_eq!(params.sparse_fields["name"].get_all(), ["lola", "bantu"]);
    assert_eq!(params.sparse_fields["blogs"].get_all(), ["title"]);
    assert!(params.sparse_fields["name"].contains("bantu"));
    assert!(!params.has_filters);
}

#[tokio::test]
async fn test_includes_keep_order() {
    let seen: Seen = Arc::default();
    app(seen.clone())
        .call(request(Method::GET, "/genes?include=foo,bar,baz", &[]))
        .await;

    let params = seen.lock().unwrap().clone().unwrap().unwrap();
    assert!(params.has_includes);
    assert_eq!(params.includes, vec!["foo", "bar", "baz"]);
}

#[tokio::test]
async fn test_unrelated_query_attaches_nothing() {
    for uri in ["/genes", "/genes?sort=name&page[number]=2", "/genes?included=foo"] {
        let seen: Seen = Arc::default();
        let res = app(seen.clone()).call(request(Method::GET, uri, &[])).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(*seen.lock().unwrap(), Some(None), "uri {uri}");
    }
}

#[tokio::test]
async fn test_malformed_fields_key_is_bad_request() {
    let seen: Seen = Arc::default();
    let res = app(seen.clone())
        .call(request(Method::GET, "/genes?fields=title", &[]))
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(seen.lock().unwrap().is_none());
}

async fn error_body(res: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(res).await).unwrap()
}

#[tokio::test]
async fn test_not_acceptable_document() {
    let res = app(Arc::default())
        .call(request(Method::GET, "/genes?filter[name]=foo", &[]))
        .await;

    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);
    // Accept 헤더가 없으면 값 자리가 비어 공백이 두 번 들어간다
    assert_eq!(
        error_body(res).await,
        json!({
            "errors": [{
                "status": "406",
                "title": "Accept header is not acceptable",
                "detail": "Not Acceptable: The given Accept header value  is incorrect for filter query extension",
                "meta": { "creator": "api error helper" }
            }]
        })
    );
}

#[tokio::test]
async fn test_unsupported_media_type_document() {
    let res = app(Arc::default())
        .call(request(
            Method::GET,
            "/genes?filter[name]=foo",
            &[
                (header::ACCEPT, FILTER_MEDIA_TYPE),
                (header::CONTENT_TYPE, "application/json"),
            ],
        ))
        .await;

    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/vnd.api+json");
    assert_eq!(
        error_body(res).await,
        json!({
            "errors": [{
                "status": "415",
                "title": "Media type is not supported",
                "detail": "Unsupported Media Type: The given Content-Type header value application/json is incorrect for filter query extension",
                "meta": { "creator": "api error helper" }
            }]
        })
    );
}

#[tokio::test]
async fn test_malformed_filter_key_document() {
    let seen: Seen = Arc::default();
    let res = app(seen.clone())
        .call(request(Method::GET, "/genes?filter[name=foo", &filter_headers()))
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_body(res).await,
        json!({
            "errors": [{
                "status": "400",
                "title": "Invalid query parameter",
                "detail": "Bad Request: unable to parse query parameter filter[name",
                "meta": { "creator": "api error helper" }
            }]
        })
    );
    assert!(seen.lock().unwrap().is_none());
}
