use std::sync::Arc;

use hyper::{Method, StatusCode};
use modware::middleware::{
    handler_fn, text_response, Handler, MiddlewareChain, Pagination, PaginationProps, QueryParser,
    Request,
};
use modware::router::{self, Router};

use crate::common::{body_string, get, request};

fn describe(req: &Request) -> String {
    let params = router::params(req)
        .map(|p| {
            p.iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default();
    format!("{} {}", req.method(), params)
}

fn build() -> Router {
    let mut router = Router::new();
    router
        .get(
            "/organisms/{taxon}/strains/{id}",
            handler_fn(|req: Request| async move { text_response(describe(&req)) }),
        )
        .unwrap()
        .get(
            "/genes/{id}",
            handler_fn(|req: Request| async move { text_response(describe(&req)) }),
        )
        .unwrap()
        .patch(
            "/genes/{id}",
            handler_fn(|req: Request| async move { text_response(describe(&req)) }),
        )
        .unwrap()
        .get(
            "/files/{*path}",
            handler_fn(|req: Request| async move { text_response(describe(&req)) }),
        )
        .unwrap();
    router
}

#[tokio::test]
async fn test_params_match_registered_pattern() {
    let router = build();

    let res = router.call(get("/organisms/44689/strains/DBS0351367")).await;
    assert_eq!(body_string(res).await, "GET taxon=44689,id=DBS0351367");

    let res = router
        .call(request(Method::PATCH, "/genes/DDB_G0267364", &[]))
        .await;
    assert_eq!(body_string(res).await, "PATCH id=DDB_G0267364");

    let res = router.call(get("/files/images/dicty.png")).await;
    assert_eq!(body_string(res).await, "GET path=images/dicty.png");
}

#[tokio::test]
async fn test_encoded_segments_are_decoded() {
    let router = build();

    let res = router.call(get("/genes/DDB%20G1")).await;
    assert_eq!(body_string(res).await, "GET id=DDB G1");

    let res = router.call(get("/files/docs/a%2Bb.txt")).await;
    assert_eq!(body_string(res).await, "GET path=docs/a+b.txt");
}

#[tokio::test]
async fn test_unmatched_routes() {
    let router = build();

    let res = router.call(get("/plasmids/1")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = router.call(request(Method::DELETE, "/genes/1", &[])).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[hyper::header::ALLOW], "GET, PATCH");
}

#[tokio::test]
async fn test_router_behind_chain_sees_all_context() {
    let mut router = Router::new();
    router
        .get(
            "/genes/{id}",
            handler_fn(|req: Request| async move {
                let id = router::params(&req).and_then(|p| p.get("id")).unwrap_or("");
                let page = PaginationProps::from_request(&req).map(|p| p.current).unwrap_or(0);
                text_response(format!("{id}:{page}"))
            }),
        )
        .unwrap();

    let app = MiddlewareChain::new(vec![
        Arc::new(Pagination::new()),
        Arc::new(QueryParser::new()),
    ])
    .then(router);

    let res = app
        .call(get("/genes/DDB_G0267364?page[number]=3&page[size]=20&include=strains"))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, "DDB_G0267364:3");
}
