use std::sync::Arc;

use hyper::StatusCode;
use serde_json::json;
use tracing::{error, info};

use modware::logging::init_logging;
use modware::middleware::jsonapi::JSONAPI_MEDIA_TYPE;
use modware::middleware::{
    bytes_response, handler_fn, CorsAdapter, HttpCache, Middleware, MiddlewareChain, NoCache,
    Pagination, PaginationProps, QueryParams, QueryParser, Request, Response,
};
use modware::router::{self, Router};
use modware::server::Server;
use modware::settings::Settings;

const TOTAL_GENES: u64 = 57;

fn json_response(value: serde_json::Value) -> Response {
    let body = serde_json::to_vec(&value).unwrap_or_default();
    bytes_response(StatusCode::OK, JSONAPI_MEDIA_TYPE, body)
}

fn requested(req: &Request) -> serde_json::Value {
    match QueryParams::from_request(req) {
        Some(params) => json!({
            "include": params.includes,
            "fields": params
                .sparse_fields
                .iter()
                .map(|(k, v)| (k.clone(), v.get_all().to_vec()))
                .collect::<std::collections::HashMap<_, _>>(),
            "filter": params.filters,
        }),
        None => serde_json::Value::Null,
    }
}

async fn list_genes(req: Request) -> Response {
    let page = PaginationProps::from_request(&req).map(|p| PaginationProps {
        records: TOTAL_GENES,
        ..*p
    });
    let meta = match page {
        Some(p) => json!({
            "pagination": {
                "records": p.records,
                "size": p.entries,
                "number": p.current,
                "offset": p.offset(),
                "last": p.last_page(),
            }
        }),
        None => json!({ "pagination": null }),
    };

    json_response(json!({
        "data": [],
        "meta": meta,
        "query": requested(&req),
    }))
}

async fn get_gene(req: Request) -> Response {
    let id = router::params(&req)
        .and_then(|p| p.get("id"))
        .unwrap_or_default()
        .to_string();

    json_response(json!({
        "data": { "type": "genes", "id": id },
        "query": requested(&req),
    }))
}

fn build_router() -> Result<Router, Box<dyn std::error::Error>> {
    let mut router = Router::new();
    router
        .get("/genes", handler_fn(list_genes))?
        .get("/genes/{id}", handler_fn(get_gene))?;
    Ok(router)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let log_guard = init_logging(&settings.logging);

    let cache: Arc<dyn Middleware> = if settings.cache.is_enabled() {
        Arc::new(HttpCache::months(settings.cache.months)?)
    } else {
        Arc::new(NoCache)
    };

    let chain = MiddlewareChain::new(vec![
        Arc::new(log_guard.request_logger()),
        cache,
        Arc::new(CorsAdapter::new(settings.cors.clone())),
        Arc::new(Pagination::new()),
        Arc::new(QueryParser::new()),
    ]);
    info!(middlewares = ?chain.names(), "미들웨어 체인 구성");

    let app = chain.then(build_router()?);
    let server = Server::bind(&settings.server.http_addr).await?;

    if let Err(e) = server.serve(app).await {
        error!(error = %e, "서버 실행 실패");
        return Err(e.into());
    }
    Ok(())
}
