//! 경로 파라미터를 지원하는 라우터 래퍼
//!
//! HTTP 메서드마다 하나의 radix tree(`matchit`)를 두고, 매칭된 경로
//! 파라미터를 요청 extensions에 [`Params`]로 저장한 뒤 일반 [`Handler`]를
//! 호출합니다. 핸들러에서는 [`params`]로 값을 꺼냅니다.
//!
//! ```
//! use modware::middleware::{handler_fn, text_response, Request};
//! use modware::router::{self, Router};
//!
//! let mut router = Router::new();
//! router
//!     .get("/genes/{id}", handler_fn(|req: Request| async move {
//!         let id = router::params(&req).and_then(|p| p.get("id")).unwrap_or("unknown");
//!         text_response(id.to_string())
//!     }))
//!     .unwrap();
//! ```

mod error;
mod params;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::header::{self, HeaderValue};
use hyper::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::middleware::{status_response, BoxedHandler, Handler, Request, Response};

pub use error::RouterError;
pub use params::Params;

/// 라우터가 저장한 경로 파라미터를 반환합니다.
///
/// 이 라우터를 거치지 않은 요청이면 `None`입니다.
pub fn params(req: &Request) -> Option<&Params> {
    req.extensions().get::<Params>()
}

/// 경로 파라미터 라우터
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// 메서드와 경로 패턴에 핸들러를 등록합니다.
    ///
    /// 경로 파라미터는 `{name}`, 나머지 경로 전체는 `{*name}` 형식을 사용합니다.
    pub fn handle(
        &mut self,
        method: Method,
        path: &str,
        handler: impl Handler,
    ) -> Result<&mut Self, RouterError> {
        self.handle_boxed(method, path, Arc::new(handler))
    }

    pub fn handle_boxed(
        &mut self,
        method: Method,
        path: &str,
        handler: BoxedHandler,
    ) -> Result<&mut Self, RouterError> {
        debug!(%method, path, "라우트 등록");
        self.routes
            .entry(method.clone())
            .or_default()
            .insert(path, handler)
            .map_err(|e| RouterError::InvalidRoute {
                method: method.to_string(),
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(self)
    }

    pub fn get(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouterError> {
        self.handle(Method::GET, path, handler)
    }

    pub fn head(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouterError> {
        self.handle(Method::HEAD, path, handler)
    }

    pub fn options(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouterError> {
        self.handle(Method::OPTIONS, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouterError> {
        self.handle(Method::POST, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouterError> {
        self.handle(Method::PUT, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouterError> {
        self.handle(Method::PATCH, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, RouterError> {
        self.handle(Method::DELETE, path, handler)
    }

    /// 요청에 맞는 핸들러와 경로 파라미터를 찾습니다.
    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Option<(BoxedHandler, Params)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        Some((Arc::clone(matched.value), Params::from_match(&matched.params)))
    }

    /// 경로가 매칭되는 다른 메서드 목록 (405 응답의 Allow 헤더용)
    fn allowed_methods(&self, path: &str) -> Vec<&str> {
        let mut allowed: Vec<&str> = self
            .routes
            .iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(method, _)| method.as_str())
            .collect();
        allowed.sort_unstable();
        allowed
    }
}

#[async_trait]
impl Handler for Router {
    async fn call(&self, mut req: Request) -> Response {
        let path = req.uri().path().to_owned();

        if let Some((handler, params)) = self.lookup(req.method(), &path) {
            req.extensions_mut().insert(params);
            return handler.call(req).await;
        }

        let allowed = self.allowed_methods(&path);
        if allowed.is_empty() {
            debug!(method = %req.method(), path, "매칭되는 라우트 없음");
            return status_response(StatusCode::NOT_FOUND);
        }

        let mut res = status_response(StatusCode::METHOD_NOT_ALLOWED);
        if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
            res.headers_mut().insert(header::ALLOW, value);
        }
        res
    }
}
