use std::sync::Arc;

use async_trait::async_trait;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::Method;
use tracing::debug;

use super::config::CorsConfig;
use crate::middleware::{BoxedHandler, Handler, Middleware, Request, Response};

/// 외부에서 구성된 CORS 정책 평가기
///
/// 요청을 보고 응답에 추가할 CORS 헤더를 결정합니다. 허용 여부 판단은 전적으로
/// 정책의 몫이며 [`CorsAdapter`]는 결과를 응답에 옮겨 담기만 합니다.
pub trait CorsPolicy: Send + Sync + 'static {
    fn evaluate(&self, req: &Request) -> HeaderMap;
}

fn joined(values: &[String]) -> Option<HeaderValue> {
    HeaderValue::from_str(&values.join(", ")).ok()
}

impl CorsPolicy for CorsConfig {
    fn evaluate(&self, req: &Request) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let origin = match req.headers().get(header::ORIGIN) {
            Some(origin) => origin,
            None => return headers,
        };
        if !self.is_origin_allowed(origin.to_str().unwrap_or("")) {
            debug!(?origin, "허용되지 않은 Origin");
            return headers;
        }

        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));

        if self.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }

        let preflight = req.method() == Method::OPTIONS
            && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

        if !preflight {
            if !self.expose_headers.is_empty() {
                if let Some(value) = joined(&self.expose_headers) {
                    headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, value);
                }
            }
            return headers;
        }

        debug!(?origin, "CORS preflight 요청 처리");
        if let Some(value) = joined(&self.allow_methods) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, value);
        }
        if !self.allow_headers.is_empty() {
            if let Some(value) = joined(&self.allow_headers) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, value);
            }
        }
        if let Some(max_age) = self.max_age {
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(max_age));
        }

        headers
    }
}

/// CORS 정책을 미들웨어 형태로 맞춰주는 어댑터
///
/// 정책을 평가한 뒤 항상 다음 핸들러로 위임하고, 정책이 결정한 헤더를 응답에
/// 덮어씁니다. `Vary`는 예외로, 핸들러의 값 뒤에 덧붙입니다.
#[derive(Clone)]
pub struct CorsAdapter {
    policy: Arc<dyn CorsPolicy>,
}

impl CorsAdapter {
    pub fn new(policy: impl CorsPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    pub fn from_shared(policy: Arc<dyn CorsPolicy>) -> Self {
        Self { policy }
    }
}

impl Middleware for CorsAdapter {
    fn name(&self) -> &str {
        "cors"
    }

    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(CorsHandler {
            policy: self.policy.clone(),
            next,
        })
    }
}

struct CorsHandler {
    policy: Arc<dyn CorsPolicy>,
    next: BoxedHandler,
}

#[async_trait]
impl Handler for CorsHandler {
    async fn call(&self, req: Request) -> Response {
        let mut cors_headers = self.policy.evaluate(&req);
        let mut res = self.next.call(req).await;
        let vary = cors_headers.remove(header::VARY);
        res.headers_mut().extend(cors_headers);
        if let Some(vary) = vary {
            append_vary(res.headers_mut(), &vary);
        }
        res
    }
}

/// 핸들러가 설정한 `Vary` 토큰을 유지한 채 `value`를 덧붙입니다.
fn append_vary(headers: &mut HeaderMap, value: &HeaderValue) {
    let Ok(added) = value.to_str() else {
        return;
    };
    let mut tokens: Vec<String> = headers
        .get_all(header::VARY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens
        .iter()
        .any(|t| t == "*" || t.eq_ignore_ascii_case(added))
    {
        return;
    }
    tokens.push(added.to_string());

    if let Ok(merged) = HeaderValue::from_str(&tokens.join(", ")) {
        headers.insert(header::VARY, merged);
    }
}
