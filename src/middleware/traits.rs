use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Request, Response};

/// 요청 하나를 받아 응답 하나를 만들어내는 처리 단위
///
/// 체인의 마지막 핸들러, 라우터, 그리고 미들웨어가 감싼 결과물이 모두
/// 이 트레이트를 구현합니다.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// 요청을 처리하고 응답을 반환합니다.
    async fn call(&self, req: Request) -> Response;
}

/// 동시 요청 간에 공유되는 타입 소거 핸들러
pub type BoxedHandler = Arc<dyn Handler>;

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn call(&self, req: Request) -> Response {
        (**self).call(req).await
    }
}

/// 미들웨어 트레이트
///
/// 다음 핸들러(`next`)를 받아 그것을 감싼 새 핸들러를 돌려주는 팩토리입니다.
/// 미들웨어 자체는 설정 외의 상태를 갖지 않습니다.
pub trait Middleware: Send + Sync + 'static {
    /// 미들웨어의 고유 이름을 반환합니다.
    fn name(&self) -> &str;

    /// `next`를 감싼 핸들러를 생성합니다.
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

/// 클로저를 [`Handler`]로 변환하는 래퍼
pub struct HandlerFn<F>(F);

/// `async` 클로저나 함수를 [`Handler`]로 감쌉니다.
///
/// ```
/// use modware::middleware::{handler_fn, Request, text_response};
///
/// let hello = handler_fn(|_req: Request| async { text_response("hello") });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    async fn call(&self, req: Request) -> Response {
        (self.0)(req).await
    }
}

/// 이름과 클로저로 만든 미들웨어
pub struct MiddlewareFn<F> {
    name: String,
    wrap: F,
}

/// `Fn(BoxedHandler) -> BoxedHandler` 클로저를 [`Middleware`]로 감쌉니다.
pub fn middleware_fn<F>(name: impl Into<String>, wrap: F) -> MiddlewareFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    MiddlewareFn {
        name: name.into(),
        wrap,
    }
}

impl<F> Middleware for MiddlewareFn<F>
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        (self.wrap)(next)
    }
}
