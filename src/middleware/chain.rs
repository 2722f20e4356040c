use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use super::traits::{handler_fn, BoxedHandler, Handler, Middleware};
use super::{Request, Response};

/// 미들웨어 체인
///
/// 한 번 만들어지면 변경되지 않습니다. [`append`](MiddlewareChain::append)와
/// [`extend`](MiddlewareChain::extend)는 항상 새 체인을 반환하며, 기존 체인과
/// 저장 공간을 공유하지 않습니다.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Arc<[Arc<dyn Middleware>]>,
}

impl MiddlewareChain {
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            middlewares: middlewares.into(),
        }
    }

    /// 미들웨어를 뒤에 붙인 새 체인을 반환합니다.
    pub fn append(&self, middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        let mut next = Vec::with_capacity(self.middlewares.len() + middlewares.len());
        next.extend(self.middlewares.iter().cloned());
        next.extend(middlewares);
        Self {
            middlewares: next.into(),
        }
    }

    /// 다른 체인의 미들웨어를 뒤에 붙인 새 체인을 반환합니다.
    pub fn extend(&self, other: &MiddlewareChain) -> Self {
        self.append(other.middlewares.to_vec())
    }

    /// 최종 핸들러로 체인을 종결합니다.
    ///
    /// 인덱스 0의 미들웨어가 가장 바깥에 위치하므로 요청 시 가장 먼저,
    /// 응답 시 가장 나중에 실행됩니다.
    pub fn then<H: Handler>(&self, terminal: H) -> BoxedHandler {
        self.then_boxed(Arc::new(terminal))
    }

    /// 클로저를 최종 핸들러로 사용해 체인을 종결합니다.
    pub fn then_fn<F, Fut>(&self, terminal: F) -> BoxedHandler
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.then(handler_fn(terminal))
    }

    pub fn then_boxed(&self, terminal: BoxedHandler) -> BoxedHandler {
        debug!(middlewares = ?self.names(), "미들웨어 체인 구성");
        self.middlewares
            .iter()
            .rev()
            .fold(terminal, |next, middleware| middleware.wrap(next))
    }

    /// 체인에 포함된 미들웨어 이름을 순서대로 반환합니다.
    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}
