//! HTTP 미들웨어 모음
//!
//! 모든 미들웨어는 [`Handler`]를 감싸는 데코레이터이며 [`MiddlewareChain`]으로
//! 조합됩니다. 요청마다 계산된 값(쿼리 파라미터, 페이지 정보 등)은 요청의
//! 타입 기반 extensions에 저장되어 다운스트림 핸들러로 전달됩니다.

pub mod cache;
pub mod chain;
pub mod cors;
pub mod jsonapi;
pub mod logger;
pub mod nocache;
pub mod pagination;
pub mod query;
pub mod response;
pub mod traits;

use bytes::Bytes;
use http_body_util::Full;

pub use cache::HttpCache;
pub use chain::MiddlewareChain;
pub use cors::{CorsAdapter, CorsConfig, CorsPolicy};
pub use logger::{Clock, RequestLogger, SystemClock};
pub use nocache::NoCache;
pub use pagination::{Pagination, PaginationProps};
pub use query::{FieldSet, QueryError, QueryParams, QueryParser, FILTER_MEDIA_TYPE};
pub use response::{bytes_response, status_response, text_response};
pub use traits::{handler_fn, middleware_fn, BoxedHandler, Handler, Middleware};

/// 미들웨어가 다루는 요청 타입
pub type Request = hyper::Request<Full<Bytes>>;

/// 미들웨어가 다루는 응답 타입
pub type Response = hyper::Response<Full<Bytes>>;
