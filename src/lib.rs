//! modware는 hyper 기반 HTTP 서비스에서 재사용할 수 있는 미들웨어 모음입니다.
//!
//! # 주요 기능
//!
//! - 응답 캐시 헤더 (`HttpCache`, `NoCache`)
//! - 미들웨어 체인 조합 (`MiddlewareChain`)
//! - CORS 어댑터
//! - 구조화된 요청 로깅 (텍스트/JSON)
//! - 페이지네이션 및 JSON:API 쿼리 파라미터 파싱
//! - 경로 파라미터 라우터
//!
//! # 예제
//!
//! ```
//! use modware::middleware::{
//!     handler_fn, text_response, MiddlewareChain, NoCache, QueryParams, QueryParser, Request,
//! };
//! use std::sync::Arc;
//!
//! let chain = MiddlewareChain::new(vec![Arc::new(NoCache), Arc::new(QueryParser::new())]);
//! let handler = chain.then_fn(|req: Request| async move {
//!     let includes = QueryParams::from_request(&req)
//!         .map(|p| p.includes.join(","))
//!         .unwrap_or_default();
//!     text_response(includes)
//! });
//! # let _ = handler;
//! ```

pub mod logging;
pub mod middleware;
pub mod router;
pub mod server;
pub mod settings;
