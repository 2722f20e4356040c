//! CORS 어댑터
//!
//! CORS 정책 평가기를 미들웨어 체인에 끼울 수 있도록 감쌉니다.

mod config;
mod middleware;

pub use config::CorsConfig;
pub use middleware::{CorsAdapter, CorsPolicy};
