//! 요청 로깅 미들웨어
//!
//! 핸들러를 감싸 응답 상태 코드, 응답 크기, 처리 시간을 측정하고 요청마다
//! 하나의 구조화된 로그 레코드를 남깁니다. 로그 형식(텍스트/JSON)과 출력
//! 대상은 생성 시점에 정해지며, 타임스탬프 형식은 `02/Jan/2006:15:04:05`
//! 스타일로 고정됩니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use hyper::body::Body as _;
use hyper::header;
use time::macros::format_description;
use tracing::{info, Dispatch, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::MakeWriter;

use super::{BoxedHandler, Handler, Middleware, Request, Response};
use crate::server::ConnectInfo;
use crate::settings::{LogFormat, LogOutput, LogSettings};

/// 처리 시간 측정을 위한 시간 원천
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn since(&self, start: Instant) -> Duration;
}

/// 실제 시스템 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn since(&self, start: Instant) -> Duration {
        start.elapsed()
    }
}

/// 로그 출력 구독자(dispatch)를 생성합니다.
pub fn build_dispatch<W>(format: LogFormat, level: Level, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let timer = UtcTime::new(format_description!(
        "[day]/[month repr:short]/[year]:[hour]:[minute]:[second]"
    ));
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(timer)
        .with_ansi(false)
        .with_writer(writer);

    match format {
        LogFormat::Json => Dispatch::new(builder.json().flatten_event(true).finish()),
        LogFormat::Text => Dispatch::new(builder.finish()),
    }
}

/// 요청 로깅 미들웨어
#[derive(Clone)]
pub struct RequestLogger {
    dispatch: Dispatch,
    name: String,
    clock: Arc<dyn Clock>,
    // 파일 출력 시 백그라운드 writer가 살아있도록 유지
    _guard: Option<Arc<WorkerGuard>>,
}

impl RequestLogger {
    /// stderr로 텍스트 형식 로그를 남깁니다.
    pub fn text() -> Self {
        Self::text_writer(std::io::stderr)
    }

    /// stderr로 JSON 형식 로그를 남깁니다.
    pub fn json() -> Self {
        Self::json_writer(std::io::stderr)
    }

    /// 주어진 writer로 텍스트 형식 로그를 남깁니다.
    pub fn text_writer<W>(writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        Self::from_dispatch(build_dispatch(LogFormat::Text, Level::INFO, writer), "web")
    }

    /// 주어진 writer로 JSON 형식 로그를 남깁니다.
    pub fn json_writer<W>(writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        Self::from_dispatch(build_dispatch(LogFormat::Json, Level::INFO, writer), "web")
    }

    /// 레벨, 형식, 애플리케이션 이름을 지정해 stderr 로거를 만듭니다.
    pub fn custom(level: Level, format: LogFormat, name: impl Into<String>) -> Self {
        Self::from_dispatch(build_dispatch(format, level, std::io::stderr), name)
    }

    /// 이미 구성된 구독자를 사용합니다.
    pub fn from_dispatch(dispatch: Dispatch, name: impl Into<String>) -> Self {
        Self {
            dispatch,
            name: name.into(),
            clock: Arc::new(SystemClock),
            _guard: None,
        }
    }

    /// 현재 기본 구독자(`tracing` 전역 설정)를 사용합니다.
    pub fn from_current(name: impl Into<String>) -> Self {
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        Self::from_dispatch(dispatch, name)
    }

    /// 로그 설정으로부터 로거를 생성합니다.
    ///
    /// 파일 출력이면 자체 appender를 엽니다. 전역 구독자와 같은 파일을 쓰려면
    /// [`LogGuard::request_logger`](crate::logging::LogGuard::request_logger)를 사용하세요.
    pub fn from_settings(settings: &LogSettings) -> Self {
        match &settings.output {
            LogOutput::Stdout => Self::from_dispatch(
                build_dispatch(settings.format, settings.level, std::io::stdout),
                "web",
            ),
            LogOutput::Stderr => Self::from_dispatch(
                build_dispatch(settings.format, settings.level, std::io::stderr),
                "web",
            ),
            LogOutput::File(path) => {
                let (writer, guard) = crate::logging::file_writer(path);
                let mut logger = Self::from_dispatch(
                    build_dispatch(settings.format, settings.level, writer),
                    "web",
                );
                logger._guard = Some(Arc::new(guard));
                logger
            }
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

impl Middleware for RequestLogger {
    fn name(&self) -> &str {
        "logger"
    }

    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(LoggerHandler {
            logger: self.clone(),
            next,
        })
    }
}

struct LoggerHandler {
    logger: RequestLogger,
    next: BoxedHandler,
}

/// 요청 시점에 기록할 정보
struct RequestInfo {
    request: String,
    method: String,
    remote: String,
    user_agent: String,
    referer: String,
}

fn header_str(req: &Request, name: header::HeaderName) -> String {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

impl RequestInfo {
    fn from_request(req: &Request) -> Self {
        // X-Real-IP를 우선 사용
        let remote = req
            .headers()
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(String::from)
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo>()
                    .map(|info| info.0.to_string())
            })
            .unwrap_or_default();

        Self {
            request: req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| req.uri().path().to_string()),
            method: req.method().to_string(),
            remote,
            user_agent: header_str(req, header::USER_AGENT),
            referer: header_str(req, header::REFERER),
        }
    }
}

#[async_trait]
impl Handler for LoggerHandler {
    async fn call(&self, req: Request) -> Response {
        let start = self.logger.clock.now();
        let info = RequestInfo::from_request(&req);

        let res = self.next.call(req).await;

        let latency = self.logger.clock.since(start);
        let size = res.body().size_hint().exact().unwrap_or(0);
        let status = res.status().as_u16();

        tracing::dispatcher::with_default(&self.logger.dispatch, || {
            info!(
                app = %self.logger.name,
                request = %info.request,
                method = %info.method,
                remote = %info.remote,
                user_agent = %info.user_agent,
                referer = %info.referer,
                status,
                took = ?latency,
                size,
                "completed handling request"
            );
        });

        res
    }
}
