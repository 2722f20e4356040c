use std::path::Path;

use time::macros::format_description;
use tracing::debug;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::middleware::logger::build_dispatch;
use crate::middleware::RequestLogger;
use crate::settings::{LogFormat, LogOutput, LogSettings};

/// [`init_logging`]이 연 출력 자원
///
/// 파일 출력이면 백그라운드 writer를 소유하므로 프로그램이 끝날 때까지
/// 유지해야 남은 로그가 모두 기록됩니다.
#[must_use]
pub struct LogGuard {
    settings: LogSettings,
    file: Option<NonBlocking>,
    _worker: Option<WorkerGuard>,
}

impl LogGuard {
    /// 전역 구독자와 같은 출력 대상으로 쓰는 요청 로거를 만듭니다.
    ///
    /// 파일 출력이면 이미 열린 appender를 공유하며 파일을 다시 열지 않습니다.
    pub fn request_logger(&self) -> RequestLogger {
        match &self.file {
            Some(writer) => RequestLogger::from_dispatch(
                build_dispatch(self.settings.format, self.settings.level, writer.clone()),
                "web",
            ),
            None => RequestLogger::from_settings(&self.settings),
        }
    }
}

fn open_output(settings: &LogSettings) -> (BoxMakeWriter, LogGuard) {
    let mut guard = LogGuard {
        settings: settings.clone(),
        file: None,
        _worker: None,
    };

    let writer = match &settings.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File(path) => {
            let (writer, worker) = file_writer(path);
            guard.file = Some(writer.clone());
            guard._worker = Some(worker);
            BoxMakeWriter::new(writer)
        }
    };

    (writer, guard)
}

/// 전역 로깅 구독자를 설치합니다.
///
/// `RUST_LOG`가 설정되어 있으면 그 필터가 우선합니다. 요청 로거는
/// [`LogGuard::request_logger`]로 만들어야 같은 출력 대상을 공유합니다.
pub fn init_logging(settings: &LogSettings) -> LogGuard {
    let (writer, guard) = open_output(settings);

    let filter = EnvFilter::builder()
        .with_default_directive(settings.level.into())
        .from_env_lossy();
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
    ));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_target(true)
        .with_writer(writer);

    let result = match settings.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_ansi(matches!(settings.output, LogOutput::Stdout)).try_init(),
    };

    // 이미 설치된 구독자가 있으면 그대로 사용
    if let Err(e) = result {
        debug!(error = %e, "전역 로깅 구독자가 이미 설치됨");
    }

    guard
}

/// 파일로 쓰는 논블로킹 writer를 생성합니다.
pub fn file_writer(path: impl AsRef<Path>) -> (NonBlocking, WorkerGuard) {
    let path = path.as_ref();
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "modware.log".into());

    let appender = tracing_appender::rolling::never(directory, file_name);
    tracing_appender::non_blocking(appender)
}
