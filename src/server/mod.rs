//! TCP 리스너와 커넥션 처리
//!
//! 수신한 요청 바디를 `Full<Bytes>`로 모은 뒤 피어 주소를 [`ConnectInfo`]로
//! extensions에 넣고 최상위 [`Handler`]에 넘깁니다. 종료 시그널을 받으면
//! 새 커넥션 수락을 멈추고, 모든 커넥션에 graceful shutdown을 알린 뒤
//! 진행 중인 요청이 끝날 때까지 기다립니다.

mod error;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::middleware::{status_response, BoxedHandler, Handler, Response};

pub use error::ServerError;

pub type Result<T> = std::result::Result<T, ServerError>;

/// 커넥션의 피어 주소
///
/// 서버가 모든 요청의 extensions에 넣어 둡니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectInfo(pub SocketAddr);

pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// 주소에 리스너를 바인딩합니다.
    ///
    /// 포트 0을 주면 OS가 빈 포트를 고르며 [`Server::local_addr`]로 확인할 수 있습니다.
    pub async fn bind(addr: &str) -> Result<Self> {
        let socket: SocketAddr = addr.parse().map_err(|e: std::net::AddrParseError| {
            ServerError::InvalidAddress {
                addr: addr.to_string(),
                reason: e.to_string(),
            }
        })?;

        let listener = TcpListener::bind(socket).await.map_err(|e| {
            error!(error = %e, addr, "HTTP 포트 바인딩 실패");
            ServerError::Bind {
                addr: addr.to_string(),
                source: e,
            }
        })?;

        Ok(Self { listener })
    }

    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listener }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Ctrl-C 또는 SIGTERM을 받을 때까지 요청을 처리합니다.
    pub async fn serve(self, handler: impl Handler) -> Result<()> {
        self.serve_with_shutdown(handler, shutdown_signal()).await
    }

    /// `signal`이 완료될 때까지 요청을 처리합니다.
    pub async fn serve_with_shutdown<S>(self, handler: impl Handler, signal: S) -> Result<()>
    where
        S: Future<Output = ()> + Send,
    {
        let handler: BoxedHandler = Arc::new(handler);
        let addr = self.listener.local_addr()?;
        info!(%addr, "HTTP 리스너 시작");

        let mut tasks = JoinSet::new();
        let (drain_tx, drain_rx) = watch::channel(false);
        tokio::pin!(signal);

        loop {
            tokio::select! {
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "종료 시그널 수신, 커넥션 정리 중");
                    break;
                }

                res = self.listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!(error = %e, "HTTP 연결 수락 실패");
                            continue;
                        }
                    };

                    let handler = Arc::clone(&handler);
                    let io = TokioIo::new(stream);
                    let mut drain = drain_rx.clone();

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let handler = Arc::clone(&handler);
                            async move {
                                Ok::<_, std::convert::Infallible>(
                                    dispatch(handler, req, remote_addr).await,
                                )
                            }
                        });

                        let builder = ConnBuilder::new(TokioExecutor::new());
                        let conn = builder.serve_connection(io, svc);
                        tokio::pin!(conn);

                        let mut draining = false;
                        loop {
                            tokio::select! {
                                res = conn.as_mut() => {
                                    if let Err(e) = res {
                                        debug!(peer = %remote_addr, error = %e, "HTTP 연결 처리 실패");
                                    }
                                    break;
                                }
                                changed = drain.changed(), if !draining => {
                                    draining = true;
                                    // 진행 중인 요청은 마치고, 유휴 keep-alive 커넥션은 즉시 닫는다
                                    if changed.is_ok() {
                                        conn.as_mut().graceful_shutdown();
                                    }
                                }
                            }
                        }
                    });
                }

                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        let _ = drain_tx.send(true);
        while tasks.join_next().await.is_some() {}

        info!("HTTP 리스너 종료");
        Ok(())
    }
}

async fn dispatch(
    handler: BoxedHandler,
    req: hyper::Request<Incoming>,
    remote_addr: SocketAddr,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(peer = %remote_addr, error = %e, "요청 바디 읽기 실패");
            return status_response(StatusCode::BAD_REQUEST);
        }
    };

    parts.extensions.insert(ConnectInfo(remote_addr));
    handler
        .call(hyper::Request::from_parts(parts, Full::new(body)))
        .await
}

/// Ctrl-C 또는 (unix에서) SIGTERM 중 먼저 오는 시그널에 완료됩니다.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Ctrl-C 핸들러 설치 실패");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM 핸들러 설치 실패");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
}
