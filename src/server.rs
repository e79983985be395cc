use crate::handler::BoxError;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

/// How long in-flight connections get to finish after Ctrl-C.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) struct Server;

impl Server {
    pub async fn bind<F, S>(addr: SocketAddr, make_service: F) -> Result<(), BoxError>
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Service<Request<Incoming>, Response = Response<Full<Bytes>>, Error = Infallible>
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        let listener = TcpListener::bind(addr).await?;

        let shutdown = async {
            if let Err(e) = signal::ctrl_c().await {
                log::error!("failed to listen for ctrl_c: {}", e);
                return;
            }
            log::info!("🛑 Received Ctrl+C, shutting down server...");
        };

        Self::serve(listener, make_service, shutdown).await;
        Ok(())
    }

    /// Accepts connections until `shutdown` resolves, then waits up to
    /// `DRAIN_TIMEOUT` for in-flight connections to finish.
    pub async fn serve<F, S>(listener: TcpListener, make_service: F, shutdown: impl Future<Output = ()>)
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Service<Request<Incoming>, Response = Response<Full<Bytes>>, Error = Infallible>
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        let graceful = GracefulShutdown::new();
        let mut shutdown = std::pin::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            log::warn!("Accept error: {}", e);
                            continue;
                        }
                    };

                    let service = make_service();
                    let io = TokioIo::new(stream);

                    let conn = http1::Builder::new().serve_connection(io, service);
                    let conn = graceful.watch(conn);

                    tokio::spawn(async move {
                        if let Err(err) = conn.await {
                            log::error!("Connection error from {}: {}", peer, err);
                        }
                    });
                }
                _ = shutdown.as_mut() => {
                    break;
                }
            }
        }

        drop(listener);

        tokio::select! {
            _ = graceful.shutdown() => {
                log::info!("All connections closed");
            }
            _ = tokio::time::sleep(DRAIN_TIMEOUT) => {
                log::warn!("Timed out after {:?} waiting for connections to close", DRAIN_TIMEOUT);
            }
        }
    }
}
