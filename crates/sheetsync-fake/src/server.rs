use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::pin;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use crate::http::{RecordHttp, text_response};
use crate::store::RecordStore;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// The record service bound to a listener.
pub struct RecordServer {
    listener: TcpListener,
    handler: Arc<RecordHttp>,
}

impl RecordServer {
    pub async fn bind(addr: &str, handler: RecordHttp) -> io::Result<Self> {
        Ok(Self {
            listener: TcpListener::bind(addr).await?,
            handler: Arc::new(handler),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Where a client should point, route prefix included.
    pub fn base_url(&self) -> io::Result<String> {
        Ok(format!("http://{}{}", self.local_addr()?, self.handler.prefix()))
    }

    /// Serves until `shutdown` resolves, then gives open connections
    /// [`DRAIN_TIMEOUT`] to finish.
    pub async fn run(self, shutdown: impl Future<Output = ()>) {
        let graceful = GracefulShutdown::new();
        let mut shutdown = pin!(shutdown);

        loop {
            let stream = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _)) => stream,
                    Err(e) => {
                        eprintln!("accept failed: {e}");
                        continue;
                    }
                },
                () = &mut shutdown => break,
            };

            let handler = Arc::clone(&self.handler);
            let service = service_fn(move |req| respond(Arc::clone(&handler), req));
            let conn = graceful
                .watch(http1::Builder::new().serve_connection(TokioIo::new(stream), service));
            tokio::spawn(async move {
                if let Err(e) = conn.await {
                    eprintln!("connection closed with error: {e}");
                }
            });
        }

        if tokio::time::timeout(DRAIN_TIMEOUT, graceful.shutdown())
            .await
            .is_err()
        {
            eprintln!("connections still open after {DRAIN_TIMEOUT:?}; exiting anyway");
        }
    }
}

// Unreadable bodies are answered with a 400.
async fn respond(
    handler: Arc<RecordHttp>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let response = match body.collect().await {
        Ok(collected) => handler.handle(Request::from_parts(parts, collected.to_bytes().to_vec())),
        Err(e) => text_response(
            StatusCode::BAD_REQUEST,
            &format!("could not read request body: {e}"),
        ),
    };
    Ok(response.map(|body| Full::new(Bytes::from(body))))
}

/// Serves `store` on an ephemeral localhost port from its own thread and
/// runtime, and returns the base URL to point a client at. The server lives
/// until the process exits.
pub fn start_background(store: RecordStore) -> io::Result<String> {
    let (ready_tx, ready_rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        runtime.block_on(async move {
            match RecordServer::bind("127.0.0.1:0", RecordHttp::new(store)).await {
                Ok(server) => {
                    let _ = ready_tx.send(server.base_url());
                    server.run(std::future::pending()).await;
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            }
        });
    });

    ready_rx
        .recv()
        .map_err(|_| io::Error::other("record server thread exited before binding"))?
}
