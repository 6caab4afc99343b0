use sheetsync_fake::{DEFAULT_PREFIX, RecordHttp, RecordServer, RecordStore};
use tokio::signal::unix::{SignalKind, signal};

async fn shutdown_signal() {
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
            eprintln!("SIGTERM received, draining connections");
        }
        Err(e) => {
            eprintln!("failed to register SIGTERM handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let prefix =
        std::env::var("SHEETSYNC_FAKE_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());
    let bind_addr = format!("0.0.0.0:{port}");

    let handler = RecordHttp::with_prefix(RecordStore::new(), prefix);
    let server = RecordServer::bind(&bind_addr, handler)
        .await
        .unwrap_or_else(|e| {
            eprintln!("failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        });

    match server.base_url() {
        Ok(url) => eprintln!("record service listening at {url}"),
        Err(e) => eprintln!("record service listening on {bind_addr} ({e})"),
    }
    server.run(shutdown_signal()).await;
}
