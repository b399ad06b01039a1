//! 本地联调用的 webhook 接收端：打印收到的请求体并返回 200

use std::net::SocketAddr;

use axum::{
    Router,
    body::Bytes,
    http::{Method, StatusCode, Uri},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn receive(method: Method, uri: Uri, body: Bytes) -> (StatusCode, &'static str) {
    tracing::info!(%method, path = %uri.path(), body = %String::from_utf8_lossy(&body), "Webhook received");
    (StatusCode::OK, "OK")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = std::env::var("WEBHOOK_STUB_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(9090);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let app = Router::new().fallback(receive);

    tracing::info!("Webhook stub listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start webhook stub");
}
