use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use geofence_backend::{
    AppState,
    cache::IncidentCacheOperations,
    config::Config,
    queue::RedisDeliveryQueue,
    repository::{PgIncidentRepository, PgLocationRepository},
    routes,
    services::{ActiveIncidentSource, IncidentService, LocationService, StatsService},
    webhook::WebhookClient,
    worker::DeliveryWorker,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'geofence_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // 设置 Redis 客户端
    let redis = Arc::new(
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client"),
    );

    // 仓储、缓存与队列
    let incident_repo = Arc::new(PgIncidentRepository::new(pool.clone()));
    let location_repo = Arc::new(PgLocationRepository::new(pool));
    let incident_cache = Arc::new(IncidentCacheOperations::new(
        redis.clone(),
        config.incident_cache_key.clone(),
        config.cache_ttl(),
    ));
    let queue = Arc::new(RedisDeliveryQueue::new(
        redis,
        config.webhook_queue_key.clone(),
        config.dead_letter_queue_key.clone(),
    ));

    // 服务
    let active = Arc::new(ActiveIncidentSource::new(
        incident_repo.clone(),
        incident_cache,
    ));
    let state = AppState {
        config: config.clone(),
        incidents: Arc::new(IncidentService::new(incident_repo, active.clone())),
        locations: Arc::new(LocationService::new(
            location_repo.clone(),
            active,
            queue.clone(),
        )),
        stats: Arc::new(StatsService::new(location_repo, config.stats_window())),
    };

    // webhook 投递 worker
    let webhook_client = WebhookClient::new(config.webhook_url.clone(), config.webhook_timeout())
        .expect("Failed to build webhook client");
    let worker = DeliveryWorker::new(
        queue,
        Arc::new(webhook_client),
        config.retry_limit,
        config.retry_delay(),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    let router = routes::build_router(state);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    // 通知 worker 退出并等待延迟重试写回队列
    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_handle.await {
        tracing::error!("Webhook worker terminated abnormally: {}", e);
    }
    tracing::info!("Server stopped gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
