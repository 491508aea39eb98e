//! API server entry point.

use std::sync::Arc;

use api::config::{Config, LogFormat};
use domain::{Employee, Order};
use entity_store::{EntityStore, InMemoryEntityStore, PostgresEntityStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type Stores = (Arc<dyn EntityStore<Employee>>, Arc<dyn EntityStore<Order>>);

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn open_stores(config: &Config) -> Stores {
    let Some(url) = config.database_url.as_deref() else {
        tracing::info!("DATABASE_URL not set, using in-memory store");
        return (
            Arc::new(InMemoryEntityStore::<Employee>::new()),
            Arc::new(InMemoryEntityStore::<Order>::new()),
        );
    };

    let pool = entity_store::connect_pool(url, config.database_max_connections)
        .await
        .expect("failed to connect to database");
    entity_store::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    tracing::info!("connected to PostgreSQL, migrations applied");

    (
        Arc::new(PostgresEntityStore::<Employee>::new(pool.clone())),
        Arc::new(PostgresEntityStore::<Order>::new(pool)),
    )
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Open stores and preload sample rows
    let (employees, orders) = open_stores(&config).await;
    if config.seed_database {
        api::seed::load_database(employees.as_ref(), orders.as_ref())
            .await
            .expect("failed to seed database");
    }

    // 4. Build the application
    let state = api::create_state(employees, orders, &config.base_url);
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
