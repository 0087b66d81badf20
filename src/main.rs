use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memox9::db::{self, ProgressRepository, SqliteStore};
use memox9::state::AppState;
use memox9::trainer::Trainer;
use memox9::{config, handlers, profiling};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "memox9=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  // Initialize profiling (no-op if feature disabled)
  profiling::init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");

  let repo = ProgressRepository::new(Box::new(SqliteStore::new(pool)));
  let trainer = Trainer::init(repo, config::load_session_defaults());
  let state = AppState::new(trainer);

  let app = handlers::router(state.clone()).layer(TraceLayer::new_for_http());

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server failed to start");

  state.shutdown().await;
  profiling::shutdown();
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("Failed to listen for shutdown signal: {}", e);
    std::future::pending::<()>().await;
  }
  tracing::info!("Shutting down");
}
