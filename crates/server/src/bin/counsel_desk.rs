use server::{
    auth::JwtConfig,
    config::{self, Settings},
    db::{self, AppState},
    health, openapi,
    repo::Store,
    storage::{Blobs, S3BlobStore},
    telemetry,
};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    config::load_config();
    let flags = config::feature_flags();

    telemetry::init_tracing(flags.telemetry);
    health::record_start_time();

    if let Err(e) = run(flags.postgres, flags.s3).await {
        tracing::error!(error = %e, "Server failed");
        telemetry::shutdown_telemetry();
        std::process::exit(1);
    }
    telemetry::shutdown_telemetry();
}

async fn run(use_postgres: bool, use_s3: bool) -> Result<(), String> {
    let jwt = JwtConfig::from_env()?;
    let settings = Settings::from_env();

    let store = if use_postgres {
        db::postgres_store().await?
    } else {
        tracing::warn!("postgres flag off; records are kept in memory only");
        Store::memory()
    };

    let blobs = if use_s3 {
        let s3 = S3BlobStore::from_env()?;
        s3.ensure_bucket().await;
        Blobs::S3(s3)
    } else {
        Blobs::memory()
    };

    let port = settings.port;
    let state = AppState {
        store,
        blobs,
        jwt,
        settings,
    };
    let app = openapi::build_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| format!("Failed to bind port {port}: {e}"))?;
    tracing::info!(port, "Listening; API docs at /docs");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {e}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
