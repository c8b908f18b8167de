use crate::api_state::ApiState;
use crate::create_router;
use app_state::AppSettings;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, header};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use common_services::database::get_db_pool;
use common_services::storage::UploadStore;
use matching::MatchingEngine;
use oracle::{DescriptionOracle, LlmOracle, VisualOracle};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub async fn serve(settings: AppSettings) -> Result<()> {
    // --- Server Startup ---
    info!("🚀 Initializing server...");
    let uploads = UploadStore::new(&settings.storage);
    uploads.ensure_root().await.wrap_err_with(|| {
        format!(
            "Could not create upload folder {}",
            settings.storage.upload_folder.display()
        )
    })?;
    let pool = get_db_pool(&settings.database)
        .await
        .wrap_err("Could not open the item database")?;
    let api_state = build_state(pool, uploads, settings.clone())?;

    let app = create_app(api_state);
    let listen_address = format!("{}:{}", settings.api.host, settings.api.port);
    let listener = tokio::net::TcpListener::bind(&listen_address).await?;

    info!("📚 Docs available at http://{listen_address}/docs");
    info!("✅ Server listening on http://{listen_address}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Wire the oracles and the matching engine together.
pub fn build_state(
    pool: SqlitePool,
    uploads: UploadStore,
    settings: AppSettings,
) -> Result<ApiState> {
    let description_oracle: Arc<dyn DescriptionOracle> =
        Arc::new(LlmOracle::from_settings(&settings.oracles.description)?);
    let visual_oracle: Arc<dyn VisualOracle> =
        Arc::new(LlmOracle::from_settings(&settings.oracles.visual)?);
    let engine = MatchingEngine::new(
        description_oracle.clone(),
        visual_oracle,
        settings.matching.clone(),
        uploads.root().to_path_buf(),
    );
    Ok(ApiState {
        pool,
        engine: Arc::new(engine),
        description_oracle,
        uploads,
        settings,
    })
}

/// The router with every middleware layer and the static upload folder.
pub fn create_app(api_state: ApiState) -> Router {
    let api_settings = &api_state.settings.api;

    // --- CORS Configuration ---
    let allowed_origins: Vec<HeaderValue> = api_settings
        .allowed_origins
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(hv) => Some(hv),
            Err(e) => {
                error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods(cors::Any)
        .allow_origin(allowed_origins)
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::USER_AGENT,
            header::CACHE_CONTROL,
            header::PRAGMA,
        ]);

    // Stored item images
    let serve_dir = ServeDir::new(&api_state.settings.storage.upload_folder);
    let max_upload_bytes = api_settings.max_upload_bytes;

    create_router(api_state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http().on_request(()))
        .layer(cors)
        .layer(CompressionLayer::new())
        .nest_service("/uploads", serve_dir)
}
