use app_state::AppSettings;
use axum::extract::FromRef;
use common_services::storage::UploadStore;
use matching::MatchingEngine;
use oracle::DescriptionOracle;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub engine: Arc<MatchingEngine>,
    pub description_oracle: Arc<dyn DescriptionOracle>,
    pub uploads: UploadStore,
    pub settings: AppSettings,
}

impl FromRef<ApiState> for SqlitePool {
    fn from_ref(state: &ApiState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiState> for UploadStore {
    fn from_ref(state: &ApiState) -> Self {
        state.uploads.clone()
    }
}

impl FromRef<ApiState> for AppSettings {
    fn from_ref(state: &ApiState) -> Self {
        state.settings.clone()
    }
}
