use std::sync::Arc;

use sqlx::PgPool;

use crate::services::blob::BlobStore;

/// Shared handles carried in axum state and cloned into each request: the
/// database pool and the blob store client. No other cross-request state
/// exists.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub blob: Arc<dyn BlobStore>,
}
