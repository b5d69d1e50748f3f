//! OpenAPI description, mounted in development only.

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "multischema",
        description = "Multi-tenant service with one PostgreSQL schema per tenant"
    ),
    paths(crate::routes::tenant::enter_tenant)
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /api-docs/openapi.json. Callers mount this only in development.
pub fn docs_routes() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}
