//! Tenant entry route: lazily provisions the tenant's schema and echoes the
//! tenant id.

use crate::error::AppError;
use crate::extractors::Tenant;
use crate::state::AppState;
use axum::{extract::State, routing::get, Router};

/// GET /{tenant_id}: fetch (or compile) the tenant's model, ensure its schema
/// and tables exist, and return the tenant id as plain text.
///
/// The model cache is keyed by (consumer type, tenant, design-time flag), so
/// the first request for a tenant compiles its model and every later request
/// reuses it.
#[utoipa::path(
    get,
    path = "/{tenant_id}",
    params(
        ("tenant_id" = String, Path, description = "Tenant identifier (lowercase letters, digits, underscores)")
    ),
    responses(
        (status = 200, description = "Tenant id echoed back as plain text", body = String),
        (status = 400, description = "Malformed tenant id"),
        (status = 500, description = "Provisioning failed")
    )
)]
pub async fn enter_tenant(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> Result<String, AppError> {
    let model = state
        .models
        .get_or_compile::<AppState>(&state.blueprint, &tenant, false)?;
    state.provisioner.ensure_created(&model).await?;
    tracing::info!(tenant = %tenant, schema = %model.schema_name, "tenant request served");
    Ok(tenant.to_string())
}

/// GET / resolves to the default tenant via the same extractor path.
pub fn tenant_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(enter_tenant))
        .route("/:tenant_id", get(enter_tenant))
        .with_state(state)
}
