//! Route composition.

pub mod common;
pub mod tenant;

use crate::openapi::docs_routes;
use crate::state::AppState;
use axum::Router;

pub use common::common_routes;
pub use tenant::tenant_routes;

/// Full application router: common routes, the tenant entry route, and (in
/// development only) the OpenAPI description.
pub fn app_router(state: AppState) -> Router {
    let mut app = Router::new()
        .merge(common_routes())
        .merge(tenant_routes(state.clone()));
    if state.environment.is_development() {
        app = app.merge(docs_routes());
    }
    app
}
