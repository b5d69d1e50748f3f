//! multischema: multi-tenant service library.
//!
//! One PostgreSQL schema per tenant, provisioned lazily on first request, with
//! compiled schema metadata held in a cache keyed by (consumer type, tenant
//! id, design-time flag) so tenants never share models.

pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod model;
pub mod openapi;
pub mod provision;
pub mod routes;
pub mod state;
pub mod tenant;

pub use cache::{ModelCache, ModelCacheKey};
pub use config::{Environment, ServiceConfig};
pub use error::AppError;
pub use model::{ModelBlueprint, TenantModel};
pub use provision::{ensure_database_exists, PgProvisioner, Provisioner};
pub use routes::{app_router, common_routes, tenant_routes};
pub use state::AppState;
pub use tenant::{TenantId, DEFAULT_TENANT};
