//! Resolve the tenant id from the request: path segment, then header, then
//! the default tenant.

use crate::error::AppError;
use crate::tenant::TenantId;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;

/// Header consulted when the route has no `tenant_id` path segment.
pub const TENANT_ID_HEADER: &str = "X-Tenant-ID";

/// Extractor for the request's tenant.
///
/// Absence of a tenant id resolves to [`TenantId::default_id`]; a present but
/// malformed id is rejected with 400 rather than silently replaced.
#[derive(Clone, Debug)]
pub struct Tenant(pub TenantId);

#[async_trait]
impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Path(p)| p)
            .unwrap_or_default();
        let from_path = params.get("tenant_id").map(String::as_str);
        let from_header = parts
            .headers
            .get(TENANT_ID_HEADER)
            .and_then(|v| v.to_str().ok());

        let raw = from_path
            .or(from_header)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match raw {
            Some(raw) => TenantId::new(raw).map(Tenant),
            None => Ok(Tenant(TenantId::default_id())),
        }
    }
}
