//! Tenant identity: validated id and per-tenant schema naming.

use crate::error::AppError;
use serde::Serialize;
use std::fmt;

/// Sentinel tenant id used when a request carries no tenant segment.
pub const DEFAULT_TENANT: &str = "default";

/// Prefix for per-tenant schema names, so tenant schemas never collide with
/// `public` or `pg_*` namespaces.
const SCHEMA_PREFIX: &str = "tenant_";

/// Maximum raw id length. PostgreSQL truncates identifiers at 63 bytes; keep
/// room for the schema prefix.
const MAX_ID_LEN: usize = 63 - SCHEMA_PREFIX.len();

/// Validated tenant identifier.
///
/// The id becomes part of a PostgreSQL schema name, so the accepted alphabet
/// is deliberately narrow: lowercase ASCII letters, digits and underscores,
/// starting with a letter. A missing id is substituted with [`DEFAULT_TENANT`];
/// a malformed id is rejected, never silently replaced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(raw: &str) -> Result<Self, AppError> {
        if raw.is_empty() || raw.len() > MAX_ID_LEN {
            return Err(AppError::InvalidTenant(format!(
                "'{}' (expected 1..={} characters)",
                raw, MAX_ID_LEN
            )));
        }
        let mut chars = raw.chars();
        let first = chars.next().unwrap_or('_');
        if !first.is_ascii_lowercase() {
            return Err(AppError::InvalidTenant(format!(
                "'{}' (must start with a lowercase letter)",
                raw
            )));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(AppError::InvalidTenant(format!(
                "'{}' (allowed characters: a-z, 0-9, _)",
                raw
            )));
        }
        Ok(TenantId(raw.to_string()))
    }

    /// The sentinel tenant used outside any request context.
    pub fn default_id() -> Self {
        TenantId(DEFAULT_TENANT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Schema name backing this tenant's tables (e.g. "tenant_acme").
    pub fn schema_name(&self) -> String {
        format!("{}{}", SCHEMA_PREFIX, self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TenantId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenantId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_ids() {
        for id in ["acme", "a", "tenant42", "big_corp_2"] {
            assert!(TenantId::new(id).is_ok(), "{} should be valid", id);
        }
    }

    #[test]
    fn rejects_unsafe_ids() {
        for id in [
            "",
            "Acme",
            "42corp",
            "_private",
            "a-b",
            "bob'); DROP SCHEMA public; --",
            "name with spaces",
        ] {
            assert!(TenantId::new(id).is_err(), "{:?} should be rejected", id);
        }
    }

    #[test]
    fn rejects_over_length_ids() {
        let long = "a".repeat(MAX_ID_LEN + 1);
        assert!(TenantId::new(&long).is_err());
        let max = "a".repeat(MAX_ID_LEN);
        assert!(TenantId::new(&max).is_ok());
    }

    #[test]
    fn schema_name_is_prefixed() {
        let t = TenantId::new("acme").unwrap();
        assert_eq!(t.schema_name(), "tenant_acme");
        assert_eq!(TenantId::default_id().schema_name(), "tenant_default");
    }

    #[test]
    fn default_id_is_the_sentinel() {
        assert_eq!(TenantId::default_id().as_str(), DEFAULT_TENANT);
    }
}
