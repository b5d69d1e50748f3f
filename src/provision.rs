//! Lazy tenant provisioning: create a tenant's schema and tables on first use.

use crate::error::AppError;
use crate::model::TenantModel;
use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Creates the database objects a compiled tenant model describes.
///
/// Trait seam so the HTTP layer can be exercised without a live database.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create the tenant's schema, tables and indexes if absent. Idempotent;
    /// safe to call on every request for the tenant.
    async fn ensure_created(&self, model: &TenantModel) -> Result<(), AppError>;
}

/// PostgreSQL-backed provisioner running the model's DDL against a shared pool.
pub struct PgProvisioner {
    pool: PgPool,
}

impl PgProvisioner {
    pub fn new(pool: PgPool) -> Self {
        PgProvisioner { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Provisioner for PgProvisioner {
    async fn ensure_created(&self, model: &TenantModel) -> Result<(), AppError> {
        sqlx::query(&model.create_schema_sql)
            .execute(&self.pool)
            .await?;
        for table in &model.tables {
            sqlx::query(&table.create_sql).execute(&self.pool).await?;
            for sql in &table.index_sql {
                sqlx::query(sql).execute(&self.pool).await?;
            }
        }
        tracing::debug!(schema = %model.schema_name, "tenant schema ensured");
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to
/// the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Config(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await
            .map_err(AppError::Db)?;
    if !exists.0 {
        let quoted = quote_ident(&db_name);
        sqlx::query(&format!("CREATE DATABASE {}", quoted))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
        tracing::info!(database = %db_name, "created application database");
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Config("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_db_name_and_admin_url() {
        let (admin, name) =
            parse_db_name_from_url("postgres://localhost:5432/multischema").unwrap();
        assert_eq!(admin, "postgres://localhost:5432/postgres");
        assert_eq!(name, "multischema");
    }

    #[test]
    fn strips_query_params_from_db_name() {
        let (_, name) =
            parse_db_name_from_url("postgres://u:p@host/appdb?sslmode=require").unwrap();
        assert_eq!(name, "appdb");
    }
}
