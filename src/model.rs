//! Tenant-agnostic blueprint and the compiled per-tenant model.
//!
//! The blueprint is built once at startup and shared. Compiling it for a
//! tenant resolves every table into schema-qualified names and ready-to-run
//! DDL, which is the expensive step the model cache amortizes.

use crate::tenant::TenantId;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[derive(Clone, Debug)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
    /// DEFAULT expression, verbatim (e.g. "NOW()").
    pub default: Option<&'static str>,
}

#[derive(Clone, Debug)]
pub struct IndexSpec {
    pub name: &'static str,
    pub columns: Vec<&'static str>,
    pub unique: bool,
}

#[derive(Clone, Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub primary_key: &'static str,
    pub indexes: Vec<IndexSpec>,
}

/// The shared, tenant-agnostic table definitions.
#[derive(Clone, Debug)]
pub struct ModelBlueprint {
    tables: Vec<TableSpec>,
}

/// One table resolved against a tenant schema.
#[derive(Clone, Debug)]
pub struct CompiledTable {
    pub name: String,
    /// Schema-qualified, quoted name (e.g. `"tenant_acme"."documents"`).
    pub qualified_name: String,
    pub create_sql: String,
    pub index_sql: Vec<String>,
    pub columns: Vec<String>,
}

/// Compiled schema metadata for one tenant. Immutable once built; cached for
/// the process lifetime.
#[derive(Clone, Debug)]
pub struct TenantModel {
    pub tenant: TenantId,
    pub schema_name: String,
    /// True when compiled for design-time tooling rather than request serving.
    pub design_time: bool,
    pub create_schema_sql: String,
    pub tables: Vec<CompiledTable>,
}

impl ModelBlueprint {
    pub fn new(tables: Vec<TableSpec>) -> Self {
        ModelBlueprint { tables }
    }

    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    /// The application's built-in tables, created per tenant schema.
    pub fn application_default() -> Self {
        let id_col = ColumnSpec {
            name: "id",
            sql_type: "BIGSERIAL",
            nullable: false,
            default: None,
        };
        let stamp = |name: &'static str| ColumnSpec {
            name,
            sql_type: "TIMESTAMPTZ",
            nullable: false,
            default: Some("NOW()"),
        };
        ModelBlueprint::new(vec![
            TableSpec {
                name: "customers",
                columns: vec![
                    id_col.clone(),
                    ColumnSpec {
                        name: "name",
                        sql_type: "TEXT",
                        nullable: false,
                        default: None,
                    },
                    ColumnSpec {
                        name: "email",
                        sql_type: "TEXT",
                        nullable: true,
                        default: None,
                    },
                    stamp("created_at"),
                    stamp("updated_at"),
                ],
                primary_key: "id",
                indexes: vec![IndexSpec {
                    name: "customers_email_idx",
                    columns: vec!["email"],
                    unique: true,
                }],
            },
            TableSpec {
                name: "documents",
                columns: vec![
                    id_col,
                    ColumnSpec {
                        name: "customer_id",
                        sql_type: "BIGINT",
                        nullable: false,
                        default: None,
                    },
                    ColumnSpec {
                        name: "title",
                        sql_type: "TEXT",
                        nullable: false,
                        default: None,
                    },
                    ColumnSpec {
                        name: "body",
                        sql_type: "TEXT",
                        nullable: true,
                        default: None,
                    },
                    stamp("created_at"),
                    stamp("updated_at"),
                ],
                primary_key: "id",
                indexes: vec![IndexSpec {
                    name: "documents_customer_id_idx",
                    columns: vec!["customer_id"],
                    unique: false,
                }],
            },
        ])
    }

    /// Compile the blueprint for one tenant: resolve schema-qualified names
    /// and render DDL. Runtime compiles render idempotent DDL (`IF NOT
    /// EXISTS`); design-time compiles render the canonical form without it.
    pub fn compile(&self, tenant: &TenantId, design_time: bool) -> TenantModel {
        let schema_name = tenant.schema_name();
        let q_schema = quote(&schema_name);
        let if_not_exists = if design_time { "" } else { "IF NOT EXISTS " };

        let create_schema_sql = format!("CREATE SCHEMA {}{}", if_not_exists, q_schema);

        let tables = self
            .tables
            .iter()
            .map(|t| {
                let qualified_name = format!("{}.{}", q_schema, quote(t.name));
                let mut col_defs: Vec<String> = Vec::with_capacity(t.columns.len() + 1);
                for c in &t.columns {
                    let mut def = format!("{} {}", quote(c.name), c.sql_type);
                    if !c.nullable {
                        def.push_str(" NOT NULL");
                    }
                    if let Some(d) = c.default {
                        def.push_str(" DEFAULT ");
                        def.push_str(d);
                    }
                    col_defs.push(def);
                }
                col_defs.push(format!("PRIMARY KEY ({})", quote(t.primary_key)));

                let create_sql = format!(
                    "CREATE TABLE {}{} (\n  {}\n)",
                    if_not_exists,
                    qualified_name,
                    col_defs.join(",\n  ")
                );

                let index_sql = t
                    .indexes
                    .iter()
                    .map(|idx| {
                        let cols: Vec<String> = idx.columns.iter().map(|c| quote(c)).collect();
                        format!(
                            "CREATE {}INDEX {}{} ON {} ({})",
                            if idx.unique { "UNIQUE " } else { "" },
                            if_not_exists,
                            quote(idx.name),
                            qualified_name,
                            cols.join(", ")
                        )
                    })
                    .collect();

                CompiledTable {
                    name: t.name.to_string(),
                    qualified_name,
                    create_sql,
                    index_sql,
                    columns: t.columns.iter().map(|c| c.name.to_string()).collect(),
                }
            })
            .collect();

        TenantModel {
            tenant: tenant.clone(),
            schema_name,
            design_time,
            create_schema_sql,
            tables,
        }
    }
}
