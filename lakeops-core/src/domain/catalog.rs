//! Catalog domain types
//!
//! Lightweight representations of catalog objects plus the per-item
//! outcome records produced by bulk ownership and deletion operations.
//! Free of SDK types and CLI concerns.

use serde::{Deserialize, Serialize};

/// A catalog visible to the current principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub name: String,
    pub owner: Option<String>,
}

/// A schema inside a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// `catalog.schema`
    pub full_name: String,
    pub name: String,
    pub catalog_name: String,
    pub owner: Option<String>,
}

/// A table inside a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// `catalog.schema.table`
    pub full_name: String,
    pub owner: Option<String>,
    /// e.g. MANAGED, EXTERNAL, VIEW
    pub table_type: Option<String>,
}

/// Outcome of a single table delete attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDeleteOutcome {
    pub table: String,
    pub owner_set: bool,
    pub deleted: bool,
    pub error: Option<String>,
}

/// Outcome of an ownership change for one catalog object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerChangeOutcome {
    pub full_name: String,
    pub new_owner: String,
    pub ok: bool,
    pub error: Option<String>,
}

/// Report for a schema deletion, including its table sweep.
#[derive(Debug, Clone)]
pub struct SchemaDeleteReport {
    pub schema: String,
    pub owner: Option<String>,
    pub tables: Vec<String>,
    pub table_results: Vec<TableDeleteOutcome>,
    pub schema_deleted: bool,
}
