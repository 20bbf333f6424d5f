//! Catalog-related API endpoints

use reqwest::Method;
use serde::{Deserialize, Serialize};

use lakeops_core::domain::catalog::{CatalogInfo, SchemaInfo, TableInfo};

use crate::WorkspaceClient;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct CurrentUser {
    username: String,
}

#[derive(Debug, Serialize)]
struct SetOwner<'a> {
    owner: &'a str,
}

impl WorkspaceClient {
    /// Username of the authenticated principal.
    pub async fn current_username(&self) -> Result<String> {
        let response = self
            .request(Method::GET, "/api/2.0/catalog/current-user")
            .send()
            .await?;
        let user: CurrentUser = self.handle_response(response).await?;
        Ok(user.username)
    }

    /// List all catalogs visible to the current principal.
    pub async fn list_catalogs(&self) -> Result<Vec<CatalogInfo>> {
        let response = self
            .request(Method::GET, "/api/2.0/catalog/catalogs")
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// List the schemas of a catalog.
    pub async fn list_schemas(&self, catalog: &str) -> Result<Vec<SchemaInfo>> {
        let path = format!("/api/2.0/catalog/catalogs/{catalog}/schemas");
        let response = self.request(Method::GET, &path).send().await?;
        self.handle_response(response).await
    }

    /// List the tables of a schema.
    pub async fn list_tables(&self, catalog: &str, schema: &str) -> Result<Vec<TableInfo>> {
        let path = format!("/api/2.0/catalog/catalogs/{catalog}/schemas/{schema}/tables");
        let response = self.request(Method::GET, &path).send().await?;
        self.handle_response(response).await
    }

    /// Change the owner of a table.
    pub async fn set_table_owner(&self, full_name: &str, owner: &str) -> Result<()> {
        let path = format!("/api/2.0/catalog/tables/{full_name}/owner");
        let response = self
            .request(Method::PATCH, &path)
            .json(&SetOwner { owner })
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Drop a table.
    pub async fn delete_table(&self, full_name: &str) -> Result<()> {
        let path = format!("/api/2.0/catalog/tables/{full_name}");
        let response = self.request(Method::DELETE, &path).send().await?;
        self.handle_empty_response(response).await
    }

    /// Change the owner of a schema.
    pub async fn set_schema_owner(&self, full_name: &str, owner: &str) -> Result<()> {
        let path = format!("/api/2.0/catalog/schemas/{full_name}/owner");
        let response = self
            .request(Method::PATCH, &path)
            .json(&SetOwner { owner })
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Drop a schema, optionally cascading to its remaining contents.
    pub async fn delete_schema(&self, full_name: &str, force: bool) -> Result<()> {
        let path = format!("/api/2.0/catalog/schemas/{full_name}?force={force}");
        let response = self.request(Method::DELETE, &path).send().await?;
        self.handle_empty_response(response).await
    }
}
