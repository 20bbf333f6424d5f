//! Capability traits over the workspace API
//!
//! Each consumer of the API depends on the narrowest trait that covers its
//! concern: lookup depends on [`JobFinder`], the dispatcher on
//! [`JobStarter`], the monitors on [`RunStatusSource`] and the bulk
//! catalog operations on [`CatalogOps`]. [`WorkspaceClient`] implements
//! them all; tests substitute small stand-ins.

use async_trait::async_trait;

use lakeops_core::domain::catalog::{CatalogInfo, SchemaInfo, TableInfo};
use lakeops_core::domain::job::{Job, JobRun, RunStatus};

use crate::WorkspaceClient;
use crate::error::Result;

/// Job inventory lookup.
#[async_trait]
pub trait JobFinder: Send + Sync {
    /// Return all jobs visible to the current principal.
    async fn find_all_jobs(&self) -> Result<Vec<Job>>;
}

/// Starting job runs.
#[async_trait]
pub trait JobStarter: Send + Sync {
    /// Start the job and return the handle of the created run.
    async fn start_job(&self, job_id: u64) -> Result<JobRun>;
}

/// Querying run state.
#[async_trait]
pub trait RunStatusSource: Send + Sync {
    /// Return the current status for a job run.
    async fn get_run_status(&self, run_id: u64) -> Result<RunStatus>;
}

/// Catalog administration operations.
#[async_trait]
pub trait CatalogOps: Send + Sync {
    async fn current_username(&self) -> Result<String>;
    async fn list_catalogs(&self) -> Result<Vec<CatalogInfo>>;
    async fn list_schemas(&self, catalog: &str) -> Result<Vec<SchemaInfo>>;
    async fn list_tables(&self, catalog: &str, schema: &str) -> Result<Vec<TableInfo>>;
    async fn set_table_owner(&self, full_name: &str, owner: &str) -> Result<()>;
    async fn delete_table(&self, full_name: &str) -> Result<()>;
    async fn set_schema_owner(&self, full_name: &str, owner: &str) -> Result<()>;
    async fn delete_schema(&self, full_name: &str, force: bool) -> Result<()>;
}

#[async_trait]
impl JobFinder for WorkspaceClient {
    async fn find_all_jobs(&self) -> Result<Vec<Job>> {
        WorkspaceClient::find_all_jobs(self).await
    }
}

#[async_trait]
impl JobStarter for WorkspaceClient {
    async fn start_job(&self, job_id: u64) -> Result<JobRun> {
        WorkspaceClient::start_job(self, job_id).await
    }
}

#[async_trait]
impl RunStatusSource for WorkspaceClient {
    async fn get_run_status(&self, run_id: u64) -> Result<RunStatus> {
        WorkspaceClient::get_run_status(self, run_id).await
    }
}

#[async_trait]
impl CatalogOps for WorkspaceClient {
    async fn current_username(&self) -> Result<String> {
        WorkspaceClient::current_username(self).await
    }

    async fn list_catalogs(&self) -> Result<Vec<CatalogInfo>> {
        WorkspaceClient::list_catalogs(self).await
    }

    async fn list_schemas(&self, catalog: &str) -> Result<Vec<SchemaInfo>> {
        WorkspaceClient::list_schemas(self, catalog).await
    }

    async fn list_tables(&self, catalog: &str, schema: &str) -> Result<Vec<TableInfo>> {
        WorkspaceClient::list_tables(self, catalog, schema).await
    }

    async fn set_table_owner(&self, full_name: &str, owner: &str) -> Result<()> {
        WorkspaceClient::set_table_owner(self, full_name, owner).await
    }

    async fn delete_table(&self, full_name: &str) -> Result<()> {
        WorkspaceClient::delete_table(self, full_name).await
    }

    async fn set_schema_owner(&self, full_name: &str, owner: &str) -> Result<()> {
        WorkspaceClient::set_schema_owner(self, full_name, owner).await
    }

    async fn delete_schema(&self, full_name: &str, force: bool) -> Result<()> {
        WorkspaceClient::delete_schema(self, full_name, force).await
    }
}
