//! Lakeops Workspace Client
//!
//! HTTP client for the workspace API of the managed data platform, plus the
//! job-selection and run-execution engine built on top of it.
//!
//! The crate is organized around narrow capability traits ([`JobFinder`],
//! [`JobStarter`], [`RunStatusSource`], [`CatalogOps`]) so each consumer can
//! be tested with a minimal stand-in instead of a full HTTP client.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use lakeops_client::{WorkspaceClient, start_jobs_parallel, wait_for_run};
//!
//! # async fn example() -> lakeops_client::Result<()> {
//! let client = Arc::new(WorkspaceClient::new("https://workspace.example.com"));
//!
//! let runs = start_jobs_parallel(Arc::clone(&client), &[101, 102], 2).await?;
//! for run in &runs {
//!     wait_for_run(client.as_ref(), run.run_id, Duration::from_secs(5)).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cache;
pub mod catalog_ops;
pub mod error;
pub mod runs;
pub mod select;

mod catalog;
mod jobs;

// Re-export commonly used types
pub use adapter::{CatalogOps, JobFinder, JobStarter, RunStatusSource};
pub use cache::JobsCache;
pub use error::{ClientError, Result};
pub use runs::{start_jobs_parallel, wait_for_run};
pub use select::select_jobs;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// HTTP client for the workspace API
///
/// Provides methods for the endpoints the operator tool consumes:
/// - Job inventory and run-now / run-status calls
/// - Catalog, schema and table listing
/// - Ownership changes and deletions for catalog objects
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    /// Base URL of the workspace (e.g., "https://workspace.example.com")
    base_url: String,
    /// Profile name used to scope the local job inventory cache
    profile: Option<String>,
    /// Bearer token attached to every request when present
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl WorkspaceClient {
    /// Create a new workspace client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the workspace API
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            profile: None,
            token: None,
            client: Client::new(),
        }
    }

    /// Create a new workspace client with a custom HTTP client
    ///
    /// This allows configuring timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            profile: None,
            token: None,
            client,
        }
    }

    /// Attach a bearer token used for every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the profile name that scopes the local job inventory cache
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Get the base URL of the workspace
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the configured profile name, if any
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    // =============================================================================
    // Request / Response plumbing
    // =============================================================================

    /// Build a request for an API path, attaching auth when configured
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
