//! CLI configuration
//!
//! Holds the resolved workspace connection settings and normalizes the
//! host URL before any client is built.

use lakeops_client::WorkspaceClient;

/// Resolved CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Normalized workspace URL
    pub host: String,
    /// Optional API token
    pub token: Option<String>,
    /// Optional profile name, scopes the job inventory cache
    pub profile: Option<String>,
}

impl Config {
    pub fn new(host: String, token: Option<String>, profile: Option<String>) -> Self {
        Self {
            host: sanitize_host(&host),
            token,
            profile,
        }
    }

    /// Build a workspace client from this configuration.
    pub fn client(&self) -> WorkspaceClient {
        let mut client = WorkspaceClient::new(&self.host);
        if let Some(token) = &self.token {
            client = client.with_token(token);
        }
        if let Some(profile) = &self.profile {
            client = client.with_profile(profile);
        }
        client
    }
}

/// Normalize a workspace host URL.
///
/// Removes query strings (e.g. `?o=123456789`) and trailing slashes, which
/// would otherwise produce malformed API URLs.
fn sanitize_host(host: &str) -> String {
    let host = host.split_once('?').map(|(h, _)| h).unwrap_or(host);
    host.trim_end_matches('/').to_string()
}
