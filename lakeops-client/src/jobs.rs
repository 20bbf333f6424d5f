//! Job-related API endpoints
//!
//! Inventory listing (with the local cache in front), run-now and
//! run-status calls, plus the wire-to-domain decoding rules.

use std::collections::HashMap;

use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use lakeops_core::domain::job::{Job, JobRun, RunStatus};

use crate::WorkspaceClient;
use crate::cache::JobsCache;
use crate::error::Result;

/// One job record as returned by the inventory endpoint.
///
/// `name` is optional on the wire; records without one are dropped at
/// fetch time, they cannot be selected or started by name anyway.
#[derive(Debug, Deserialize)]
struct JobRecord {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RunHandle {
    run_id: u64,
}

/// Run state as reported by the workspace.
///
/// The platform reports a lifecycle state while the run progresses and a
/// result state once it is done; either or both may be absent.
#[derive(Debug, Default, Deserialize)]
struct RunStatePayload {
    #[serde(default)]
    state: Option<RunState>,
}

#[derive(Debug, Default, Deserialize)]
struct RunState {
    #[serde(default)]
    result_state: Option<String>,
    #[serde(default)]
    life_cycle_state: Option<String>,
}

/// Map a run state payload onto [`RunStatus`].
///
/// An absent or undecodable state maps to `Unknown`, which callers must
/// poll again rather than treat as a failure.
fn decode_run_status(payload: &RunStatePayload) -> RunStatus {
    let Some(state) = &payload.state else {
        return RunStatus::Unknown;
    };

    match state.result_state.as_deref() {
        Some("SUCCESS") => return RunStatus::Success,
        Some("FAILED") => return RunStatus::Failed,
        Some("CANCELED") => return RunStatus::Canceled,
        _ => {}
    }

    if state.life_cycle_state.is_some() {
        return RunStatus::Running;
    }

    RunStatus::Unknown
}

impl WorkspaceClient {
    /// Fetch the full job inventory from the workspace, bypassing the cache.
    ///
    /// Records without a name are skipped.
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let response = self.request(Method::GET, "/api/2.0/jobs").send().await?;
        let records: Vec<JobRecord> = self.handle_response(response).await?;

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let name = record.name?;
                Some(Job {
                    id: record.id,
                    name,
                    tags: record.tags,
                })
            })
            .collect())
    }

    /// Return all jobs visible to the current principal, served from the
    /// local inventory cache when it holds a fresh entry.
    ///
    /// On a miss the inventory is fetched live and written back to the
    /// cache before returning.
    pub async fn find_all_jobs(&self) -> Result<Vec<Job>> {
        let cache = JobsCache::from_env(self.profile(), self.base_url());

        if let Some(jobs) = cache.load() {
            return Ok(jobs);
        }

        debug!("jobs cache miss, fetching inventory");
        let jobs = self.list_jobs().await?;
        cache.store(&jobs)?;
        Ok(jobs)
    }

    /// Start a job and return the handle of the created run.
    pub async fn start_job(&self, job_id: u64) -> Result<JobRun> {
        let path = format!("/api/2.0/jobs/{job_id}/run");
        let response = self.request(Method::POST, &path).send().await?;
        let handle: RunHandle = self.handle_response(response).await?;

        Ok(JobRun {
            run_id: handle.run_id,
            job_id,
        })
    }

    /// Return the current status for a job run.
    pub async fn get_run_status(&self, run_id: u64) -> Result<RunStatus> {
        let path = format!("/api/2.0/runs/{run_id}");
        let response = self.request(Method::GET, &path).send().await?;
        let payload: RunStatePayload = self.handle_response(response).await?;

        Ok(decode_run_status(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(result: Option<&str>, life_cycle: Option<&str>) -> RunStatePayload {
        RunStatePayload {
            state: Some(RunState {
                result_state: result.map(String::from),
                life_cycle_state: life_cycle.map(String::from),
            }),
        }
    }

    #[test]
    fn result_state_wins_over_life_cycle() {
        assert_eq!(
            decode_run_status(&payload(Some("SUCCESS"), Some("TERMINATED"))),
            RunStatus::Success
        );
        assert_eq!(
            decode_run_status(&payload(Some("FAILED"), None)),
            RunStatus::Failed
        );
        assert_eq!(
            decode_run_status(&payload(Some("CANCELED"), Some("TERMINATED"))),
            RunStatus::Canceled
        );
    }

    #[test]
    fn life_cycle_without_result_means_running() {
        assert_eq!(
            decode_run_status(&payload(None, Some("RUNNING"))),
            RunStatus::Running
        );
        assert_eq!(
            decode_run_status(&payload(None, Some("PENDING"))),
            RunStatus::Running
        );
    }

    #[test]
    fn missing_state_is_unknown() {
        assert_eq!(
            decode_run_status(&RunStatePayload::default()),
            RunStatus::Unknown
        );
        assert_eq!(decode_run_status(&payload(None, None)), RunStatus::Unknown);
        // An unrecognized result state without lifecycle info stays unknown.
        assert_eq!(
            decode_run_status(&payload(Some("EXPLODED"), None)),
            RunStatus::Unknown
        );
    }
}
