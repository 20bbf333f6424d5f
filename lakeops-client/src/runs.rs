//! Run execution engine
//!
//! Starts jobs in parallel with bounded concurrency and blocks on single
//! runs until they reach a terminal state. Concurrency is deliberately
//! simple: a semaphore of `max_parallel` permits is the only admission
//! control, with no retry, backoff or rate limiting.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::debug;

use lakeops_core::domain::job::{JobRun, RunStatus};

use crate::adapter::{JobStarter, RunStatusSource};
use crate::error::{ClientError, Result};

/// Start multiple jobs in parallel.
///
/// Submits one start call per job id to a pool bounded by `max_parallel`
/// and collects the run handles as the calls complete. The order of the
/// returned runs reflects completion order and is not guaranteed to match
/// `job_ids`.
///
/// A single failing start aborts the whole dispatch: remaining in-flight
/// starts are cancelled and the error is returned instead of a partial
/// result list.
pub async fn start_jobs_parallel<A>(
    api: Arc<A>,
    job_ids: &[u64],
    max_parallel: usize,
) -> Result<Vec<JobRun>>
where
    A: JobStarter + 'static,
{
    if max_parallel == 0 {
        return Err(ClientError::InvalidRequest(
            "max_parallel must be at least 1".to_string(),
        ));
    }

    if job_ids.is_empty() {
        return Ok(Vec::new());
    }

    debug!(
        jobs = job_ids.len(),
        max_parallel, "dispatching start requests"
    );

    let semaphore = Arc::new(Semaphore::new(max_parallel));
    let mut tasks = JoinSet::new();

    for &job_id in job_ids {
        let api = Arc::clone(&api);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| ClientError::TaskFailed("start pool closed".to_string()))?;
            api.start_job(job_id).await
        });
    }

    let mut runs = Vec::with_capacity(job_ids.len());
    while let Some(joined) = tasks.join_next().await {
        let run = joined.map_err(|e| ClientError::TaskFailed(e.to_string()))??;
        runs.push(run);
    }

    Ok(runs)
}

/// Block until a run reaches a terminal state and return that state.
///
/// Polls at a fixed interval with no timeout: a run that never terminates
/// blocks forever, by design. Status query errors propagate to the caller.
pub async fn wait_for_run<A>(api: &A, run_id: u64, poll_interval: Duration) -> Result<RunStatus>
where
    A: RunStatusSource + ?Sized,
{
    loop {
        let status = api.get_run_status(run_id).await?;
        if status.is_terminal() {
            return Ok(status);
        }
        sleep(poll_interval).await;
    }
}
