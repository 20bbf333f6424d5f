//! Multi-run progress monitor
//!
//! Polls a set of runs to completion with one synchronous sweep per tick:
//! every unfinished run is queried, its displayed state updated, and runs
//! that reached a terminal status are retired from polling. Failures
//! (FAILED or CANCELED) are tallied exactly once, at the tick where the
//! run first turns terminal. The loop only returns once every run is
//! terminal, so a hung remote run blocks until the process is interrupted.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use colored::*;
use tokio::time::sleep;
use tracing::warn;

use lakeops_client::RunStatusSource;
use lakeops_core::domain::job::{JobRun, RunStatus};

use crate::output::colorize_status;

/// Display width of the per-run job label.
const LABEL_WIDTH: usize = 24;

/// Poll all runs until each reaches a terminal state.
///
/// Shows a line per run whenever its status changes and an overall
/// `done/total` tally per tick. `job_names` is display-only: when it
/// resolves a job id the run is labeled with the job name, otherwise with
/// the bare id.
///
/// A failing status query counts as `Unknown` for that tick and the run
/// is retried on the next sweep; runs are never dropped from tracking.
///
/// Returns `(run, final_status)` pairs in the same order as `runs`,
/// regardless of completion order.
pub async fn wait_for_runs_with_progress<A>(
    api: &A,
    runs: &[JobRun],
    poll_interval: Duration,
    job_names: Option<&HashMap<u64, String>>,
) -> Vec<(JobRun, RunStatus)>
where
    A: RunStatusSource + ?Sized,
{
    let mut statuses: HashMap<u64, RunStatus> = runs
        .iter()
        .map(|r| (r.run_id, RunStatus::Pending))
        .collect();
    let mut shown: HashMap<u64, RunStatus> = HashMap::new();
    let mut finished: HashSet<u64> = HashSet::new();
    let mut failures = 0usize;

    while finished.len() < runs.len() {
        for run in runs {
            if finished.contains(&run.run_id) {
                continue;
            }

            let status = match api.get_run_status(run.run_id).await {
                Ok(status) => status,
                Err(e) => {
                    warn!(run_id = run.run_id, error = %e, "status poll failed, retrying next tick");
                    RunStatus::Unknown
                }
            };
            statuses.insert(run.run_id, status);

            if shown.insert(run.run_id, status) != Some(status) {
                let label = format_run_label(run.job_id, job_names, LABEL_WIDTH);
                println!(
                    "  {} {} {}",
                    label,
                    format!("run_id={}", run.run_id).dimmed(),
                    colorize_status(status)
                );
            }

            if status.is_terminal() {
                finished.insert(run.run_id);
                if matches!(status, RunStatus::Failed | RunStatus::Canceled) {
                    failures += 1;
                }
            }
        }

        println!(
            "{}",
            format!(
                "Overall: {}/{} finished, failures={}",
                finished.len(),
                runs.len(),
                failures
            )
            .bold()
        );

        if finished.len() < runs.len() {
            sleep(poll_interval).await;
        }
    }

    runs.iter()
        .map(|r| {
            let status = statuses
                .get(&r.run_id)
                .copied()
                .unwrap_or(RunStatus::Unknown);
            (*r, status)
        })
        .collect()
}

/// Render the display label for a run: the job name when the lookup
/// resolves it, else the bare job id, padded (and truncated with an
/// ellipsis) to `width`.
fn format_run_label(job_id: u64, job_names: Option<&HashMap<u64, String>>, width: usize) -> String {
    let label = job_names
        .and_then(|names| names.get(&job_id))
        .cloned()
        .unwrap_or_else(|| job_id.to_string());

    let chars: Vec<char> = label.chars().collect();
    if chars.len() > width {
        let mut truncated: String = chars[..width.saturating_sub(1)].iter().collect();
        truncated.push('…');
        truncated
    } else {
        format!("{label:<width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lakeops_client::{ClientError, Result};
    use std::sync::Mutex;

    /// Replays a scripted status (or error) sequence per run id and
    /// panics when a run is polled past the end of its script, which
    /// catches re-polling of finished runs.
    struct ScriptedStatuses {
        scripts: Mutex<HashMap<u64, Vec<Result<RunStatus>>>>,
    }

    impl ScriptedStatuses {
        fn new(scripts: HashMap<u64, Vec<Result<RunStatus>>>) -> Self {
            Self {
                scripts: Mutex::new(scripts),
            }
        }
    }

    #[async_trait]
    impl RunStatusSource for ScriptedStatuses {
        async fn get_run_status(&self, run_id: u64) -> Result<RunStatus> {
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts
                .get_mut(&run_id)
                .unwrap_or_else(|| panic!("unexpected poll for run {run_id}"));
            assert!(
                !script.is_empty(),
                "run {run_id} polled again after reaching a terminal state"
            );
            script.remove(0)
        }
    }

    fn run(run_id: u64, job_id: u64) -> JobRun {
        JobRun { run_id, job_id }
    }

    #[tokio::test]
    async fn returns_results_in_input_order() {
        // Run 20 finishes on the first tick, run 10 needs two more.
        let api = ScriptedStatuses::new(HashMap::from([
            (
                10,
                vec![
                    Ok(RunStatus::Running),
                    Ok(RunStatus::Running),
                    Ok(RunStatus::Success),
                ],
            ),
            (20, vec![Ok(RunStatus::Success)]),
        ]));
        let runs = vec![run(10, 1), run(20, 2)];

        let results = wait_for_runs_with_progress(&api, &runs, Duration::ZERO, None).await;

        assert_eq!(
            results,
            vec![
                (run(10, 1), RunStatus::Success),
                (run(20, 2), RunStatus::Success),
            ]
        );
    }

    #[tokio::test]
    async fn finished_runs_are_not_polled_again() {
        // The scripts end right after the terminal state; any re-poll of a
        // finished run trips the stub's assertion while 30 keeps the loop
        // alive for two extra ticks.
        let api = ScriptedStatuses::new(HashMap::from([
            (30, vec![
                Ok(RunStatus::Running),
                Ok(RunStatus::Running),
                Ok(RunStatus::Failed),
            ]),
            (40, vec![Ok(RunStatus::Canceled)]),
        ]));
        let runs = vec![run(30, 3), run(40, 4)];

        let results = wait_for_runs_with_progress(&api, &runs, Duration::ZERO, None).await;

        assert_eq!(results[0].1, RunStatus::Failed);
        assert_eq!(results[1].1, RunStatus::Canceled);
    }

    #[tokio::test]
    async fn poll_errors_degrade_to_unknown_and_retry() {
        let api = ScriptedStatuses::new(HashMap::from([(
            50,
            vec![
                Err(ClientError::api_error(503, "unavailable")),
                Ok(RunStatus::Success),
            ],
        )]));
        let runs = vec![run(50, 5)];

        let results = wait_for_runs_with_progress(&api, &runs, Duration::ZERO, None).await;

        assert_eq!(results, vec![(run(50, 5), RunStatus::Success)]);
    }

    /// Stub covering the whole run lifecycle: starting yields
    /// `run_id = job_id * 10`, and every run reports RUNNING once before
    /// finishing with SUCCESS.
    struct Lifecycle {
        polled: Mutex<HashMap<u64, usize>>,
    }

    #[async_trait]
    impl lakeops_client::JobStarter for Lifecycle {
        async fn start_job(&self, job_id: u64) -> Result<JobRun> {
            Ok(run(job_id * 10, job_id))
        }
    }

    #[async_trait]
    impl RunStatusSource for Lifecycle {
        async fn get_run_status(&self, run_id: u64) -> Result<RunStatus> {
            let mut polled = self.polled.lock().unwrap();
            let count = polled.entry(run_id).or_insert(0);
            *count += 1;
            Ok(if *count == 1 {
                RunStatus::Running
            } else {
                RunStatus::Success
            })
        }
    }

    #[tokio::test]
    async fn dispatch_then_monitor_to_success() {
        use lakeops_client::start_jobs_parallel;
        use std::sync::Arc;

        let api = Arc::new(Lifecycle {
            polled: Mutex::new(HashMap::new()),
        });

        let mut runs = start_jobs_parallel(Arc::clone(&api), &[10, 20], 1)
            .await
            .unwrap();
        let mut pairs: Vec<(u64, u64)> = runs.iter().map(|r| (r.job_id, r.run_id)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(10, 100), (20, 200)]);

        // Monitor in a caller-chosen order, independent of completion order.
        runs.sort_by_key(|r| r.job_id);
        let results =
            wait_for_runs_with_progress(api.as_ref(), &runs, Duration::ZERO, None).await;

        assert_eq!(
            results,
            vec![
                (run(100, 10), RunStatus::Success),
                (run(200, 20), RunStatus::Success),
            ]
        );
    }

    #[test]
    fn label_prefers_job_name_and_pads() {
        let names = HashMap::from([(7, "nightly".to_string())]);
        assert_eq!(format_run_label(7, Some(&names), 10), "nightly   ");
    }

    #[test]
    fn label_falls_back_to_job_id() {
        let names = HashMap::from([(7, "nightly".to_string())]);
        assert_eq!(format_run_label(8, Some(&names), 4), "8   ");
        assert_eq!(format_run_label(8, None, 4), "8   ");
    }

    #[test]
    fn label_truncates_long_names_with_ellipsis() {
        let names = HashMap::from([(7, "a-very-long-job-name".to_string())]);
        let label = format_run_label(7, Some(&names), 8);
        assert_eq!(label.chars().count(), 8);
        assert!(label.ends_with('…'));
        assert_eq!(label, "a-very-…");
    }
}
