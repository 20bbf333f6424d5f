//! Selector-driven job lookup

use lakeops_core::domain::job::Job;
use lakeops_core::selector::Selector;

use crate::adapter::JobFinder;
use crate::error::Result;

/// Select jobs from the inventory using a selector.
///
/// Fetches the full inventory once (served from the cache when fresh) and
/// filters it in memory, preserving the inventory's original order. There
/// is no pagination or partial-result handling.
pub async fn select_jobs<F>(finder: &F, selector: &Selector) -> Result<Vec<Job>>
where
    F: JobFinder + ?Sized,
{
    let jobs = finder.find_all_jobs().await?;
    Ok(jobs.into_iter().filter(|job| selector.matches(job)).collect())
}
