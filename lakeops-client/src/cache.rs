//! Job inventory cache
//!
//! A time-boxed, per-identity snapshot of the full job inventory, persisted
//! as one JSON file per `{profile}@{host}` identity. The cache only ever
//! degrades: any unreadable, malformed or expired entry is a miss and costs
//! a re-fetch, never an error. Concurrent invocations may race on the file;
//! a torn read is a miss and a lost write is re-fetched next time.
//!
//! Recognized environment overrides:
//! - `LAKEOPS_JOBS_CACHE_TTL` — entry lifetime in seconds (default 300,
//!   clamped to >= 0; unparsable values fall back to the default)
//! - `LAKEOPS_JOBS_CACHE_DISABLE` — `1`/`true`/`yes` turns caching off
//! - `LAKEOPS_CACHE_DIR` — explicit cache root, else `XDG_CACHE_HOME`,
//!   else the user cache directory

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tracing::debug;

use lakeops_core::domain::job::Job;

use crate::error::{ClientError, Result};

const TTL_ENV: &str = "LAKEOPS_JOBS_CACHE_TTL";
const DISABLE_ENV: &str = "LAKEOPS_JOBS_CACHE_DISABLE";
const DIR_ENV: &str = "LAKEOPS_CACHE_DIR";

/// Default entry lifetime in seconds.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// On-disk cache of the job inventory for one workspace identity.
#[derive(Debug, Clone)]
pub struct JobsCache {
    path: PathBuf,
    ttl_secs: u64,
    disabled: bool,
}

impl JobsCache {
    /// Build a cache for the given identity, resolving the cache root,
    /// TTL and disable flag from the environment.
    pub fn from_env(profile: Option<&str>, host: &str) -> Self {
        let root = env::var(DIR_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                env::var("XDG_CACHE_HOME")
                    .ok()
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(dirs::cache_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let ttl_secs = ttl_from(env::var(TTL_ENV).ok());
        let disabled = disabled_from(env::var(DISABLE_ENV).ok());

        Self::at(root, profile, host, ttl_secs, disabled)
    }

    /// Build a cache rooted at an explicit directory. Used by `from_env`
    /// and directly by tests, which must not depend on process-global
    /// environment state.
    pub fn at(
        root: PathBuf,
        profile: Option<&str>,
        host: &str,
        ttl_secs: u64,
        disabled: bool,
    ) -> Self {
        let key = identity_key(profile, host);
        let path = root.join("lakeops").join(format!("jobs_{key}.json"));
        Self {
            path,
            ttl_secs,
            disabled,
        }
    }

    /// Whether this cache will be consulted at all.
    pub fn is_enabled(&self) -> bool {
        !self.disabled && self.ttl_secs > 0
    }

    /// Load the cached inventory if present and fresh.
    ///
    /// Returns `None` when the cache is disabled, the file is absent or
    /// unreadable, the document is malformed, the timestamp is missing or
    /// non-numeric, or the entry is older than the TTL. Individual job
    /// records that fail to parse are skipped without invalidating the
    /// rest of the entry.
    pub fn load(&self) -> Option<Vec<Job>> {
        if !self.is_enabled() {
            return None;
        }

        let raw = fs::read_to_string(&self.path).ok()?;
        let payload: Value = serde_json::from_str(&raw).ok()?;

        let timestamp = payload.get("timestamp")?.as_f64()?;
        if unix_now_secs() - timestamp > self.ttl_secs as f64 {
            debug!(path = %self.path.display(), "jobs cache expired");
            return None;
        }

        let records = payload.get("jobs")?.as_array()?;
        let jobs = records
            .iter()
            .filter_map(|item| serde_json::from_value::<Job>(item.clone()).ok())
            .collect();

        debug!(path = %self.path.display(), "jobs cache hit");
        Some(jobs)
    }

    /// Persist the inventory, overwriting any previous entry.
    ///
    /// No-op when the cache is disabled. Parent directories are created as
    /// needed; write failures propagate, since the only cost of a missing
    /// entry is a re-fetch on the next invocation.
    pub fn store(&self, jobs: &[Job]) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let payload = serde_json::json!({
            "timestamp": unix_now_secs(),
            "jobs": jobs,
        });
        let body = serde_json::to_string(&payload)
            .map_err(|e| ClientError::ParseError(format!("Failed to encode cache entry: {e}")))?;
        fs::write(&self.path, body)?;

        debug!(path = %self.path.display(), count = jobs.len(), "jobs cache written");
        Ok(())
    }

    /// Path of the entry file for this identity.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

/// `{profile}@{host}` with every character outside `[A-Za-z0-9_.-]`
/// replaced by `_`, safe for use as a filename component.
fn identity_key(profile: Option<&str>, host: &str) -> String {
    let profile = profile.filter(|p| !p.is_empty()).unwrap_or("default");
    let host = if host.is_empty() { "unknown" } else { host };
    format!("{profile}@{host}")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn ttl_from(raw: Option<String>) -> u64 {
    match raw {
        None => DEFAULT_TTL_SECS,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(secs) => secs.max(0) as u64,
            Err(_) => DEFAULT_TTL_SECS,
        },
    }
}

fn disabled_from(raw: Option<String>) -> bool {
    raw.map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn unix_now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_jobs() -> Vec<Job> {
        vec![
            Job::new(1, "daily-etl").with_tag("env", "prod"),
            Job::new(2, "weekly-etl"),
        ]
    }

    fn cache_in(root: &std::path::Path) -> JobsCache {
        JobsCache::at(
            root.to_path_buf(),
            Some("dev"),
            "https://ws.example.com",
            DEFAULT_TTL_SECS,
            false,
        )
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());

        cache.store(&sample_jobs()).unwrap();
        assert_eq!(cache.load(), Some(sample_jobs()));
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());

        // Entry stamped well past the TTL.
        let stale = unix_now_secs() - (DEFAULT_TTL_SECS as f64 + 100.0);
        fs::create_dir_all(cache.path().parent().unwrap()).unwrap();
        fs::write(
            cache.path(),
            format!(r#"{{"timestamp": {stale}, "jobs": [{{"id": 1, "name": "etl"}}]}}"#),
        )
        .unwrap();

        assert_eq!(cache.load(), None);
    }

    #[test]
    fn disabled_cache_never_reads_or_writes() {
        let dir = tempdir().unwrap();
        let cache = JobsCache::at(dir.path().to_path_buf(), None, "host", DEFAULT_TTL_SECS, true);

        cache.store(&sample_jobs()).unwrap();
        assert!(!cache.path().exists());
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn zero_ttl_disables_the_cache() {
        let dir = tempdir().unwrap();
        let cache = JobsCache::at(dir.path().to_path_buf(), None, "host", 0, false);
        assert!(!cache.is_enabled());
    }

    #[test]
    fn malformed_document_is_a_miss() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());

        fs::create_dir_all(cache.path().parent().unwrap()).unwrap();
        for body in ["not json", r#"{"jobs": []}"#, r#"{"timestamp": "later", "jobs": []}"#] {
            fs::write(cache.path(), body).unwrap();
            assert_eq!(cache.load(), None, "body {body:?} should miss");
        }
    }

    #[test]
    fn unparsable_records_are_skipped() {
        let dir = tempdir().unwrap();
        let cache = cache_in(dir.path());

        let now = unix_now_secs();
        fs::create_dir_all(cache.path().parent().unwrap()).unwrap();
        fs::write(
            cache.path(),
            format!(
                r#"{{"timestamp": {now}, "jobs": [{{"id": 1, "name": "etl"}}, {{"id": 2}}, {{"name": "orphan"}}]}}"#
            ),
        )
        .unwrap();

        assert_eq!(cache.load(), Some(vec![Job::new(1, "etl")]));
    }

    #[test]
    fn identity_key_is_filesystem_safe() {
        let key = identity_key(Some("prod"), "https://ws.example.com/?o=123");
        assert_eq!(key, "prod_https___ws.example.com__o_123");

        assert_eq!(identity_key(None, "host"), "default_host");
        assert_eq!(identity_key(Some(""), ""), "default_unknown");
    }

    #[test]
    fn ttl_parsing_clamps_and_falls_back() {
        assert_eq!(ttl_from(None), DEFAULT_TTL_SECS);
        assert_eq!(ttl_from(Some("120".into())), 120);
        assert_eq!(ttl_from(Some("-5".into())), 0);
        assert_eq!(ttl_from(Some("soon".into())), DEFAULT_TTL_SECS);
    }

    #[test]
    fn disable_flag_accepts_truthy_strings() {
        assert!(disabled_from(Some("1".into())));
        assert!(disabled_from(Some("TRUE".into())));
        assert!(disabled_from(Some(" yes ".into())));
        assert!(!disabled_from(Some("0".into())));
        assert!(!disabled_from(Some("off".into())));
        assert!(!disabled_from(None));
    }
}
