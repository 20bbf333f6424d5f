//! Job domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A remotely-defined job in the workspace.
///
/// Identity is the numeric `id`. Values are immutable once fetched; two
/// `Job` values with the same id may describe the same remote job across
/// different inventory fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    pub name: String,
    /// Key/value metadata attached to the job. Absent tags deserialize to
    /// an empty map; the two are treated identically everywhere.
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Job {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tags: HashMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// One execution of a job, as returned by a successful start call.
///
/// Correlates a launch to the run that must be monitored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobRun {
    pub run_id: u64,
    pub job_id: u64,
}

/// Status of a job run.
///
/// `Success`, `Failed` and `Canceled` are terminal. `Unknown` means the
/// remote state was not decodable at poll time and must be polled again;
/// it is never treated as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
    Unknown,
}

impl RunStatus {
    /// True once no further transitions can occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Canceled)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
