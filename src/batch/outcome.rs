use crate::error::{RezipError, Result};
use crate::pipeline::PackSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Converted { entries: usize, bytes: u64 },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub index: usize,
    #[serde(serialize_with = "display_path::serialize")]
    pub input: PathBuf,
    #[serde(serialize_with = "display_path::serialize_option")]
    pub output: Option<PathBuf>,
    #[serde(flatten)]
    pub status: ItemStatus,
    pub duration_ms: u64,
}

impl ItemOutcome {
    pub fn converted(
        index: usize,
        input: PathBuf,
        output: PathBuf,
        pack: PackSummary,
        duration_ms: u64,
    ) -> Self {
        Self {
            index,
            input,
            output: Some(output),
            status: ItemStatus::Converted {
                entries: pack.entries,
                bytes: pack.bytes,
            },
            duration_ms,
        }
    }

    pub fn failed(
        index: usize,
        input: PathBuf,
        output: Option<PathBuf>,
        reason: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            index,
            input,
            output,
            status: ItemStatus::Failed { reason },
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ItemStatus::Converted { .. })
    }

    /// One status-log line, without the leading success/failure marker.
    pub fn message(&self) -> String {
        match (&self.status, &self.output) {
            (ItemStatus::Converted { .. }, Some(output)) => format!(
                "{} converted: {}",
                self.input.display(),
                output.display()
            ),
            (ItemStatus::Converted { .. }, None) => format!("{} converted", self.input.display()),
            (ItemStatus::Failed { reason }, _) => {
                format!("{} failed: {}", self.input.display(), reason)
            }
        }
    }
}

/// Writes paths with `Path::display`; bytes that are not UTF-8 are replaced.
mod display_path {
    use serde::Serializer;
    use std::path::{Path, PathBuf};

    pub fn serialize<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&path.display())
    }

    pub fn serialize_option<S: Serializer>(
        path: &Option<PathBuf>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match path {
            Some(path) => serialize(path, serializer),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<ItemOutcome>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl BatchSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            items: Vec::new(),
            started_at,
            duration_ms: 0,
        }
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.items.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn message(&self) -> String {
        format!(
            "Conversion complete! Succeeded: {}, Failed: {}",
            self.succeeded, self.failed
        )
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json_content = serde_json::to_string_pretty(self).map_err(|e| RezipError::Config {
            message: format!("Failed to serialize report to JSON: {}", e),
        })?;

        fs::write(path, json_content)?;
        Ok(())
    }
}

/// Messages posted by the batch worker, in order: one `ItemFinished` per
/// input, then exactly one `Finished`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    ItemFinished(ItemOutcome),
    Finished(BatchSummary),
}
