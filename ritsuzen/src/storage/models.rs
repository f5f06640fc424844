//! Persisted data layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::competition::Competition;
use crate::roster::ParticipantMaster;

/// Root blob stored under [`crate::constants::STORAGE_KEY`]
///
/// Every field defaults so that partially written blobs still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageData {
    #[serde(default)]
    pub current_competition: Option<Competition>,
    /// Finished competitions, most recent first
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub participant_masters: Vec<ParticipantMaster>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            current_competition: None,
            competitions: Vec::new(),
            participant_masters: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

/// Summary of what is currently stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    /// Size of the stored blob in bytes
    pub used_bytes: usize,
    /// Competitions in the history
    pub competition_count: usize,
    pub master_count: usize,
    pub has_current_competition: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl StorageInfo {
    /// Human readable size, e.g. `12.3 KB`
    pub fn formatted_size(&self) -> String {
        format_bytes(self.used_bytes)
    }
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["B", "KB", "MB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
