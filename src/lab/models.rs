use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Launch parameters for one simulation, sent as a flat string map.
pub type SimulationParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connectivity {
    pub id: i64,
    pub gid: String,
    pub number_of_regions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Started,
    Finished,
    Error,
    Canceled,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OperationStatus::Finished | OperationStatus::Error | OperationStatus::Canceled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: i64,
    pub status: OperationStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
    /// Diagnostic message stored by the lab, set on failure
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl Operation {
    pub fn has_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn running_time(&self) -> Option<Duration> {
        Some(self.completion_date? - self.start_date?)
    }
}
