//! Reference-point survey pipeline: a bounded sequence of Wi-Fi scan
//! attempts for one map location, aggregated into the persisted point.

pub mod aggregate;
pub mod controller;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use aggregate::{readings_from_attempts, MergePolicy};
pub use controller::{NewPointRequest, SurveyController};
pub use worker::{AttemptResult, AttemptStatus, DEFAULT_SCAN_ATTEMPTS};

/// Attempt counter published after every completed attempt, for progress
/// feedback while a sequence runs. `current == 0` means no sequence has
/// reported yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgress {
    pub current: u32,
    pub total: u32,
}

/// How a finished survey turned out. Zero readings is a reportable state of
/// its own, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurveyOutcome {
    Collected { reading_count: usize },
    NoReadings { permission_denied: bool },
}

/// Result of one create or append survey operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub point_id: String,
    /// Attempts that actually ran; shorter than requested if cancelled.
    pub attempts_completed: u32,
    pub outcome: SurveyOutcome,
}
