use anyhow::Result;
use chrono::Utc;
use log::info;

use crate::db::Database;
use crate::models::{ReferencePoint, WifiReading};

use super::worker::{AttemptResult, AttemptStatus};
use super::{SurveyOutcome, SurveySummary};

/// How newly collected readings merge into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Two-phase write of a fresh point: the empty point was already
    /// inserted; the aggregated result updates that same row in place.
    Create,
    /// Concatenate after an existing point's readings and bump its
    /// scan count.
    Append,
}

/// Builds one [`WifiReading`] per raw entry, batch-tagged
/// `<session_id>-scan-<attempt>` so every reading stays traceable to the
/// attempt that produced it. Attempt order is preserved.
pub fn readings_from_attempts(
    session_id: &str,
    results: &[AttemptResult],
) -> Vec<WifiReading> {
    let mut readings = Vec::new();
    for result in results {
        let batch_id = format!("{session_id}-scan-{}", result.attempt);
        for entry in &result.entries {
            readings.push(WifiReading::new(
                entry.bssid.clone(),
                &entry.ssid,
                entry.level,
                entry.frequency,
                batch_id.clone(),
                result.captured_at,
            ));
        }
    }
    readings
}

/// Folds a finished attempt sequence into the store under the given policy
/// and reports how the survey turned out. A run that collected nothing
/// still persists its attempt count; that is a distinct outcome, not an
/// error.
pub async fn apply(
    db: &Database,
    policy: MergePolicy,
    mut point: ReferencePoint,
    session_id: &str,
    results: &[AttemptResult],
) -> Result<SurveySummary> {
    let readings = readings_from_attempts(session_id, results);
    let completed = results.len() as u32;
    let reading_count = readings.len();

    match policy {
        MergePolicy::Create => {
            point.scan_count = completed;
            point.wifi_readings = readings;
            point.updated_at = Utc::now();
            db.upsert_reference_point(&point).await?;
        }
        MergePolicy::Append => {
            db.append_wifi_readings(&point.id, readings, completed).await?;
        }
    }

    let outcome = if reading_count > 0 {
        SurveyOutcome::Collected { reading_count }
    } else {
        let permission_denied = results
            .iter()
            .any(|r| r.status == AttemptStatus::PermissionDenied);
        SurveyOutcome::NoReadings { permission_denied }
    };

    info!(
        "survey for {} aggregated: {completed} attempt(s), {reading_count} reading(s)",
        point.id
    );

    Ok(SurveySummary {
        point_id: point.id,
        attempts_completed: completed,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::models::UNKNOWN_SSID;
    use crate::scanner::ScanEntry;

    use super::*;

    fn attempt(index: u32, status: AttemptStatus, entries: Vec<ScanEntry>) -> AttemptResult {
        AttemptResult {
            attempt: index,
            status,
            entries,
            captured_at: Utc::now(),
        }
    }

    fn entry(bssid: &str, ssid: &str) -> ScanEntry {
        ScanEntry {
            bssid: bssid.to_string(),
            ssid: ssid.to_string(),
            level: -48,
            frequency: 5180,
        }
    }

    #[test]
    fn batch_ids_carry_session_and_attempt_index() {
        let results = vec![
            attempt(1, AttemptStatus::Collected, vec![entry("a", "x"), entry("b", "y")]),
            attempt(2, AttemptStatus::PermissionDenied, Vec::new()),
            attempt(3, AttemptStatus::Collected, vec![entry("c", "z"), entry("d", "w")]),
        ];

        let readings = readings_from_attempts("p1", &results);

        assert_eq!(readings.len(), 4);
        assert_eq!(readings[0].batch_id, "p1-scan-1");
        assert_eq!(readings[1].batch_id, "p1-scan-1");
        assert_eq!(readings[2].batch_id, "p1-scan-3");
        assert_eq!(readings[3].batch_id, "p1-scan-3");
    }

    #[test]
    fn attempt_order_is_preserved() {
        let results = vec![
            attempt(1, AttemptStatus::Collected, vec![entry("first", "x")]),
            attempt(2, AttemptStatus::Collected, vec![entry("second", "y")]),
        ];

        let readings = readings_from_attempts("s", &results);
        assert_eq!(readings[0].bssid, "first");
        assert_eq!(readings[1].bssid, "second");
    }

    #[test]
    fn hidden_networks_get_the_sentinel_label() {
        let results = vec![attempt(1, AttemptStatus::Collected, vec![entry("a", "")])];
        let readings = readings_from_attempts("s", &results);
        assert_eq!(readings[0].ssid, UNKNOWN_SSID);
    }

    #[test]
    fn attempts_without_entries_produce_no_readings() {
        let results = vec![
            attempt(1, AttemptStatus::Empty, Vec::new()),
            attempt(2, AttemptStatus::Failed, Vec::new()),
        ];
        assert!(readings_from_attempts("s", &results).is_empty());
    }
}
