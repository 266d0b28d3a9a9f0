use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use tokio::sync::watch;
use tokio::time::{sleep, timeout, Duration};
use tokio_util::sync::CancellationToken;

use crate::scanner::{Capability, PermissionGate, ScanEntry, WifiScanner};

use super::ScanProgress;

/// How long the platform gets to populate results after a trigger. Doubles
/// as the upper bound on one attempt: the snapshot read is wrapped in a
/// timeout of the same length, so no attempt can hang on the hardware.
pub const SCAN_SETTLE_MS: u64 = 300;

/// Pause between attempts. Fixed policy constant bounding scan frequency;
/// platform scan throttling and battery drain both punish anything tighter.
pub const ATTEMPT_SPACING_MS: u64 = 300;

/// Matches the smallest choice offered when creating a point.
pub const DEFAULT_SCAN_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    /// At least one access point observed.
    Collected,
    /// The scan ran but the snapshot was empty.
    Empty,
    /// Location permission was missing at attempt time.
    PermissionDenied,
    /// Trigger or snapshot read failed; logged and absorbed.
    Failed,
}

/// Outcome of a single trigger-and-collect cycle.
#[derive(Debug, Clone)]
pub struct AttemptResult {
    /// 1-based position in the sequence.
    pub attempt: u32,
    pub status: AttemptStatus,
    pub entries: Vec<ScanEntry>,
    pub captured_at: DateTime<Utc>,
}

/// Runs up to `attempts` scan cycles for one reference point, strictly in
/// sequence. Per-attempt failures never abort the run; an uncancelled
/// sequence always produces exactly `attempts` results.
///
/// Cancellation is honored between attempts and during the spacing delay.
/// An attempt already in flight runs to completion, so the result list is
/// always a clean prefix of the sequence.
pub async fn run_scan_sequence(
    point_id: &str,
    attempts: u32,
    scanner: Arc<dyn WifiScanner>,
    permissions: Arc<dyn PermissionGate>,
    progress: &watch::Sender<ScanProgress>,
    cancel: &CancellationToken,
) -> Vec<AttemptResult> {
    let mut results = Vec::with_capacity(attempts as usize);

    for attempt in 1..=attempts {
        if cancel.is_cancelled() {
            info!(
                "scan sequence for {point_id} cancelled after {} of {attempts} attempts",
                results.len()
            );
            break;
        }

        let result = run_attempt(attempt, &scanner, &permissions).await;
        info!(
            "scan attempt {attempt}/{attempts} for {point_id}: {:?}, {} entries",
            result.status,
            result.entries.len()
        );
        results.push(result);

        let _ = progress.send(ScanProgress {
            current: attempt,
            total: attempts,
        });

        if attempt < attempts {
            tokio::select! {
                _ = sleep(Duration::from_millis(ATTEMPT_SPACING_MS)) => {}
                _ = cancel.cancelled() => {}
            }
        }
    }

    results
}

async fn run_attempt(
    attempt: u32,
    scanner: &Arc<dyn WifiScanner>,
    permissions: &Arc<dyn PermissionGate>,
) -> AttemptResult {
    let captured_at = Utc::now();

    if !permissions.is_granted(Capability::FineLocation) {
        warn!("scan attempt {attempt} skipped: location permission not granted");
        return AttemptResult {
            attempt,
            status: AttemptStatus::PermissionDenied,
            entries: Vec::new(),
            captured_at,
        };
    }

    let trigger = tokio::task::spawn_blocking({
        let scanner = Arc::clone(scanner);
        move || scanner.trigger()
    })
    .await;
    match trigger {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            warn!("scan trigger failed on attempt {attempt}: {err:?}");
            return failed(attempt, captured_at);
        }
        Err(err) => {
            warn!("scan trigger worker join failed on attempt {attempt}: {err}");
            return failed(attempt, captured_at);
        }
    }

    sleep(Duration::from_millis(SCAN_SETTLE_MS)).await;

    let read = timeout(
        Duration::from_millis(SCAN_SETTLE_MS),
        tokio::task::spawn_blocking({
            let scanner = Arc::clone(scanner);
            move || scanner.last_results()
        }),
    )
    .await;

    let entries = match read {
        Ok(Ok(Ok(entries))) => entries,
        Ok(Ok(Err(err))) => {
            warn!("scan result read failed on attempt {attempt}: {err:?}");
            return failed(attempt, captured_at);
        }
        Ok(Err(err)) => {
            warn!("scan result worker join failed on attempt {attempt}: {err}");
            return failed(attempt, captured_at);
        }
        Err(_) => {
            warn!(
                "scan result read timed out (> {}ms) on attempt {attempt}",
                SCAN_SETTLE_MS
            );
            return failed(attempt, captured_at);
        }
    };

    let status = if entries.is_empty() {
        AttemptStatus::Empty
    } else {
        AttemptStatus::Collected
    };

    AttemptResult {
        attempt,
        status,
        entries,
        captured_at: Utc::now(),
    }
}

fn failed(attempt: u32, captured_at: DateTime<Utc>) -> AttemptResult {
    AttemptResult {
        attempt,
        status: AttemptStatus::Failed,
        entries: Vec::new(),
        captured_at,
    }
}
