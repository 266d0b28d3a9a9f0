use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::catalog::{default_point_name, AreaCode, MapImage};
use crate::db::Database;
use crate::geometry::MapPosition;
use crate::models::ReferencePoint;
use crate::scanner::{PermissionGate, WifiScanner};

use super::aggregate::{self, MergePolicy};
use super::worker::{run_scan_sequence, DEFAULT_SCAN_ATTEMPTS};
use super::{ScanProgress, SurveySummary};

/// Everything needed to place a new reference point and survey it.
#[derive(Debug, Clone)]
pub struct NewPointRequest {
    pub map: MapImage,
    /// Required when the map's catalog entry demands an area selection.
    pub area: Option<AreaCode>,
    pub position: MapPosition,
    /// Explicit label; derived from the map (and area) when empty.
    pub name: Option<String>,
    pub attempts: u32,
}

impl NewPointRequest {
    pub fn new(map: MapImage, position: MapPosition) -> Self {
        Self {
            map,
            area: None,
            position,
            name: None,
            attempts: DEFAULT_SCAN_ATTEMPTS,
        }
    }
}

/// Owns the lifecycle of one survey at a time: the spawned scan task, its
/// cancel token, and the progress channel observers subscribe to.
///
/// The scan hardware cannot service overlapping sequences, so starting a
/// second survey while one is active is rejected rather than queued.
pub struct SurveyController {
    db: Database,
    scanner: Arc<dyn WifiScanner>,
    permissions: Arc<dyn PermissionGate>,
    handle: Option<JoinHandle<Result<SurveySummary>>>,
    cancel_token: Option<CancellationToken>,
    active_point: Option<String>,
    progress_tx: Arc<watch::Sender<ScanProgress>>,
}

impl SurveyController {
    pub fn new(
        db: Database,
        scanner: Arc<dyn WifiScanner>,
        permissions: Arc<dyn PermissionGate>,
    ) -> Self {
        let (progress_tx, _progress_rx) = watch::channel(ScanProgress::default());
        Self {
            db,
            scanner,
            permissions,
            handle: None,
            cancel_token: None,
            active_point: None,
            progress_tx: Arc::new(progress_tx),
        }
    }

    /// Attempt-progress feed; updated after every completed attempt.
    pub fn subscribe(&self) -> watch::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Id of the point the running survey belongs to, if any.
    pub fn active_point(&self) -> Option<&str> {
        self.active_point.as_deref()
    }

    /// Create-policy survey. Validates the request, writes the point with an
    /// empty reading set so it is visible immediately, then runs the scan
    /// sequence in the background. Returns the pre-allocated point id; the
    /// final aggregate updates that same row in place.
    ///
    /// The new point's id doubles as the batch session id, so readings come
    /// out tagged `<point-id>-scan-<attempt>`.
    pub async fn start_create(&mut self, request: NewPointRequest) -> Result<String> {
        if self.handle.is_some() {
            bail!("survey already active");
        }
        if request.attempts == 0 {
            bail!("attempts must be greater than zero");
        }

        let name = match request.name {
            Some(name) if !name.is_empty() => name,
            _ => default_point_name(&request.map, request.area)?,
        };

        let point = ReferencePoint::new(
            name,
            request.position.x,
            request.position.y,
            request.map.id.as_str(),
        )?;

        self.db.insert_reference_point(&point).await?;
        info!(
            "reference point {} created at ({:.2}, {:.2}) on {}, starting {} scan(s)",
            point.id, point.x, point.y, point.image_id, request.attempts
        );

        let point_id = point.id.clone();
        let session_id = point_id.clone();
        self.spawn(point, session_id, MergePolicy::Create, request.attempts);
        Ok(point_id)
    }

    /// Append-policy survey against an existing point. Prior readings are
    /// preserved; a fresh session id keeps the new batches distinguishable
    /// from every earlier one.
    pub async fn start_append(&mut self, point_id: &str, attempts: u32) -> Result<()> {
        if self.handle.is_some() {
            bail!("survey already active");
        }
        if attempts == 0 {
            bail!("attempts must be greater than zero");
        }

        let point = self
            .db
            .get_reference_point(point_id)
            .await?
            .with_context(|| format!("no reference point with id {point_id}"))?;

        info!(
            "appending {} scan(s) to reference point {} ({} existing readings)",
            attempts,
            point.id,
            point.wifi_readings.len()
        );

        let session_id = Uuid::new_v4().to_string();
        self.spawn(point, session_id, MergePolicy::Append, attempts);
        Ok(())
    }

    fn spawn(
        &mut self,
        point: ReferencePoint,
        session_id: String,
        policy: MergePolicy,
        attempts: u32,
    ) {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let db = self.db.clone();
        let scanner = Arc::clone(&self.scanner);
        let permissions = Arc::clone(&self.permissions);
        let progress = Arc::clone(&self.progress_tx);

        self.active_point = Some(point.id.clone());
        let handle = tokio::spawn(async move {
            let results = run_scan_sequence(
                &point.id,
                attempts,
                scanner,
                permissions,
                &progress,
                &token,
            )
            .await;
            aggregate::apply(&db, policy, point, &session_id, &results).await
        });

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
    }

    /// Stops scheduling further attempts. The attempt in flight finishes and
    /// the completed prefix is still aggregated; [`finish`](Self::finish)
    /// returns the resulting summary.
    pub fn cancel(&mut self) {
        if let Some(token) = &self.cancel_token {
            token.cancel();
            info!("survey cancellation requested");
        }
    }

    /// Waits for the running survey and returns its summary.
    pub async fn finish(&mut self) -> Result<SurveySummary> {
        let Some(handle) = self.handle.take() else {
            bail!("no survey in progress");
        };
        self.cancel_token = None;
        self.active_point = None;

        handle.await.context("survey task failed to join")?
    }
}
