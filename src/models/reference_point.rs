use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WifiReading;

/// A surveyed location on a floor plan together with every Wi-Fi reading
/// collected there. `x`/`y` are percentages of the map image's intrinsic
/// size, so a point stays valid across display resolutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePoint {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub image_id: String,
    /// Completed scan attempts, including ones that yielded nothing.
    pub scan_count: u32,
    /// Insertion order is scan order.
    pub wifi_readings: Vec<WifiReading>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReferencePoint {
    /// Creates a point with a fresh id, zero scans, and no readings.
    /// Coordinates outside `[0.0, 100.0]` are rejected before anything is
    /// persisted.
    pub fn new(
        name: impl Into<String>,
        x: f64,
        y: f64,
        image_id: impl Into<String>,
    ) -> Result<Self> {
        if !(0.0..=100.0).contains(&x) || !(0.0..=100.0).contains(&y) {
            bail!("coordinates must lie within 0.0..=100.0, got ({x}, {y})");
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            x,
            y,
            image_id: image_id.into(),
            scan_count: 0,
            wifi_readings: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}
