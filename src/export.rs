//! Serialized export of the full reference-point store.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::ReferencePoint;

/// Bumped whenever the record shape changes; lets importers reject
/// documents they do not understand instead of misreading them.
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// Top-level export record: every reference point with its nested readings.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub reference_points: Vec<ReferencePoint>,
}

impl ExportDocument {
    pub fn new(reference_points: Vec<ReferencePoint>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            reference_points,
        }
    }
}

/// Conventional export filename, capture time embedded:
/// `wifi_reference_points_20250807_131500.json`.
pub fn export_file_name(timestamp: DateTime<Utc>) -> String {
    format!(
        "wifi_reference_points_{}.json",
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Serializes the whole store. Well-formed even when the store is empty.
pub async fn export_all_points_to_json(db: &Database) -> Result<String> {
    let points = db.list_reference_points().await?;
    let document = ExportDocument::new(points);
    serde_json::to_string_pretty(&document).context("failed to serialize export document")
}

/// Writes the export to `path`. The document is staged next to the target
/// and renamed into place, so a failure leaves either the old file or
/// nothing — never a truncated export.
pub async fn export_to_file(db: &Database, path: &Path) -> Result<()> {
    let json = export_all_points_to_json(db).await?;

    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, json.as_bytes())
        .with_context(|| format!("failed to write export staging file {}", staging.display()))?;
    std::fs::rename(&staging, path)
        .with_context(|| format!("failed to move export into place at {}", path.display()))?;

    info!("exported reference points to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn file_name_embeds_the_capture_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 8, 7, 13, 15, 0).unwrap();
        assert_eq!(
            export_file_name(ts),
            "wifi_reference_points_20250807_131500.json"
        );
    }

    #[test]
    fn empty_document_round_trips() {
        let doc = ExportDocument::new(Vec::new());
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: ExportDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert!(parsed.reference_points.is_empty());
    }
}
