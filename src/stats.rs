//! Per-map aggregation over the collected reference points.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::find_map_image;
use crate::models::ReferencePoint;

/// Collection totals for one floor-plan image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStatistics {
    pub map_id: String,
    pub map_name: String,
    pub point_count: usize,
    pub total_scans: u64,
    pub total_readings: usize,
}

/// Grand totals across every map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyTotals {
    pub point_count: usize,
    pub total_scans: u64,
    pub total_readings: usize,
}

/// Groups points by map and totals their scans and readings, most-surveyed
/// maps first. Points whose map has left the catalog are still counted,
/// labeled with their raw map id.
pub fn map_statistics(points: &[ReferencePoint]) -> Vec<MapStatistics> {
    let mut by_map: BTreeMap<&str, Vec<&ReferencePoint>> = BTreeMap::new();
    for point in points {
        by_map.entry(point.image_id.as_str()).or_default().push(point);
    }

    let mut stats: Vec<MapStatistics> = by_map
        .into_iter()
        .map(|(map_id, points)| MapStatistics {
            map_id: map_id.to_string(),
            map_name: find_map_image(map_id)
                .map(|m| m.name)
                .unwrap_or_else(|| map_id.to_string()),
            point_count: points.len(),
            total_scans: points.iter().map(|p| u64::from(p.scan_count)).sum(),
            total_readings: points.iter().map(|p| p.wifi_readings.len()).sum(),
        })
        .collect();

    stats.sort_by(|a, b| b.point_count.cmp(&a.point_count));
    stats
}

pub fn survey_totals(points: &[ReferencePoint]) -> SurveyTotals {
    SurveyTotals {
        point_count: points.len(),
        total_scans: points.iter().map(|p| u64::from(p.scan_count)).sum(),
        total_readings: points.iter().map(|p| p.wifi_readings.len()).sum(),
    }
}

#[cfg(test)]
mod tests {
    use crate::models::WifiReading;
    use chrono::Utc;

    use super::*;

    fn point_on(map_id: &str, scans: u32, readings: usize) -> ReferencePoint {
        let mut point = ReferencePoint::new("p", 10.0, 10.0, map_id).unwrap();
        point.scan_count = scans;
        point.wifi_readings = (0..readings)
            .map(|i| {
                WifiReading::new(
                    format!("02:00:00:00:00:{i:02x}"),
                    "net",
                    -50,
                    2412,
                    format!("{}-scan-1", point.id),
                    Utc::now(),
                )
            })
            .collect();
        point
    }

    #[test]
    fn groups_by_map_and_sorts_by_point_count() {
        let points = vec![
            point_on("se1", 3, 4),
            point_on("se2", 5, 2),
            point_on("se2", 4, 1),
        ];

        let stats = map_statistics(&points);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].map_id, "se2");
        assert_eq!(stats[0].point_count, 2);
        assert_eq!(stats[0].total_scans, 9);
        assert_eq!(stats[0].total_readings, 3);
        assert_eq!(stats[1].map_id, "se1");
    }

    #[test]
    fn totals_cover_every_point() {
        let points = vec![point_on("se1", 3, 4), point_on("sea4", 5, 6)];
        let totals = survey_totals(&points);
        assert_eq!(totals.point_count, 2);
        assert_eq!(totals.total_scans, 8);
        assert_eq!(totals.total_readings, 10);
    }

    #[test]
    fn unknown_maps_keep_their_raw_id() {
        let stats = map_statistics(&[point_on("demolished", 1, 0)]);
        assert_eq!(stats[0].map_name, "demolished");
    }
}
