use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label substituted for access points that broadcast an empty SSID.
pub const UNKNOWN_SSID: &str = "unknown network";

/// One observed access-point signal, tied to the scan attempt that produced
/// it via `batch_id` (`<session>-scan-<attempt>`). Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiReading {
    pub id: Option<i64>,
    pub bssid: String,
    pub ssid: String,
    /// Signal strength, dBm.
    pub level: i32,
    /// Channel frequency, MHz.
    pub frequency: u32,
    pub batch_id: String,
    pub scan_time: DateTime<Utc>,
}

impl WifiReading {
    /// The same BSSID may legitimately appear in several attempts; `ssid` is
    /// normalized to [`UNKNOWN_SSID`] when the network broadcasts none.
    pub fn new(
        bssid: impl Into<String>,
        ssid: &str,
        level: i32,
        frequency: u32,
        batch_id: impl Into<String>,
        scan_time: DateTime<Utc>,
    ) -> Self {
        let ssid = if ssid.is_empty() {
            UNKNOWN_SSID.to_string()
        } else {
            ssid.to_string()
        };

        Self {
            id: None,
            bssid: bssid.into(),
            ssid,
            level,
            frequency,
            batch_id: batch_id.into(),
            scan_time,
        }
    }
}
