//! Boundary to the platform's Wi-Fi scan facility and permission system.
//!
//! The scan hardware is a single shared, stateful resource: `trigger` is
//! fire-and-forget and `last_results` reads whatever snapshot the platform
//! currently holds. Only one sequence may drive it at a time.

pub mod simulated;

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use simulated::SimulatedScanner;

/// Location capability required before the platform will return scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    FineLocation,
    CoarseLocation,
}

/// Host-side permission state. Granting is user-mediated and happens in the
/// host UI; the scan sequence only ever consults `is_granted`.
pub trait PermissionGate: Send + Sync {
    fn is_granted(&self, capability: Capability) -> bool;

    /// Asks the host to prompt for the given capabilities, returning the
    /// per-capability outcome.
    fn request(&self, capabilities: &[Capability]) -> HashMap<Capability, bool>;
}

/// One raw access-point entry from a scan snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEntry {
    pub bssid: String,
    pub ssid: String,
    pub level: i32,
    pub frequency: u32,
}

/// The platform scan facility. Implementations may block briefly; callers
/// run both methods off the async executor.
pub trait WifiScanner: Send + Sync {
    /// Kicks off a hardware scan. Results are not available until the
    /// platform has had time to settle.
    fn trigger(&self) -> Result<()>;

    /// Snapshot of the most recent results. May be empty.
    fn last_results(&self) -> Result<Vec<ScanEntry>>;
}
