//! Synthetic scan source for hosts without scan hardware.

use std::sync::Mutex;

use anyhow::Result;
use rand::Rng;

use super::{ScanEntry, WifiScanner};

const SIMULATED_SSIDS: [&str; 6] = [
    "se-staff",
    "se-guest",
    "eduroam",
    "lab-iot",
    "printer-direct",
    "",
];

/// Generates a stable set of access points whose signal levels jitter on
/// every trigger, roughly like standing still while the radio environment
/// fluctuates.
pub struct SimulatedScanner {
    networks: Mutex<Vec<ScanEntry>>,
}

impl SimulatedScanner {
    pub fn new(network_count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let networks = (0..network_count)
            .map(|i| ScanEntry {
                bssid: format!(
                    "02:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                    rng.gen::<u8>(),
                    rng.gen::<u8>(),
                    rng.gen::<u8>(),
                    rng.gen::<u8>(),
                    i as u8
                ),
                ssid: SIMULATED_SSIDS[i % SIMULATED_SSIDS.len()].to_string(),
                level: rng.gen_range(-90..=-30),
                frequency: if rng.gen_bool(0.5) { 2412 } else { 5180 },
            })
            .collect();

        Self {
            networks: Mutex::new(networks),
        }
    }
}

impl WifiScanner for SimulatedScanner {
    fn trigger(&self) -> Result<()> {
        let mut rng = rand::thread_rng();
        let mut networks = self.networks.lock().unwrap();
        for entry in networks.iter_mut() {
            let jitter = rng.gen_range(-4..=4);
            entry.level = (entry.level + jitter).clamp(-95, -25);
        }
        Ok(())
    }

    fn last_results(&self) -> Result<Vec<ScanEntry>> {
        Ok(self.networks.lock().unwrap().clone())
    }
}
