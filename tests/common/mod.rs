//! Shared fixtures for the pipeline tests: a throwaway on-disk database and
//! scriptable scanner/permission doubles.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use uuid::Uuid;

use wifi_survey::db::Database;
use wifi_survey::scanner::{Capability, PermissionGate, ScanEntry, WifiScanner};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Fresh database under the system temp dir; a uuid in the filename keeps
/// parallel test binaries apart.
pub fn temp_database() -> Database {
    let path = std::env::temp_dir().join(format!("wifi-survey-test-{}.sqlite", Uuid::new_v4()));
    Database::new(path).expect("temp database should initialize")
}

pub fn entry(bssid: &str, ssid: &str) -> ScanEntry {
    ScanEntry {
        bssid: bssid.to_string(),
        ssid: ssid.to_string(),
        level: -52,
        frequency: 2412,
    }
}

/// Returns one scripted batch per snapshot read, then empty batches.
pub struct ScriptedScanner {
    batches: Mutex<Vec<Vec<ScanEntry>>>,
}

impl ScriptedScanner {
    pub fn new(batches: Vec<Vec<ScanEntry>>) -> Self {
        Self {
            batches: Mutex::new(batches),
        }
    }
}

impl WifiScanner for ScriptedScanner {
    fn trigger(&self) -> Result<()> {
        Ok(())
    }

    fn last_results(&self) -> Result<Vec<ScanEntry>> {
        let mut batches = self.batches.lock().unwrap();
        if batches.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(batches.remove(0))
        }
    }
}

/// Permission gate answering from a fixed per-attempt script; once the
/// script runs out it repeats the final answer.
pub struct ScriptedPermissions {
    answers: Mutex<Vec<bool>>,
    fallback: bool,
}

impl ScriptedPermissions {
    pub fn granted() -> Self {
        Self {
            answers: Mutex::new(Vec::new()),
            fallback: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            answers: Mutex::new(Vec::new()),
            fallback: false,
        }
    }

    pub fn sequence(answers: Vec<bool>) -> Self {
        let fallback = answers.last().copied().unwrap_or(true);
        Self {
            answers: Mutex::new(answers),
            fallback,
        }
    }
}

impl PermissionGate for ScriptedPermissions {
    fn is_granted(&self, _capability: Capability) -> bool {
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            self.fallback
        } else {
            answers.remove(0)
        }
    }

    fn request(&self, capabilities: &[Capability]) -> HashMap<Capability, bool> {
        capabilities.iter().map(|c| (*c, self.fallback)).collect()
    }
}
