//! Wi-Fi fingerprint reference-point acquisition.
//!
//! Tap a location on a floor plan, scan the surrounding access points a
//! bounded number of times, and aggregate the readings into a persisted
//! reference point for later positioning use. The crate owns the pipeline
//! between the tap and the store; screens, gestures, and permission prompts
//! belong to the host application.

pub mod catalog;
pub mod db;
pub mod export;
pub mod geometry;
pub mod models;
pub mod scanner;
pub mod stats;
pub mod survey;

pub use catalog::{available_map_images, AreaCode, MapImage};
pub use db::Database;
pub use geometry::{resolve_tap, ImageSize, MapPosition, ViewTransform};
pub use models::{ReferencePoint, WifiReading};
pub use scanner::{Capability, PermissionGate, ScanEntry, WifiScanner};
pub use survey::{
    NewPointRequest, ScanProgress, SurveyController, SurveyOutcome, SurveySummary,
};
