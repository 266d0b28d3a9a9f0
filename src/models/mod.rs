pub mod reference_point;
pub mod wifi_reading;

pub use reference_point::ReferencePoint;
pub use wifi_reading::{WifiReading, UNKNOWN_SSID};
