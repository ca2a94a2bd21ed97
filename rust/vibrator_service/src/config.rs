use std::time::Duration;

use crate::property::PropertyWait;

/// Instance suffix appended to the primary interface descriptor.
pub const DEFAULT_INSTANCE: &str = "default";

/// Set to `"1"` once haptic calibration has finished after boot.
pub const HAPTIC_CALIBRATE_PROPERTY: &str = "vendor.haptic.calibrate.done";
pub const HAPTIC_CALIBRATE_READY: &str = "1";
pub const HAPTIC_CALIBRATE_TIMEOUT: Duration = Duration::from_secs(500);

/// Bootstrap parameters for the vibrator service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Suffix registered after `<descriptor>/`.
    pub instance: String,
    /// Binder thread pool ceiling; `0` lets the pool grow on demand.
    pub max_binder_threads: u32,
    /// Readiness gate for the extension's `init`.
    pub calibrate: PropertyWait,
}

impl ServiceConfig {
    /// Full service manager name for an interface, e.g.
    /// `android.hardware.vibrator.IVibrator/default`.
    pub fn instance_name(&self, descriptor: &str) -> String {
        format!("{descriptor}/{}", self.instance)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.to_string(),
            max_binder_threads: 0,
            calibrate: PropertyWait::new(
                HAPTIC_CALIBRATE_PROPERTY,
                HAPTIC_CALIBRATE_READY,
                HAPTIC_CALIBRATE_TIMEOUT,
            ),
        }
    }
}
