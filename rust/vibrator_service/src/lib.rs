//! Entry-point plumbing for the vibrator HAL service.
//!
//! The process registers `android.hardware.vibrator.IVibrator/default`,
//! attaches the RichTap vendor interface as that binder's extension, and
//! initializes the extension once haptic calibration is reported done.

pub mod bootstrap;
pub mod config;
mod error;
pub mod logging;
pub mod platform;
pub mod property;

pub use crate::bootstrap::{
    spawn_extension_init, BinderRuntime, Bootstrap, ExtensionService, PrimaryService,
    Registration,
};
pub use crate::config::ServiceConfig;
pub use crate::error::{Error, Result};
pub use crate::platform::NdkRuntime;
pub use crate::property::{
    MemoryProperties, PropertyStore, PropertyWait, SystemProperties, WaitOutcome,
};
