//! Binds the bootstrap seams to `libbinder_ndk` and the vendor objects.

use hal_ndk::SpAIBinder;
use hal_vibrator::{RichtapVibrator, Vibrator};

use crate::{
    bootstrap::{BinderRuntime, ExtensionService, PrimaryService},
    Result,
};

/// The real binder runtime of this process.
#[derive(Clone, Copy, Debug, Default)]
pub struct NdkRuntime;

impl BinderRuntime for NdkRuntime {
    type Binder = SpAIBinder;

    fn set_thread_pool_max_thread_count(&self, count: u32) -> hal_ndk::Result<()> {
        hal_ndk::set_thread_pool_max_thread_count(count)
    }

    fn set_extension(&self, binder: &SpAIBinder, extension: &SpAIBinder) -> hal_ndk::Result<()> {
        hal_ndk::set_extension(binder, extension)
    }

    fn add_service(&self, binder: &SpAIBinder, instance: &str) -> hal_ndk::Result<()> {
        hal_ndk::add_service(binder, instance)
    }

    fn join_thread_pool(&self) -> hal_ndk::Result<()> {
        hal_ndk::join_thread_pool()
    }
}

impl PrimaryService for Vibrator {
    type Binder = SpAIBinder;

    fn descriptor(&self) -> &str {
        Vibrator::DESCRIPTOR
    }

    fn as_binder(&self) -> Result<SpAIBinder> {
        Ok(Vibrator::as_binder(self)?)
    }
}

impl ExtensionService for RichtapVibrator {
    type Binder = SpAIBinder;

    fn descriptor(&self) -> &str {
        RichtapVibrator::DESCRIPTOR
    }

    fn as_binder(&self) -> Result<SpAIBinder> {
        Ok(RichtapVibrator::as_binder(self)?)
    }

    fn init(&self) -> Result<()> {
        Ok(RichtapVibrator::init(self)?)
    }
}
