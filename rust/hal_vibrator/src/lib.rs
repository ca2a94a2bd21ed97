#![deny(clippy::all, clippy::pedantic)]
//! Bindings to the vendor vibrator objects served by this HAL.
//!
//! `Vibrator` (the AOSP `IVibrator` implementation) and `RichtapVibrator`
//! (the AAC RichTap extension) live in vendor C++ code. A small static shim
//! exposes constructors and the few entry points the service needs.

use anyhow::{bail, Result};
use hal_ndk::SpAIBinder;

#[cfg(test)]
#[path = "../abi.rs"]
mod abi;

bitflags::bitflags! {
    /// Capability mask exposed by the AIDL IVibrator service.
    pub struct Caps: u64 {
        const ON_CALLBACK = 1 << 0;
        const PERFORM_CALLBACK = 1 << 1;
        const AMPLITUDE_CONTROL = 1 << 2;
        const EXTERNAL_CONTROL = 1 << 3;
        const EXTERNAL_AMPLITUDE_CONTROL = 1 << 4;
        const COMPOSE_EFFECTS = 1 << 5;
        const ALWAYS_ON_CONTROL = 1 << 6;
        const GET_RESONANT_FREQUENCY = 1 << 7;
        const GET_Q_FACTOR = 1 << 8;
        const FREQUENCY_CONTROL = 1 << 9;
        const COMPOSE_PWLE_EFFECTS = 1 << 10;
    }
}

#[cfg_attr(not(target_os = "android"), allow(dead_code))]
fn rc_to_result(rc: i32, context: &'static str) -> Result<()> {
    match rc {
        0 => Ok(()),
        -1 => bail!("{context}: vendor vibrator unavailable"),
        -22 => bail!("{context}: invalid argument"),
        other => bail!("{context}: unexpected error code {other}"),
    }
}

#[cfg(target_os = "android")]
mod ffi {
    use hal_ndk::AIBinder;

    #[repr(C)]
    pub struct VibratorHandle {
        _private: [u8; 0],
    }

    #[repr(C)]
    pub struct RichtapHandle {
        _private: [u8; 0],
    }

    extern "C" {
        pub fn vib_hal_vibrator_new() -> *mut VibratorHandle;
        pub fn vib_hal_vibrator_release(vib: *mut VibratorHandle);
        pub fn vib_hal_vibrator_as_binder(vib: *mut VibratorHandle) -> *mut AIBinder;
        pub fn vib_hal_vibrator_get_capabilities(vib: *mut VibratorHandle, out: *mut u64) -> i32;

        pub fn vib_hal_richtap_new() -> *mut RichtapHandle;
        pub fn vib_hal_richtap_release(ext: *mut RichtapHandle);
        pub fn vib_hal_richtap_as_binder(ext: *mut RichtapHandle) -> *mut AIBinder;
        /// Calls `RichtapVibrator::init(nullptr)`.
        pub fn vib_hal_richtap_init(ext: *mut RichtapHandle) -> i32;
    }
}

#[cfg(target_os = "android")]
mod imp {
    use std::ptr::NonNull;

    use anyhow::{anyhow, Result};
    use hal_ndk::SpAIBinder;

    use super::{ffi, rc_to_result, Caps};

    pub struct Vibrator(NonNull<ffi::VibratorHandle>);
    pub struct RichtapVibrator(NonNull<ffi::RichtapHandle>);

    // Safety: the handles wrap `std::shared_ptr`s to binder-backed objects
    // that the vendor code already serves from arbitrary binder threads.
    unsafe impl Send for Vibrator {}
    unsafe impl Sync for Vibrator {}
    unsafe impl Send for RichtapVibrator {}
    unsafe impl Sync for RichtapVibrator {}

    fn adopt(ptr: *mut hal_ndk::AIBinder, what: &str) -> Result<SpAIBinder> {
        // Safety: the shim returns a binder carrying one strong ref for us.
        unsafe { SpAIBinder::from_raw(ptr) }
            .ok_or_else(|| anyhow!("{what}: shim returned a null binder"))
    }

    impl Vibrator {
        pub fn new() -> Result<Self> {
            NonNull::new(unsafe { ffi::vib_hal_vibrator_new() })
                .map(Self)
                .ok_or_else(|| anyhow!("Vibrator: construction failed"))
        }

        pub fn as_binder(&self) -> Result<SpAIBinder> {
            adopt(unsafe { ffi::vib_hal_vibrator_as_binder(self.0.as_ptr()) }, "Vibrator")
        }

        pub fn capabilities(&self) -> Result<Caps> {
            let mut raw = 0_u64;
            rc_to_result(
                unsafe { ffi::vib_hal_vibrator_get_capabilities(self.0.as_ptr(), &mut raw) },
                "capabilities",
            )?;
            Ok(Caps::from_bits_truncate(raw))
        }
    }

    impl Drop for Vibrator {
        fn drop(&mut self) {
            unsafe { ffi::vib_hal_vibrator_release(self.0.as_ptr()) };
        }
    }

    impl RichtapVibrator {
        pub fn new() -> Result<Self> {
            NonNull::new(unsafe { ffi::vib_hal_richtap_new() })
                .map(Self)
                .ok_or_else(|| anyhow!("RichtapVibrator: construction failed"))
        }

        pub fn as_binder(&self) -> Result<SpAIBinder> {
            adopt(unsafe { ffi::vib_hal_richtap_as_binder(self.0.as_ptr()) }, "RichtapVibrator")
        }

        pub fn init(&self) -> Result<()> {
            rc_to_result(unsafe { ffi::vib_hal_richtap_init(self.0.as_ptr()) }, "richtap init")
        }
    }

    impl Drop for RichtapVibrator {
        fn drop(&mut self) {
            unsafe { ffi::vib_hal_richtap_release(self.0.as_ptr()) };
        }
    }
}

#[cfg(not(target_os = "android"))]
mod imp {
    use std::convert::Infallible;

    use anyhow::{bail, Result};
    use hal_ndk::SpAIBinder;

    use super::Caps;

    pub struct Vibrator(Infallible);
    pub struct RichtapVibrator(Infallible);

    impl Vibrator {
        pub fn new() -> Result<Self> {
            bail!("hal_vibrator::Vibrator is only available on Android targets");
        }

        pub fn as_binder(&self) -> Result<SpAIBinder> {
            match self.0 {}
        }

        pub fn capabilities(&self) -> Result<Caps> {
            match self.0 {}
        }
    }

    impl RichtapVibrator {
        pub fn new() -> Result<Self> {
            bail!("hal_vibrator::RichtapVibrator is only available on Android targets");
        }

        pub fn as_binder(&self) -> Result<SpAIBinder> {
            match self.0 {}
        }

        pub fn init(&self) -> Result<()> {
            match self.0 {}
        }
    }
}

/// The AOSP `IVibrator` implementation.
pub struct Vibrator(imp::Vibrator);

impl Vibrator {
    pub const DESCRIPTOR: &'static str = "android.hardware.vibrator.IVibrator";

    /// Construct the vendor vibrator object.
    pub fn new() -> Result<Self> {
        imp::Vibrator::new().map(Self)
    }

    /// Strong binder handle for the object.
    pub fn as_binder(&self) -> Result<SpAIBinder> {
        self.0.as_binder()
    }

    pub fn capabilities(&self) -> Result<Caps> {
        self.0.capabilities()
    }
}

/// The RichTap extension, attached to the `IVibrator` binder.
pub struct RichtapVibrator(imp::RichtapVibrator);

impl RichtapVibrator {
    pub const DESCRIPTOR: &'static str = "vendor.aac.hardware.richtap.vibrator.IRichtapVibrator";

    pub fn new() -> Result<Self> {
        imp::RichtapVibrator::new().map(Self)
    }

    pub fn as_binder(&self) -> Result<SpAIBinder> {
        self.0.as_binder()
    }

    /// Run the extension's one-time initialization with no callback.
    pub fn init(&self) -> Result<()> {
        self.0.init()
    }
}
