#![deny(clippy::all, clippy::pedantic)]
//! Safe wrappers over `libbinder_ndk` for the vibrator HAL service.
//!
//! Only the handful of calls a HAL entry point needs are exposed: thread
//! pool control, service registration, extension attach/lookup and ping.
//! Non-Android builds compile but every call reports
//! [`Error::UnsupportedPlatform`].

mod error;

pub use crate::error::{
    exception_name, status_name, Error, Exception, Result, Status, EX_NONE, STATUS_OK,
};

#[cfg(target_os = "android")]
mod ndk {
    use std::ffi::CString;
    use std::os::raw::c_char;
    use std::ptr::{self, NonNull};

    use crate::error::{check_exception, check_status, Error, Exception, Result, Status};

    /// Opaque `AIBinder` from `android/binder_ibinder.h`.
    #[repr(C)]
    pub struct AIBinder {
        _private: [u8; 0],
    }

    extern "C" {
        fn ABinderProcess_setThreadPoolMaxThreadCount(num_threads: u32) -> bool;
        fn ABinderProcess_joinThreadPool();
        fn AIBinder_incStrong(binder: *mut AIBinder);
        fn AIBinder_decStrong(binder: *mut AIBinder);
        fn AIBinder_ping(binder: *mut AIBinder) -> Status;
        fn AIBinder_setExtension(binder: *mut AIBinder, ext: *mut AIBinder) -> Status;
        fn AIBinder_getExtension(binder: *mut AIBinder, out_ext: *mut *mut AIBinder) -> Status;
        fn AServiceManager_addService(binder: *mut AIBinder, instance: *const c_char) -> Exception;
        fn AServiceManager_checkService(instance: *const c_char) -> *mut AIBinder;
    }

    /// Owned strong reference to an `AIBinder`.
    #[derive(Debug)]
    pub struct SpAIBinder(NonNull<AIBinder>);

    // Safety: AIBinder reference counting is atomic and the NDK allows binder
    // objects to be used from any thread.
    unsafe impl Send for SpAIBinder {}
    unsafe impl Sync for SpAIBinder {}

    impl SpAIBinder {
        /// Adopt a strong reference already owned by the caller.
        ///
        /// # Safety
        ///
        /// `ptr` must be null or point to a live `AIBinder` carrying one
        /// strong reference that is transferred to the returned value.
        #[must_use]
        pub unsafe fn from_raw(ptr: *mut AIBinder) -> Option<Self> {
            NonNull::new(ptr).map(Self)
        }

        #[must_use]
        pub fn as_ptr(&self) -> *mut AIBinder {
            self.0.as_ptr()
        }
    }

    impl Clone for SpAIBinder {
        fn clone(&self) -> Self {
            // Safety: self holds a strong ref, so the binder is alive.
            unsafe { AIBinder_incStrong(self.as_ptr()) };
            Self(self.0)
        }
    }

    impl Drop for SpAIBinder {
        fn drop(&mut self) {
            // Safety: releases the strong ref this value owns.
            unsafe { AIBinder_decStrong(self.as_ptr()) };
        }
    }

    fn instance_cstr(instance: &str) -> Result<CString> {
        CString::new(instance).map_err(|_| Error::InvalidInstance(instance.to_owned()))
    }

    pub fn set_thread_pool_max_thread_count(count: u32) -> Result<()> {
        if unsafe { ABinderProcess_setThreadPoolMaxThreadCount(count) } {
            Ok(())
        } else {
            Err(Error::ThreadPoolStarted)
        }
    }

    pub fn join_thread_pool() -> Result<()> {
        unsafe { ABinderProcess_joinThreadPool() };
        Ok(())
    }

    pub fn set_extension(binder: &SpAIBinder, extension: &SpAIBinder) -> Result<()> {
        // Safety: both pointers are kept alive by the borrowed handles.
        let status = unsafe { AIBinder_setExtension(binder.as_ptr(), extension.as_ptr()) };
        check_status(status, "AIBinder_setExtension")
    }

    pub fn get_extension(binder: &SpAIBinder) -> Result<Option<SpAIBinder>> {
        let mut out = ptr::null_mut();
        let status = unsafe { AIBinder_getExtension(binder.as_ptr(), &mut out) };
        check_status(status, "AIBinder_getExtension")?;
        // Safety: on success the NDK hands back a strong ref (or null).
        Ok(unsafe { SpAIBinder::from_raw(out) })
    }

    pub fn add_service(binder: &SpAIBinder, instance: &str) -> Result<()> {
        let name = instance_cstr(instance)?;
        let exception = unsafe { AServiceManager_addService(binder.as_ptr(), name.as_ptr()) };
        check_exception(exception, "AServiceManager_addService")
    }

    pub fn check_service(instance: &str) -> Result<Option<SpAIBinder>> {
        let name = instance_cstr(instance)?;
        // Safety: checkService returns a strong ref or null.
        Ok(unsafe { SpAIBinder::from_raw(AServiceManager_checkService(name.as_ptr())) })
    }

    pub fn ping_binder(binder: &SpAIBinder) -> Result<()> {
        check_status(unsafe { AIBinder_ping(binder.as_ptr()) }, "AIBinder_ping")
    }
}

#[cfg(target_os = "android")]
pub use crate::ndk::{
    add_service, check_service, get_extension, join_thread_pool, ping_binder,
    set_extension, set_thread_pool_max_thread_count, AIBinder, SpAIBinder,
};

#[cfg(not(target_os = "android"))]
mod host {
    use std::convert::Infallible;

    use crate::error::{Error, Result};

    /// Strong binder reference. Cannot be constructed off Android.
    #[derive(Debug, Clone)]
    pub struct SpAIBinder {
        never: Infallible,
    }

    impl SpAIBinder {
        #[must_use]
        pub fn as_ptr(&self) -> *mut std::ffi::c_void {
            match self.never {}
        }
    }

    pub fn set_thread_pool_max_thread_count(count: u32) -> Result<()> {
        let _ = count;
        Err(Error::UnsupportedPlatform)
    }

    pub fn join_thread_pool() -> Result<()> {
        Err(Error::UnsupportedPlatform)
    }

    pub fn set_extension(binder: &SpAIBinder, _extension: &SpAIBinder) -> Result<()> {
        match binder.never {}
    }

    pub fn get_extension(binder: &SpAIBinder) -> Result<Option<SpAIBinder>> {
        match binder.never {}
    }

    pub fn add_service(binder: &SpAIBinder, _instance: &str) -> Result<()> {
        match binder.never {}
    }

    pub fn check_service(instance: &str) -> Result<Option<SpAIBinder>> {
        let _ = instance;
        Err(Error::UnsupportedPlatform)
    }

    pub fn ping_binder(binder: &SpAIBinder) -> Result<()> {
        match binder.never {}
    }
}

#[cfg(not(target_os = "android"))]
pub use crate::host::{
    add_service, check_service, get_extension, join_thread_pool, ping_binder,
    set_extension, set_thread_pool_max_thread_count, SpAIBinder,
};

/// Perform a binder `ping` call against the provided service instance name.
///
/// Returns `Ok(false)` when the service manager does not know the instance
/// and the ping's [`Error::Status`] when the binder does not answer.
pub fn ping(instance: &str) -> Result<bool> {
    match check_service(instance)? {
        Some(binder) => ping_binder(&binder).map(|()| true),
        None => Ok(false),
    }
}
