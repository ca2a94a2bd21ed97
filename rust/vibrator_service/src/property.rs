//! Waiting on system properties.
//!
//! The extension's `init` is gated on a property that an external actor
//! flips once haptic calibration finishes. [`PropertyStore`] abstracts the
//! property backend so the wait can be exercised off-device.

use std::{
    collections::HashMap,
    sync::{Condvar, Mutex, PoisonError},
    thread::sleep,
    time::{Duration, Instant},
};

use log::{debug, warn};

use crate::{Error, Result};

/// Default poll interval for backends without change notification.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A property name, the value to wait for and how long to wait.
#[derive(Clone, Debug)]
pub struct PropertyWait {
    name: String,
    expected: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl PropertyWait {
    pub fn new(name: impl Into<String>, expected: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            expected: expected.into(),
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval used between reads.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// How a [`PropertyWait`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready { elapsed: Duration },
    TimedOut { elapsed: Duration },
}

impl WaitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, WaitOutcome::Ready { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match *self {
            WaitOutcome::Ready { elapsed } | WaitOutcome::TimedOut { elapsed } => elapsed,
        }
    }
}

/// Read access to a key/value property space.
pub trait PropertyStore: Send + Sync {
    /// Current value of `name`, or `None` when unset.
    fn get(&self, name: &str) -> Result<Option<String>>;

    /// Block until `request` is satisfied or its timeout elapses.
    fn wait(&self, request: &PropertyWait) -> WaitOutcome {
        poll_until(self, request)
    }
}

/// Poll `store` until the property holds the expected value.
///
/// Read errors count as "not yet"; the first one is logged.
pub fn poll_until<S: PropertyStore + ?Sized>(store: &S, request: &PropertyWait) -> WaitOutcome {
    let start = Instant::now();
    let mut reported = false;

    loop {
        match store.get(request.name()) {
            Ok(Some(value)) if value == request.expected() => {
                return WaitOutcome::Ready {
                    elapsed: start.elapsed(),
                };
            }
            Ok(value) => debug!("{} is {:?}, waiting", request.name(), value),
            Err(err) => {
                if !reported {
                    warn!("{err}; will keep polling until timeout");
                    reported = true;
                }
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= request.timeout() {
            return WaitOutcome::TimedOut { elapsed };
        }
        sleep(request.poll_interval().min(request.timeout() - elapsed));
    }
}

/// Android system properties, read through bionic.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemProperties;

#[cfg(target_os = "android")]
impl PropertyStore for SystemProperties {
    fn get(&self, name: &str) -> Result<Option<String>> {
        use std::ffi::{CStr, CString};
        use std::os::raw::c_char;

        const PROP_VALUE_MAX: usize = 92;

        let c_name = CString::new(name).map_err(|_| Error::Property {
            name: name.to_owned(),
            reason: "name contains a nul byte".into(),
        })?;
        let mut buf = [0 as c_char; PROP_VALUE_MAX];
        // Safety: bionic writes at most PROP_VALUE_MAX bytes including the nul.
        let len = unsafe { libc::__system_property_get(c_name.as_ptr(), buf.as_mut_ptr()) };
        if len <= 0 {
            return Ok(None);
        }
        let value = unsafe { CStr::from_ptr(buf.as_ptr()) };
        Ok(Some(value.to_string_lossy().into_owned()))
    }
}

#[cfg(not(target_os = "android"))]
impl PropertyStore for SystemProperties {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let _ = name;
        Err(Error::UnsupportedPlatform)
    }
}

/// In-process property space that wakes waiters as soon as a value changes.
#[derive(Debug, Default)]
pub struct MemoryProperties {
    values: Mutex<HashMap<String, String>>,
    changed: Condvar,
}

impl MemoryProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(name.into(), value.into());
        self.changed.notify_all();
    }
}

impl PropertyStore for MemoryProperties {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(name).cloned())
    }

    fn wait(&self, request: &PropertyWait) -> WaitOutcome {
        let start = Instant::now();
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);

        loop {
            if values.get(request.name()).map(String::as_str) == Some(request.expected()) {
                return WaitOutcome::Ready {
                    elapsed: start.elapsed(),
                };
            }
            let elapsed = start.elapsed();
            if elapsed >= request.timeout() {
                return WaitOutcome::TimedOut { elapsed };
            }
            values = self
                .changed
                .wait_timeout(values, request.timeout() - elapsed)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}
