use thiserror::Error;

/// `binder_status_t` as returned by the NDK.
pub type Status = i32;

/// `binder_exception_t` as returned by the service manager calls.
pub type Exception = i32;

pub const STATUS_OK: Status = 0;
pub const EX_NONE: Exception = 0;

/// Errors surfaced by the binder NDK wrappers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{context}: binder status {} ({status})", named_status(.status))]
    Status {
        context: &'static str,
        status: Status,
    },

    #[error("{context}: binder exception {} ({exception})", named_exception(.exception))]
    Exception {
        context: &'static str,
        exception: Exception,
    },

    #[error("invalid service instance name {0:?}")]
    InvalidInstance(String),

    #[error("binder thread pool already started; max thread count is fixed")]
    ThreadPoolStarted,

    #[error("binder operation is only supported on Android targets")]
    UnsupportedPlatform,
}

/// Convenient alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg_attr(not(target_os = "android"), allow(dead_code))]
pub(crate) fn check_status(status: Status, context: &'static str) -> Result<()> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(Error::Status { context, status })
    }
}

#[cfg_attr(not(target_os = "android"), allow(dead_code))]
pub(crate) fn check_exception(exception: Exception, context: &'static str) -> Result<()> {
    if exception == EX_NONE {
        Ok(())
    } else {
        Err(Error::Exception { context, exception })
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn named_status(status: &Status) -> &'static str {
    status_name(*status)
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn named_exception(exception: &Exception) -> &'static str {
    exception_name(*exception)
}

/// Symbolic name of a `binder_status_t`, matching `android/binder_status.h`.
#[must_use]
pub fn status_name(status: Status) -> &'static str {
    const UNKNOWN_ERROR: Status = i32::MIN;
    match status {
        STATUS_OK => "STATUS_OK",
        UNKNOWN_ERROR => "STATUS_UNKNOWN_ERROR",
        s if s == UNKNOWN_ERROR + 1 => "STATUS_BAD_TYPE",
        s if s == UNKNOWN_ERROR + 2 => "STATUS_FAILED_TRANSACTION",
        s if s == UNKNOWN_ERROR + 7 => "STATUS_FDS_NOT_ALLOWED",
        s if s == UNKNOWN_ERROR + 8 => "STATUS_UNEXPECTED_NULL",
        -1 => "STATUS_PERMISSION_DENIED",
        -2 => "STATUS_NAME_NOT_FOUND",
        -11 => "STATUS_WOULD_BLOCK",
        -12 => "STATUS_NO_MEMORY",
        -17 => "STATUS_ALREADY_EXISTS",
        -19 => "STATUS_NO_INIT",
        -22 => "STATUS_BAD_VALUE",
        -32 => "STATUS_DEAD_OBJECT",
        -38 => "STATUS_INVALID_OPERATION",
        -61 => "STATUS_NOT_ENOUGH_DATA",
        -74 => "STATUS_UNKNOWN_TRANSACTION",
        -75 => "STATUS_BAD_INDEX",
        -110 => "STATUS_TIMED_OUT",
        _ => "unknown status",
    }
}

/// Symbolic name of a `binder_exception_t`.
#[must_use]
pub fn exception_name(exception: Exception) -> &'static str {
    match exception {
        EX_NONE => "EX_NONE",
        -1 => "EX_SECURITY",
        -2 => "EX_BAD_PARCELABLE",
        -3 => "EX_ILLEGAL_ARGUMENT",
        -4 => "EX_NULL_POINTER",
        -5 => "EX_ILLEGAL_STATE",
        -6 => "EX_NETWORK_MAIN_THREAD",
        -7 => "EX_UNSUPPORTED_OPERATION",
        -8 => "EX_SERVICE_SPECIFIC",
        -9 => "EX_PARCELABLE",
        -129 => "EX_TRANSACTION_FAILED",
        _ => "unknown exception",
    }
}
