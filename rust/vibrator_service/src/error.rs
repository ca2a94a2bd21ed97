use thiserror::Error;

/// Errors produced while bringing up the vibrator service.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to attach binder extension: {0}")]
    SetExtension(#[source] hal_ndk::Error),

    #[error("failed to register service {instance}: {source}")]
    AddService {
        instance: String,
        #[source]
        source: hal_ndk::Error,
    },

    #[error("failed to spawn extension init thread: {0}")]
    SpawnInit(#[source] std::io::Error),

    #[error("binder thread pool exited unexpectedly")]
    ThreadPoolExited,

    #[error("failed to read property {name}: {reason}")]
    Property { name: String, reason: String },

    #[error("operation is only supported on Android targets")]
    UnsupportedPlatform,

    #[error(transparent)]
    Hal(#[from] anyhow::Error),
}

/// Convenient alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;
