//! Bring-up sequence for the vibrator HAL process.
//!
//! Order matters and mirrors what clients observe:
//! thread pool sizing, object construction, extension attach, service
//! registration, then the deferred extension `init` thread. Attach and
//! registration failures are returned to the caller, which treats them as
//! fatal.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::{debug, error, info, warn};

use crate::{
    config::ServiceConfig,
    property::{PropertyStore, PropertyWait, WaitOutcome},
    Error, Result,
};

/// Name of the thread that runs the extension's deferred `init`.
pub const INIT_THREAD_NAME: &str = "richtap-init";

/// Process-wide binder plumbing.
pub trait BinderRuntime {
    type Binder;

    fn set_thread_pool_max_thread_count(&self, count: u32) -> hal_ndk::Result<()>;

    /// Make `extension` discoverable through `binder`'s extension lookup.
    fn set_extension(&self, binder: &Self::Binder, extension: &Self::Binder)
        -> hal_ndk::Result<()>;

    fn add_service(&self, binder: &Self::Binder, instance: &str) -> hal_ndk::Result<()>;

    /// Serve binder transactions on the calling thread. Only returns on failure.
    fn join_thread_pool(&self) -> hal_ndk::Result<()>;
}

/// The interface registered with the service manager.
pub trait PrimaryService {
    type Binder;

    fn descriptor(&self) -> &str;
    fn as_binder(&self) -> Result<Self::Binder>;
}

/// The vendor interface reachable as the primary binder's extension.
pub trait ExtensionService: Send + Sync + 'static {
    type Binder;

    fn descriptor(&self) -> &str;
    fn as_binder(&self) -> Result<Self::Binder>;

    /// One-shot initialization, run once the readiness property is set.
    fn init(&self) -> Result<()>;
}

/// Everything that must stay alive while the process serves binder calls.
pub struct Registration<P, E, B> {
    instance: String,
    // The primary binder handle has to outlive attach and registration.
    binder: B,
    primary: P,
    extension: Arc<E>,
    init_thread: Option<JoinHandle<()>>,
}

impl<P, E, B> Registration<P, E, B> {
    /// Name the primary binder was registered under.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn binder(&self) -> &B {
        &self.binder
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn extension(&self) -> &Arc<E> {
        &self.extension
    }

    /// Take the init thread handle. Dropping it leaves the thread detached.
    pub fn take_init_thread(&mut self) -> Option<JoinHandle<()>> {
        self.init_thread.take()
    }
}

/// Drives the bring-up against a binder runtime and a property store.
pub struct Bootstrap<R, S: ?Sized> {
    runtime: R,
    properties: Arc<S>,
    config: ServiceConfig,
}

impl<R, S> Bootstrap<R, S>
where
    R: BinderRuntime,
    S: PropertyStore + ?Sized + 'static,
{
    pub fn new(runtime: R, properties: Arc<S>, config: ServiceConfig) -> Self {
        Self {
            runtime,
            properties,
            config,
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Configure binder, build both services, attach, register and start
    /// the deferred extension init.
    ///
    /// Any error means the process must not keep running: on attach failure
    /// nothing has been registered yet.
    pub fn setup<P, E>(
        &self,
        make_primary: impl FnOnce() -> anyhow::Result<P>,
        make_extension: impl FnOnce() -> anyhow::Result<E>,
    ) -> Result<Registration<P, E, R::Binder>>
    where
        P: PrimaryService<Binder = R::Binder>,
        E: ExtensionService<Binder = R::Binder>,
    {
        let threads = self.config.max_binder_threads;
        match self.runtime.set_thread_pool_max_thread_count(threads) {
            Ok(()) => debug!("binder thread pool max threads set to {threads}"),
            Err(err) => warn!("could not size binder thread pool: {err}"),
        }

        let primary = make_primary()?;
        let binder = primary.as_binder()?;

        let extension = Arc::new(make_extension()?);
        let extension_binder = extension.as_binder()?;
        self.runtime
            .set_extension(&binder, &extension_binder)
            .map_err(Error::SetExtension)?;
        debug!(
            "attached {} as extension of {}",
            extension.descriptor(),
            primary.descriptor()
        );

        let instance = self.config.instance_name(primary.descriptor());
        self.runtime
            .add_service(&binder, &instance)
            .map_err(|source| Error::AddService {
                instance: instance.clone(),
                source,
            })?;
        info!("registered {instance}");

        let init_thread = spawn_extension_init(
            Arc::clone(&self.properties),
            self.config.calibrate.clone(),
            Arc::clone(&extension),
        )?;

        Ok(Registration {
            instance,
            binder,
            primary,
            extension,
            init_thread: Some(init_thread),
        })
    }

    /// Join the binder thread pool. Returning at all is a failure.
    pub fn serve<P, E>(&self, registration: Registration<P, E, R::Binder>) -> Error {
        info!("serving {}", registration.instance());
        if let Err(err) = self.runtime.join_thread_pool() {
            error!("binder thread pool join failed: {err}");
        }
        drop(registration);
        Error::ThreadPoolExited
    }
}

/// Start the thread that waits on `gate` and then runs `extension.init()`.
///
/// `init` runs exactly once whether the property showed up or the wait
/// timed out. There is no cancellation; callers normally drop the handle.
pub fn spawn_extension_init<S, E>(
    properties: Arc<S>,
    gate: PropertyWait,
    extension: Arc<E>,
) -> Result<JoinHandle<()>>
where
    S: PropertyStore + ?Sized + 'static,
    E: ExtensionService,
{
    thread::Builder::new()
        .name(INIT_THREAD_NAME.to_string())
        .spawn(move || {
            match properties.wait(&gate) {
                WaitOutcome::Ready { elapsed } => info!(
                    "{}={} after {:?}",
                    gate.name(),
                    gate.expected(),
                    elapsed
                ),
                WaitOutcome::TimedOut { elapsed } => info!(
                    "{} not {} after {:?}, initializing {} anyway",
                    gate.name(),
                    gate.expected(),
                    elapsed,
                    extension.descriptor()
                ),
            }

            match extension.init() {
                Ok(()) => info!("{} initialized", extension.descriptor()),
                Err(err) => error!("{} init failed: {err}", extension.descriptor()),
            }
        })
        .map_err(Error::SpawnInit)
}
