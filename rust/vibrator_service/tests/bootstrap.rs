use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::anyhow;
use vibrator_service::{
    spawn_extension_init, BinderRuntime, Bootstrap, Error, ExtensionService, MemoryProperties,
    PrimaryService, PropertyWait, ServiceConfig,
};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    ThreadPool(u32),
    SetExtension(&'static str, &'static str),
    AddService(&'static str, String),
    Join,
}

#[derive(Default)]
struct FakeRuntime {
    calls: Mutex<Vec<Call>>,
    created: Arc<Mutex<Vec<&'static str>>>,
    fail_extension: bool,
    fail_add_service: bool,
}

impl FakeRuntime {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BinderRuntime for FakeRuntime {
    type Binder = &'static str;

    fn set_thread_pool_max_thread_count(&self, count: u32) -> hal_ndk::Result<()> {
        assert!(
            self.created.lock().unwrap().is_empty(),
            "thread pool must be sized before services are built"
        );
        self.record(Call::ThreadPool(count));
        Ok(())
    }

    fn set_extension(
        &self,
        binder: &&'static str,
        extension: &&'static str,
    ) -> hal_ndk::Result<()> {
        self.record(Call::SetExtension(*binder, *extension));
        if self.fail_extension {
            return Err(hal_ndk::Error::Status {
                context: "AIBinder_setExtension",
                status: -38,
            });
        }
        Ok(())
    }

    fn add_service(&self, binder: &&'static str, instance: &str) -> hal_ndk::Result<()> {
        self.record(Call::AddService(*binder, instance.to_string()));
        if self.fail_add_service {
            return Err(hal_ndk::Error::Exception {
                context: "AServiceManager_addService",
                exception: -1,
            });
        }
        Ok(())
    }

    fn join_thread_pool(&self) -> hal_ndk::Result<()> {
        self.record(Call::Join);
        Ok(())
    }
}

struct FakeVibrator;

impl PrimaryService for FakeVibrator {
    type Binder = &'static str;

    fn descriptor(&self) -> &str {
        "android.hardware.vibrator.IVibrator"
    }

    fn as_binder(&self) -> vibrator_service::Result<&'static str> {
        Ok("vibrator-binder")
    }
}

#[derive(Clone, Default)]
struct FakeRichtap {
    inits: Arc<AtomicUsize>,
    init_at: Arc<Mutex<Option<Instant>>>,
    fail_init: bool,
}

impl FakeRichtap {
    fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    fn init_at(&self) -> Instant {
        self.init_at.lock().unwrap().expect("init timestamp")
    }
}

impl ExtensionService for FakeRichtap {
    type Binder = &'static str;

    fn descriptor(&self) -> &str {
        "vendor.aac.hardware.richtap.vibrator.IRichtapVibrator"
    }

    fn as_binder(&self) -> vibrator_service::Result<&'static str> {
        Ok("richtap-binder")
    }

    fn init(&self) -> vibrator_service::Result<()> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        *self.init_at.lock().unwrap() = Some(Instant::now());
        if self.fail_init {
            return Err(anyhow!("haptic firmware missing").into());
        }
        Ok(())
    }
}

fn config_with_timeout(timeout: Duration) -> ServiceConfig {
    ServiceConfig {
        calibrate: PropertyWait::new("vendor.haptic.calibrate.done", "1", timeout)
            .with_poll_interval(Duration::from_millis(5)),
        ..ServiceConfig::default()
    }
}

fn bootstrap(
    runtime: FakeRuntime,
    timeout: Duration,
) -> (Bootstrap<FakeRuntime, MemoryProperties>, Arc<MemoryProperties>) {
    let properties = Arc::new(MemoryProperties::new());
    let bootstrap = Bootstrap::new(runtime, Arc::clone(&properties), config_with_timeout(timeout));
    (bootstrap, properties)
}

fn make_vibrator(
    created: &Arc<Mutex<Vec<&'static str>>>,
) -> impl FnOnce() -> anyhow::Result<FakeVibrator> {
    let created = Arc::clone(created);
    move || {
        created.lock().unwrap().push("vibrator");
        Ok(FakeVibrator)
    }
}

#[test]
fn registers_default_instance_with_extension_attached() {
    let runtime = FakeRuntime::default();
    let created = Arc::clone(&runtime.created);
    let (bootstrap, properties) = bootstrap(runtime, Duration::from_secs(30));
    properties.set("vendor.haptic.calibrate.done", "1");

    let mut registration = bootstrap
        .setup(make_vibrator(&created), || Ok(FakeRichtap::default()))
        .expect("setup succeeds");

    assert_eq!(
        registration.instance(),
        "android.hardware.vibrator.IVibrator/default"
    );
    assert_eq!(*registration.binder(), "vibrator-binder");
    assert_eq!(
        registration.primary().descriptor(),
        "android.hardware.vibrator.IVibrator"
    );
    assert_eq!(
        bootstrap.runtime().calls(),
        vec![
            Call::ThreadPool(0),
            Call::SetExtension("vibrator-binder", "richtap-binder"),
            Call::AddService(
                "vibrator-binder",
                "android.hardware.vibrator.IVibrator/default".to_string()
            ),
        ]
    );

    registration
        .take_init_thread()
        .expect("init thread spawned")
        .join()
        .expect("init thread");
    assert_eq!(registration.extension().inits(), 1);
}

#[test]
fn extension_attach_failure_stops_before_registration() {
    let runtime = FakeRuntime {
        fail_extension: true,
        ..FakeRuntime::default()
    };
    let created = Arc::clone(&runtime.created);
    let (bootstrap, properties) = bootstrap(runtime, Duration::from_millis(10));
    properties.set("vendor.haptic.calibrate.done", "1");
    let richtap = FakeRichtap::default();
    let probe = richtap.clone();

    let result = bootstrap.setup(make_vibrator(&created), move || Ok(richtap));

    match result {
        Err(Error::SetExtension(hal_ndk::Error::Status { status, .. })) => assert_eq!(status, -38),
        Err(other) => panic!("expected SetExtension error, got {other:?}"),
        Ok(_) => panic!("setup must fail when the extension cannot be attached"),
    }
    assert!(!bootstrap
        .runtime()
        .calls()
        .iter()
        .any(|call| matches!(call, Call::AddService(..))));
    thread::sleep(Duration::from_millis(50));
    assert_eq!(probe.inits(), 0);
}

#[test]
fn registration_failure_is_reported_and_skips_init() {
    let runtime = FakeRuntime {
        fail_add_service: true,
        ..FakeRuntime::default()
    };
    let created = Arc::clone(&runtime.created);
    let (bootstrap, properties) = bootstrap(runtime, Duration::from_millis(10));
    properties.set("vendor.haptic.calibrate.done", "1");

    let richtap = FakeRichtap::default();
    let probe = richtap.clone();
    let result = bootstrap.setup(make_vibrator(&created), move || Ok(richtap));

    match result {
        Err(Error::AddService { instance, .. }) => {
            assert_eq!(instance, "android.hardware.vibrator.IVibrator/default");
        }
        Err(other) => panic!("expected AddService error, got {other:?}"),
        Ok(_) => panic!("setup must fail when registration fails"),
    }
    thread::sleep(Duration::from_millis(50));
    assert_eq!(probe.inits(), 0);
}

#[test]
fn construction_failure_is_fatal() {
    let (bootstrap, _properties) = bootstrap(FakeRuntime::default(), Duration::from_millis(10));
    let result = bootstrap.setup(
        || -> anyhow::Result<FakeVibrator> { Err(anyhow!("no vibrator device")) },
        || Ok(FakeRichtap::default()),
    );
    assert!(matches!(result, Err(Error::Hal(_))));
    assert_eq!(bootstrap.runtime().calls(), vec![Call::ThreadPool(0)]);
}

#[test]
fn init_runs_once_promptly_after_property_is_set() {
    let properties = Arc::new(MemoryProperties::new());
    let extension = Arc::new(FakeRichtap::default());
    let gate = PropertyWait::new("vendor.haptic.calibrate.done", "1", Duration::from_secs(60));

    let handle = spawn_extension_init(Arc::clone(&properties), gate, Arc::clone(&extension))
        .expect("spawn init thread");

    thread::sleep(Duration::from_millis(50));
    assert_eq!(extension.inits(), 0, "init must wait for the property");

    let set_at = Instant::now();
    properties.set("vendor.haptic.calibrate.done", "1");
    handle.join().expect("init thread");

    assert_eq!(extension.inits(), 1);
    assert!(extension.init_at().duration_since(set_at) < Duration::from_secs(5));
}

#[test]
fn init_runs_once_after_timeout_when_property_never_set() {
    let properties = Arc::new(MemoryProperties::new());
    let extension = Arc::new(FakeRichtap::default());
    let timeout = Duration::from_millis(80);
    let gate = PropertyWait::new("vendor.haptic.calibrate.done", "1", timeout);

    let started = Instant::now();
    let handle = spawn_extension_init(properties, gate, Arc::clone(&extension))
        .expect("spawn init thread");
    handle.join().expect("init thread");

    assert_eq!(extension.inits(), 1);
    assert!(extension.init_at().duration_since(started) >= timeout);
}

#[test]
fn init_error_is_swallowed() {
    let properties = Arc::new(MemoryProperties::new());
    properties.set("vendor.haptic.calibrate.done", "1");
    let extension = Arc::new(FakeRichtap {
        fail_init: true,
        ..FakeRichtap::default()
    });
    let gate = PropertyWait::new("vendor.haptic.calibrate.done", "1", Duration::from_secs(60));

    let handle = spawn_extension_init(properties, gate, Arc::clone(&extension))
        .expect("spawn init thread");
    assert!(handle.join().is_ok(), "init failure must not panic the thread");
    assert_eq!(extension.inits(), 1);
}

#[test]
fn init_thread_is_named() {
    let properties = Arc::new(MemoryProperties::new());
    let gate = PropertyWait::new("vendor.haptic.calibrate.done", "1", Duration::from_millis(1));
    let handle = spawn_extension_init(properties, gate, Arc::new(FakeRichtap::default()))
        .expect("spawn init thread");
    assert_eq!(handle.thread().name(), Some("richtap-init"));
    handle.join().expect("init thread");
}

#[test]
fn serve_returning_is_a_failure() {
    let runtime = FakeRuntime::default();
    let created = Arc::clone(&runtime.created);
    let (bootstrap, _properties) = bootstrap(runtime, Duration::from_millis(10));
    let mut registration = bootstrap
        .setup(make_vibrator(&created), || Ok(FakeRichtap::default()))
        .expect("setup succeeds");
    let init = registration.take_init_thread().expect("init thread spawned");

    let err = bootstrap.serve(registration);

    assert!(matches!(err, Error::ThreadPoolExited));
    assert_eq!(bootstrap.runtime().calls().last(), Some(&Call::Join));
    init.join().expect("init thread");
}
