use std::process::{self, ExitCode};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use hal_vibrator::{RichtapVibrator, Vibrator};
use log::{error, info, warn, LevelFilter};
use vibrator_service::{
    config::{self, ServiceConfig},
    logging, Bootstrap, NdkRuntime, PropertyWait, SystemProperties,
};

#[derive(Debug, Parser)]
#[command(
    name = "vibrator-service",
    about = "Vibrator HAL service with RichTap extension",
    version
)]
struct Args {
    /// Instance suffix registered after the IVibrator descriptor.
    #[arg(long, env = "VIBRATOR_INSTANCE", default_value = config::DEFAULT_INSTANCE)]
    instance: String,

    /// Property that signals haptic calibration is done.
    #[arg(
        long,
        env = "VIBRATOR_CALIBRATE_PROPERTY",
        default_value = config::HAPTIC_CALIBRATE_PROPERTY
    )]
    calibrate_property: String,

    /// Value of the calibration property that releases the RichTap init.
    #[arg(
        long,
        env = "VIBRATOR_CALIBRATE_VALUE",
        default_value = config::HAPTIC_CALIBRATE_READY
    )]
    calibrate_value: String,

    /// Seconds to wait for calibration before initializing anyway.
    #[arg(long, env = "VIBRATOR_CALIBRATE_TIMEOUT_SECS", default_value_t = 500)]
    calibrate_timeout_secs: u64,

    /// Poll interval in milliseconds while waiting on the property.
    #[arg(long, env = "VIBRATOR_POLL_INTERVAL_MS", default_value_t = 100)]
    poll_interval_ms: u64,

    #[arg(long, env = "VIBRATOR_LOG_LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            instance: self.instance.clone(),
            calibrate: PropertyWait::new(
                &self.calibrate_property,
                &self.calibrate_value,
                Duration::from_secs(self.calibrate_timeout_secs),
            )
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms.max(1))),
            ..ServiceConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.log_level);
    info!(
        "{} v{} starting (pid={})",
        logging::LOG_TAG,
        env!("CARGO_PKG_VERSION"),
        process::id()
    );

    let bootstrap = Bootstrap::new(NdkRuntime, Arc::new(SystemProperties), args.service_config());
    let registration = match bootstrap.setup(Vibrator::new, RichtapVibrator::new) {
        Ok(registration) => registration,
        Err(err) => {
            error!("vibrator service setup failed: {err:#}");
            eprintln!("vibrator-service: setup failed: {err:#}");
            process::abort();
        }
    };

    match registration.primary().capabilities() {
        Ok(caps) => info!("vibrator capabilities: {:?}", caps),
        Err(err) => warn!("could not query vibrator capabilities: {err:#}"),
    }

    let err = bootstrap.serve(registration);
    error!("{err}");
    ExitCode::FAILURE
}
