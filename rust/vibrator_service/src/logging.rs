use android_logger::Config;
use log::{error, LevelFilter};

/// Logcat tag used by the service.
pub const LOG_TAG: &str = "vendor.qti.hardware.vibrator.service";

/// Route `log` records to logcat and panic messages along with them.
///
/// The previous panic hook still runs, so panics also reach stderr.
pub fn init(level: LevelFilter) {
    android_logger::init_once(Config::default().with_max_level(level).with_tag(LOG_TAG));
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_msg| {
        error!("{}", panic_msg);
        default_hook(panic_msg);
    }));
}
