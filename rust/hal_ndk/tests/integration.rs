use hal_ndk::{Error, STATUS_OK};

#[test]
fn status_errors_render_symbolic_names() {
    let err = Error::Status {
        context: "AIBinder_setExtension",
        status: -38,
    };
    assert_eq!(
        err.to_string(),
        "AIBinder_setExtension: binder status STATUS_INVALID_OPERATION (-38)"
    );
    assert_eq!(hal_ndk::status_name(STATUS_OK), "STATUS_OK");
}

#[test]
fn failed_ping_reports_the_binder_status() {
    let err = Error::Status {
        context: "AIBinder_ping",
        status: -32,
    };
    let report = format!(
        "{:#}",
        anyhow::Error::new(err)
            .context("binder ping failed for android.hardware.vibrator.IVibrator/default")
    );
    assert_eq!(
        report,
        "binder ping failed for android.hardware.vibrator.IVibrator/default: \
         AIBinder_ping: binder status STATUS_DEAD_OBJECT (-32)"
    );
}

#[cfg(target_os = "android")]
#[test]
fn vibrator_extension_smoke() -> anyhow::Result<()> {
    if std::env::var("VIBRATOR_TESTS").ok().as_deref() != Some("1") {
        eprintln!("skipping binder integration test (VIBRATOR_TESTS != 1)");
        return Ok(());
    }

    let instance = "android.hardware.vibrator.IVibrator/default";
    assert!(hal_ndk::ping(instance)?, "{instance} is not alive");

    let binder = hal_ndk::check_service(instance)?.expect("service registered");
    let extension = hal_ndk::get_extension(&binder)?;
    assert!(extension.is_some(), "{instance} has no extension attached");
    Ok(())
}
