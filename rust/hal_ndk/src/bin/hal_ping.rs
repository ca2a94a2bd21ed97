use anyhow::{bail, Context, Result};

const USAGE: &str = "usage: hal_ping <service-instance> [--extension]";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let instance = args.next().context(USAGE)?;
    let want_extension = match args.next().as_deref() {
        None => false,
        Some("--extension") => true,
        Some(other) => bail!("unexpected argument {other:?}\n{USAGE}"),
    };

    let ok = hal_ndk::ping(&instance)
        .with_context(|| format!("binder ping failed for {instance}"))?;
    println!("{}: {}", instance, ok);
    if !ok {
        bail!("{} is not registered with the service manager", instance);
    }

    if want_extension {
        let binder = hal_ndk::check_service(&instance)?
            .with_context(|| format!("{instance} disappeared after ping"))?;
        match hal_ndk::get_extension(&binder)? {
            Some(ext) => match hal_ndk::ping_binder(&ext) {
                Ok(()) => println!("{}: extension attached (alive)", instance),
                Err(err) => bail!("{} extension attached but not alive: {}", instance, err),
            },
            None => bail!("{} has no binder extension attached", instance),
        }
    }
    Ok(())
}
