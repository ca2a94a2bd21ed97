use std::env;
use std::path::{Path, PathBuf};

#[path = "abi.rs"]
mod abi;

const SHIM_LIB: &str = "vibrator_hal_shim";

fn shim_dir(manifest_dir: &Path, abi: &str) -> PathBuf {
    match env::var_os("VIBRATOR_SHIM_DIR") {
        Some(dir) => PathBuf::from(dir).join(abi),
        None => manifest_dir.join("../../target/hal_shims").join(abi),
    }
}

fn main() {
    println!("cargo:rerun-if-changed=abi.rs");
    println!("cargo:rerun-if-env-changed=VIBRATOR_SHIM_DIR");

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("android") {
        return;
    }

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let Some(abi) = abi::android_abi(&arch) else {
        panic!("no Android ABI known for target_arch {arch:?}");
    };

    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let dir = shim_dir(&manifest_dir, abi);
    if !dir.join(format!("lib{SHIM_LIB}.a")).is_file() {
        panic!("lib{SHIM_LIB}.a missing from {}", dir.display());
    }

    println!("cargo:rustc-link-search=native={}", dir.display());
    println!("cargo:rustc-link-lib=static={SHIM_LIB}");
    println!("cargo:rustc-link-lib=c++_shared");
}
