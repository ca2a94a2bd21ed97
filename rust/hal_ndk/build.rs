use std::env;

fn main() {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "android" {
        println!(
            "cargo:warning=hal_ndk targets Android; skipping libbinder_ndk linkage for {}",
            target_os
        );
        return;
    }

    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if !matches!(target_arch.as_str(), "aarch64" | "x86_64" | "arm" | "x86") {
        panic!("Unsupported target architecture '{}' for libbinder_ndk", target_arch);
    }

    if let Ok(dir) = env::var("BINDER_NDK_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir);
    }
    println!("cargo:rerun-if-env-changed=BINDER_NDK_LIB_DIR");
    println!("cargo:rustc-link-lib=binder_ndk");
}
