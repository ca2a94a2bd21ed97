/// NDK ABI directory for a Rust `target_arch`, as laid out under the shim
/// build root.
pub fn android_abi(target_arch: &str) -> Option<&'static str> {
    match target_arch {
        "aarch64" => Some("arm64-v8a"),
        "arm" => Some("armeabi-v7a"),
        "x86_64" => Some("x86_64"),
        "x86" => Some("x86"),
        _ => None,
    }
}
