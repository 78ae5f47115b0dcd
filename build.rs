fn main() {
    println!("cargo:rerun-if-env-changed=HOPPYSHARE_BLE_LIB_DIR");

    // Only the native bridge needs linking; hosts without it build as-is.
    if std::env::var_os("CARGO_FEATURE_NATIVE_BLE").is_none() {
        return;
    }

    match std::env::var("HOPPYSHARE_BLE_LIB_DIR") {
        Ok(dir) if !dir.is_empty() => println!("cargo:rustc-link-search=native={dir}"),
        _ => println!(
            "cargo:warning=native-ble enabled without HOPPYSHARE_BLE_LIB_DIR; \
             relying on the default linker search path"
        ),
    }
    println!("cargo:rustc-link-lib=BLEBridge");

    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        println!("cargo:rustc-link-lib=windowsapp");
    }
}
