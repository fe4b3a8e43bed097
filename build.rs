fn main() {
    // ESP-IDF environment setup, needed only when cross-compiling for the
    // device. Host builds (and `cargo test`) skip it entirely.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
