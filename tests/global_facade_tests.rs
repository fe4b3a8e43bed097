//! Global-instance and `log` facade integration.
//!
//! One test function only: the global logger and the `log` facade are
//! process-wide, so this file keeps them to a single installation.

use std::thread;
use std::time::{Duration, Instant};

use esp32_serial_log::{
    global, init_global, install_facade, serial_info, Logger, LoggerConfig, MemorySink,
};

fn wait_for<F: Fn() -> bool>(predicate: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !predicate() {
        assert!(Instant::now() < deadline, "timed out waiting for drain");
        thread::yield_now();
    }
}

#[test]
fn test_global_logger_and_log_facade() {
    assert!(global().is_none());

    let sink = MemorySink::new();
    let logger = Logger::start(sink.clone(), LoggerConfig::default()).unwrap();
    init_global(logger).ok().expect("first init must succeed");
    install_facade().expect("facade registers once");

    thread::scope(|scope| {
        thread::Builder::new()
            .name("app".to_owned())
            .spawn_scoped(scope, || {
                // Native entry point through the accessor.
                let status = serial_info!(global().unwrap(), "native {}", 1);
                assert!(status.is_ok());

                // Same channel, via the log facade.
                log::warn!("facade {}", 2);
                log::error!("facade {}", 3);
            })
            .unwrap();
    });

    wait_for(|| sink.text().matches('\n').count() == 3);

    let output = sink.text();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "I - app - native 1",
            "W - app - facade 2",
            "E - app - facade 3",
        ]
    );

    // A second install is rejected; the first logger stays in place.
    let other = Logger::start(MemorySink::new(), LoggerConfig::default()).unwrap();
    assert!(init_global(other).is_err());
}
