//! Bridge to the `log` crate facade.
//!
//! Lets code written against `log::info!`/`warn!`/`error!` (including
//! dependencies that know nothing about this crate) flow through the
//! same bounded channel as the native entry points. `log`'s five levels
//! fold onto the three severities here: `Debug` and `Trace` ride along
//! as info.

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

use crate::level::{Severity, MAX_LEVEL};
use crate::logger::global;

/// Map a `log` level onto a severity.
fn severity_of(level: Level) -> Severity {
    match level {
        Level::Error => Severity::Error,
        Level::Warn => Severity::Warning,
        Level::Info | Level::Debug | Level::Trace => Severity::Info,
    }
}

/// `log::LevelFilter` equivalent of the compiled threshold.
pub fn max_level_filter() -> LevelFilter {
    match MAX_LEVEL {
        0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        _ => LevelFilter::Info,
    }
}

struct GlobalFacade;

impl log::Log for GlobalFacade {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        severity_of(metadata.level()).enabled()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(logger) = global() {
            let _ = match record.level() {
                Level::Error => logger.error(*record.args()),
                Level::Warn => logger.warning(*record.args()),
                _ => logger.info(*record.args()),
            };
        }
    }

    fn flush(&self) {}
}

static FACADE: GlobalFacade = GlobalFacade;

/// Route the `log` macros through the global logger.
///
/// Call after [`crate::init_global`]. Fails if another `log`
/// implementation is already registered.
pub fn install_facade() -> Result<(), SetLoggerError> {
    log::set_logger(&FACADE).map(|()| log::set_max_level(max_level_filter()))
}
