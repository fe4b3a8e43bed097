//! Severity levels, the compile-time threshold and colour tokens.
//!
//! The threshold is fixed at build time through the `max-level-*` cargo
//! features, so a call below the threshold compiles down to a single
//! comparison and returns before any formatting or allocation happens.

/// Compiled severity threshold, 0 (off) to 3 (info).
///
/// Derived from the `max-level-*` features; the most restrictive enabled
/// feature wins when several are requested by different crates.
pub const MAX_LEVEL: u8 = if cfg!(feature = "max-level-off") {
    0
} else if cfg!(feature = "max-level-error") {
    1
} else if cfg!(feature = "max-level-warning") {
    2
} else {
    3
};

/// Message severity.
///
/// Fixed three-level enumeration; the discriminant is the severity rank
/// compared against [`MAX_LEVEL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Severity {
    Error = 1,
    Warning = 2,
    Info = 3,
}

impl Severity {
    /// Single-character tag written at the start of each output line.
    pub const fn tag(self) -> u8 {
        match self {
            Severity::Error => b'E',
            Severity::Warning => b'W',
            Severity::Info => b'I',
        }
    }

    /// Convert to string for output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Whether this severity passes the compiled threshold.
    #[inline]
    pub const fn enabled(self) -> bool {
        self.enabled_at(MAX_LEVEL)
    }

    /// Threshold check against an explicit maximum level.
    #[inline]
    pub const fn enabled_at(self, max_level: u8) -> bool {
        self as u8 <= max_level
    }
}

/// ANSI colour tokens used per severity when colour output is enabled.
///
/// The defaults are the classic green/yellow/red; override individual
/// fields at logger construction to restyle the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColourScheme {
    pub info: &'static str,
    pub warning: &'static str,
    pub error: &'static str,
}

impl ColourScheme {
    pub const ANSI: Self = Self {
        info: "32",
        warning: "33",
        error: "31",
    };

    /// Colour token for a severity.
    pub const fn token(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }
}

impl Default for ColourScheme {
    fn default() -> Self {
        Self::ANSI
    }
}
