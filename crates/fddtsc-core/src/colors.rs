//! ANSI color codes for terminal output.
//!
//! Mirrors the palette `tsc --pretty` uses for diagnostics:
//! - Red: error severity
//! - Yellow: warning severity, line/column numbers
//! - Cyan: file names
//! - Dim: diagnostic codes, gutters
//! - Reset: Return to default

/// ANSI color palette for CLI output.
///
/// Never global: callers decide once whether color is on and pass the value down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub red: &'static str,
    pub yellow: &'static str,
    pub cyan: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    /// Colors enabled (ANSI escape codes).
    pub const ON: Self = Self {
        red: "\x1b[91m",
        yellow: "\x1b[93m",
        cyan: "\x1b[96m",
        dim: "\x1b[90m",
        reset: "\x1b[0m",
    };

    /// Colors disabled (empty strings).
    pub const OFF: Self = Self {
        red: "",
        yellow: "",
        cyan: "",
        dim: "",
        reset: "",
    };

    /// Create colors based on enabled flag.
    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    /// Check if colors are enabled.
    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
