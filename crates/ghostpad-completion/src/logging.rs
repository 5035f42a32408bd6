//! Logging setup for hosts embedding the completion subsystem
//!
//! The library only emits `tracing` events. Hosts that do not install their
//! own subscriber can call [`init_logging`] once at startup.

use tracing::Level;

/// Install a formatted subscriber with a maximum level
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Parse a level name such as `"debug"`, falling back to `INFO`
pub fn level_from_str(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_logging(Level::DEBUG);
        assert!(!init_logging(Level::DEBUG));
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!(level_from_str("debug"), Level::DEBUG);
        assert_eq!(level_from_str(" WARN "), Level::WARN);
        assert_eq!(level_from_str("loud"), Level::INFO);
    }
}
