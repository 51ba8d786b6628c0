//! Diagnostic logging to stderr.
//!
//! `RUST_LOG` takes precedence over `-v` when it is set.

use crate::context::VerbosityLevel;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
pub fn init(verbosity: VerbosityLevel, ansi: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(verbosity)));

    // A subscriber installed earlier (e.g. by a test harness) wins
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .try_init();
}

/// Filter for our own crates; dependencies stay at `warn` below trace.
fn directive(verbosity: VerbosityLevel) -> String {
    match verbosity {
        VerbosityLevel::Warn => "warn".to_string(),
        VerbosityLevel::Trace => "trace".to_string(),
        level => format!("warn,libtagstamp={0},tagstamp={0}", level.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_per_level() {
        assert_eq!(directive(VerbosityLevel::Warn), "warn");
        assert_eq!(
            directive(VerbosityLevel::Info),
            "warn,libtagstamp=info,tagstamp=info"
        );
        assert_eq!(
            directive(VerbosityLevel::Debug),
            "warn,libtagstamp=debug,tagstamp=debug"
        );
        assert_eq!(directive(VerbosityLevel::Trace), "trace");
    }

    #[test]
    fn test_directives_parse() {
        for count in 0..4 {
            let level = VerbosityLevel::from_count(count);
            assert!(EnvFilter::try_new(directive(level)).is_ok());
        }
    }
}
