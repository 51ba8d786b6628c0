use owo_colors::OwoColorize;
use std::error::Error;
use std::io::IsTerminal;

/// When to color terminal output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color when writing to a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolves the choice against the environment for output on stderr.
    pub fn use_ansi_on_stderr(self) -> bool {
        self.resolve(
            std::env::var_os("NO_COLOR").is_some(),
            std::io::stderr().is_terminal(),
        )
    }

    fn resolve(self, no_color: bool, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => !no_color && is_terminal,
        }
    }
}

/// Trait for output formatting that can be TTY-aware or plain text
///
/// Only diagnostics go through the formatter. Report lines are written
/// verbatim so their format never depends on the terminal.
pub trait OutputFormatter: Send + Sync {
    /// Render a warning message
    fn warning_line(&self, message: &str) -> String;

    /// Render an error message
    fn error_line(&self, message: &str) -> String;

    /// Print a warning message to stderr
    fn warning(&self, message: &str) {
        eprintln!("{}", self.warning_line(message));
    }

    /// Print an error message to stderr
    fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
    }
}

/// TTY-aware formatter with colors
pub struct TtyFormatter;

impl OutputFormatter for TtyFormatter {
    fn warning_line(&self, message: &str) -> String {
        format!("{} {}", "⚠".yellow().bold(), message)
    }

    fn error_line(&self, message: &str) -> String {
        format!("{} {}", "✗".red().bold(), message)
    }
}

/// Plain text formatter for non-TTY output (piped, scripted)
pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn warning_line(&self, message: &str) -> String {
        format!("⚠ {}", message)
    }

    fn error_line(&self, message: &str) -> String {
        format!("✗ {}", message)
    }
}

/// Create the appropriate formatter based on `--color`, TTY and environment
pub fn create_formatter(color: ColorChoice) -> Box<dyn OutputFormatter> {
    if color.use_ansi_on_stderr() {
        Box::new(TtyFormatter)
    } else {
        Box::new(PlainFormatter)
    }
}

/// Formats an error followed by its chain of sources on one line.
pub fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
