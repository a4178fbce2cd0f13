//! Terminal output for step echoes and run outcomes.
//!
//! Step progress goes to stdout. Warnings go to stderr next to the tracing
//! log, so a CI log reads top to bottom in the order things happened.

pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Whether ANSI colors may be written to `term`.
///
/// `--no-color` or a non-empty `NO_COLOR` turns them off, and so does a
/// terminal that is not a TTY (a CI log file or a pipe).
#[must_use]
pub fn colors_enabled(no_color: bool, term: &Term) -> bool {
    let env_off = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    !no_color && !env_off && term.is_term()
}

/// Styling and verbosity shared by every printer.
pub struct OutputContext {
    pub styles: Styles,
    /// Suppresses everything except warnings and errors.
    pub quiet: bool,
}

impl OutputContext {
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        Self {
            styles: Styles::new(colors_enabled(no_color, &Term::stdout())),
            quiet,
        }
    }

    /// `  ✓ msg` on stdout, unless quiet.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.done));
        }
    }

    /// Title line above the dry-run listing, unless quiet.
    pub fn heading(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.style(self.styles.heading));
        }
    }
}
