//! Colors for the line markers (`→`, `✓`, `!`) and the dry-run heading.

use owo_colors::Style;

/// Every style is plain unless colors were enabled at startup.
#[derive(Default, Clone, Copy)]
pub struct Styles {
    /// `→` in front of a step echo
    pub arrow: Style,
    /// `✓` in front of a finished or skipped step
    pub done: Style,
    /// `!` in front of a dry-run blocker
    pub warning: Style,
    pub heading: Style,
}

impl Styles {
    #[must_use]
    pub fn new(colored: bool) -> Self {
        if !colored {
            return Self::default();
        }
        Self {
            arrow: Style::new().cyan(),
            done: Style::new().green(),
            warning: Style::new().yellow(),
            heading: Style::new().bold(),
        }
    }
}
