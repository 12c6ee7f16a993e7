//! Terminal capability detection and utilities

use std::time::Duration;

use indicatif::ProgressBar;
use owo_colors::{OwoColorize, colors::css};
use revise::RevisionStatus;

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// Shorten `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

/// A spinner shown on stderr while a network call is in flight.
pub fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// The marker shown next to a revision with the given status.
pub const fn status_icon(status: RevisionStatus) -> &'static str {
    match status {
        RevisionStatus::Completed => "✅",
        RevisionStatus::Overdue => "🔴",
        RevisionStatus::Due => "🟡",
        RevisionStatus::Locked => "🔒",
    }
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as danger (red)
    fn danger(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
    /// Color by revision status
    fn status(&self, status: RevisionStatus) -> String {
        match status {
            RevisionStatus::Completed => self.success(),
            RevisionStatus::Overdue => self.danger(),
            RevisionStatus::Due => self.warning(),
            RevisionStatus::Locked => self.dim(),
        }
    }
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn danger(&self) -> String {
        if supports_color() {
            self.fg::<css::Red>().to_string()
        } else {
            self.to_string()
        }
    }

    fn info(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn danger(&self) -> String {
        self.as_str().danger()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Two Sum", 10), "Two Sum");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Longest Palindromic Substring", 10), "Longest P…");
        assert_eq!(truncate("Longest Palindromic Substring", 10).chars().count(), 10);
    }
}
