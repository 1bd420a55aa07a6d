//! Terminal UI helpers for the interactive front end.
//!
//! A spinner for the two network phases, status icons, and the label shown
//! for each article in the picker.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::ArticleSummary;

/// Titles longer than this are cut in the picker
pub const MAX_TITLE_WIDTH: usize = 100;

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different outcomes.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Render a status line, colored by outcome.
pub fn status_line(status: Status, msg: &str) -> String {
    let icon = status_icon(status);
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Picker label: the title followed by dimmed authors.
pub fn article_label(article: &ArticleSummary) -> String {
    let title = truncate_with_ellipsis(&article.title, MAX_TITLE_WIDTH);
    if article.authors.is_empty() {
        return title;
    }
    format!("{} {}", title, format!("({})", article.authors).dimmed())
}

/// Truncate text to at most `max_width` characters, marking the cut with `...`.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return "...".to_string();
    }

    let truncated: String = text.chars().take(max_width - 3).collect();
    format!("{}...", truncated.trim_end())
}

/// Spinner on stderr for the search and retrieve phases.
///
/// When stderr is not a terminal nothing animates, but final messages are
/// still printed. A hidden spinner only reports failures.
pub struct Spinner {
    pb: ProgressBar,
    quiet: bool,
}

impl Spinner {
    /// Create a stopped spinner.
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(style("{spinner:.cyan} {msg}").tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
        Self { pb, quiet: false }
    }

    /// Create a spinner that never draws.
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
            quiet: true,
        }
    }

    /// Start spinning with the given message.
    pub fn start(&self, msg: &str) {
        self.pb.reset();
        self.pb.set_message(msg.to_string());
        self.pb.enable_steady_tick(Duration::from_millis(100));
    }

    /// Stop and erase the spinner.
    pub fn stop(&self) {
        self.pb.finish_and_clear();
    }

    /// Stop with an informational message.
    pub fn info(&self, msg: &str) {
        self.finish(Status::Info, msg);
    }

    /// Stop with a failure message.
    pub fn fail(&self, msg: &str) {
        self.finish(Status::Error, msg);
    }

    /// Stop with a success message.
    pub fn succeed(&self, msg: &str) {
        self.finish(Status::Success, msg);
    }

    fn finish(&self, status: Status, msg: &str) {
        self.pb.finish_and_clear();
        if !self.quiet || status == Status::Error {
            eprintln!("{}", status_line(status, msg));
        }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
}
