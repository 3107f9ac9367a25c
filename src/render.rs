//! Output rendering for the interactive session.
//!
//! The session only ever prints whole lines, a transient "thinking" indicator,
//! and a viewport clear.  Everything goes through [`Renderer`] so tests can
//! capture exactly what a user would see.

use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// ANSI escape code for dim text (used for the thinking indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for red text (used for error lines).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI sequence that erases the screen and homes the cursor.
const ANSI_CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Text shown while waiting for the chat backend.
pub const THINKING: &str = "Thinking...";

/// Trait for rendering session output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - In-memory capture for tests
pub trait Renderer: Send {
    /// Print one line of output.
    fn print_line(&mut self, line: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str) {
        self.print_line(info);
    }

    /// Print an error as a single `Error: <message>` line.
    fn print_error(&mut self, error: &str);

    /// Show the transient thinking indicator.
    fn start_thinking(&mut self) {}

    /// Erase the thinking indicator.
    fn finish_thinking(&mut self) {}

    /// Clear the terminal viewport.
    fn clear_screen(&mut self);
}

/// Plain text renderer with optional ANSI styling.
///
/// This renderer outputs text directly to stdout.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    thinking: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            thinking: false,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn write(&mut self, text: &str) {
        let _ = self.stdout.write_all(text.as_bytes());
        self.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_line(&mut self, line: &str) {
        self.finish_thinking();
        self.write(&format!("{line}\n"));
    }

    fn print_error(&mut self, error: &str) {
        self.finish_thinking();
        if self.use_color {
            self.write(&format!("{ANSI_RED}Error: {error}{ANSI_RESET}\n"));
        } else {
            self.write(&format!("Error: {error}\n"));
        }
    }

    fn start_thinking(&mut self) {
        if self.thinking {
            return;
        }
        if self.use_color {
            self.write(&format!("{ANSI_DIM}{THINKING}{ANSI_RESET}"));
        } else {
            self.write(THINKING);
        }
        self.thinking = true;
    }

    fn finish_thinking(&mut self) {
        if !self.thinking {
            return;
        }
        let width = THINKING.len();
        let back = "\x08".repeat(width);
        let erase = format!("{back}{}{back}", " ".repeat(width));
        self.write(&erase);
        self.thinking = false;
    }

    fn clear_screen(&mut self) {
        self.finish_thinking();
        self.write(ANSI_CLEAR_SCREEN);
    }
}

/// Renderer that records output in memory.
///
/// Errors are stored as their printed `Error: ...` form; a viewport clear is
/// recorded as a [`CaptureRenderer::CLEAR_MARKER`] line.  Clones share the same
/// buffer, so a test can hand one clone to a session and read from another.
#[derive(Debug, Default, Clone)]
pub struct CaptureRenderer {
    inner: Arc<Mutex<Captured>>,
}

#[derive(Debug, Default)]
struct Captured {
    lines: Vec<String>,
    thinking_shown: usize,
}

impl CaptureRenderer {
    /// Line recorded in place of a viewport clear.
    pub const CLEAR_MARKER: &'static str = "<clear>";

    /// Creates an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    fn captured(&self) -> MutexGuard<'_, Captured> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every line printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.captured().lines.clone()
    }

    /// All output joined with newlines.
    pub fn output(&self) -> String {
        self.captured().lines.join("\n")
    }

    /// True if any printed line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.captured().lines.iter().any(|line| line.contains(needle))
    }

    /// How many times the thinking indicator was shown.
    pub fn thinking_shown(&self) -> usize {
        self.captured().thinking_shown
    }

    /// Forget everything captured so far.
    pub fn reset(&self) {
        let mut captured = self.captured();
        captured.lines.clear();
        captured.thinking_shown = 0;
    }
}

impl Renderer for CaptureRenderer {
    fn print_line(&mut self, line: &str) {
        self.captured().lines.push(line.to_string());
    }

    fn print_error(&mut self, error: &str) {
        self.captured().lines.push(format!("Error: {error}"));
    }

    fn start_thinking(&mut self) {
        self.captured().thinking_shown += 1;
    }

    fn clear_screen(&mut self) {
        self.captured().lines.push(Self::CLEAR_MARKER.to_string());
    }
}
