//! Terminal output styling.
//!
//! Pure presentation: takes the completion text and puts color on it when
//! stdout is a terminal. Falls back to plain text when output is piped so
//! the command can be captured by shell integration.

use crossterm::style::Stylize;

/// Renderer for one-shot colored output.
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Create a renderer, enabling color only when stdout is a tty.
    pub fn new() -> Self {
        Self {
            color: atty::is(atty::Stream::Stdout),
        }
    }

    /// A renderer that never emits escape codes, for `--pipe` mode.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Render a generated command.
    pub fn command(&self, text: &str) -> String {
        if self.color {
            text.to_string().green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Render the model's explanation for a declined request.
    pub fn warning(&self, text: &str) -> String {
        if self.color {
            text.to_string().yellow().to_string()
        } else {
            text.to_string()
        }
    }

    /// Render an error message.
    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.to_string().red().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer_passes_text_through() {
        let r = Renderer::plain();
        assert_eq!(r.command("ls -la"), "ls -la");
        assert_eq!(r.warning("nope"), "nope");
        assert_eq!(r.error("An error occurred."), "An error occurred.");
    }

    #[test]
    fn test_colored_output_contains_text() {
        let r = Renderer { color: true };
        assert!(r.command("ls").contains("ls"));
        assert!(r.warning("careful").contains("careful"));
        assert!(r.error("bad").contains("bad"));
    }
}
