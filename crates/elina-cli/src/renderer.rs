//! Terminal rendering for markdown output and yes/no prompts.
//!
//! Rich output goes through termimad; `--no-color` prints the markdown as is.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.quote_mark.set_fg(Color::DarkYellow);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to stdout
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            for line in markdown.lines() {
                if line.starts_with('#') {
                    // keep the hashes visible
                    println!("\x1b[34m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
            if !markdown.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }

    /// Render markdown to stderr. Used for violations and failures so that
    /// scripted callers can keep stdout clean.
    pub fn render_error(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            let mut stderr = io::stderr().lock();
            for line in markdown.lines() {
                if line.starts_with('#') {
                    writeln!(stderr, "\x1b[31m{line}\x1b[0m")?;
                } else {
                    writeln!(stderr, "{}", self.skin.inline(line))?;
                }
            }
        } else {
            eprint!("{markdown}");
            if !markdown.ends_with('\n') {
                eprintln!();
            }
        }
        Ok(())
    }

    /// Asks `question` and reads a y/N answer from stdin. Anything other than
    /// `y` or `yes`, including end of input, is a no.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        print!("{question} [y/N] ");
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read answer")?;
        Ok(is_yes(&answer))
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
