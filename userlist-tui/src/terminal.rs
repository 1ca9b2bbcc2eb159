//! Terminal output.

use std::io::{self, Write};

use crossterm::{
    cursor, event, queue,
    style::{Attribute, Print, SetAttribute},
    terminal,
};
use unicode_width::UnicodeWidthChar;

/// How a line is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Normal,
    Title,
    Header,
    Dim,
}

/// One screen row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub style: LineStyle,
}

impl Line {
    pub fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, LineStyle::Normal)
    }
}

/// Raw-mode alternate screen, restored on drop.
pub struct Terminal {
    stdout: io::Stdout,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        crossterm::execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        Ok(Self { stdout })
    }

    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Draws `lines` top to bottom, padding or truncating each to `width`.
    pub fn draw(&mut self, lines: &[Line], width: u16) -> io::Result<()> {
        for (y, line) in lines.iter().enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, y as u16))?;
            match line.style {
                LineStyle::Normal => {}
                LineStyle::Title => queue!(self.stdout, SetAttribute(Attribute::Bold))?,
                LineStyle::Header => queue!(self.stdout, SetAttribute(Attribute::Reverse))?,
                LineStyle::Dim => queue!(self.stdout, SetAttribute(Attribute::Dim))?,
            }
            queue!(
                self.stdout,
                Print(fit(&line.text, width as usize)),
                SetAttribute(Attribute::Reset)
            )?;
        }
        queue!(
            self.stdout,
            terminal::Clear(terminal::ClearType::FromCursorDown)
        )?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Truncates or pads `text` to exactly `width` display columns.
///
/// Truncated text ends in `…`.
pub fn fit(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();

    if total <= width {
        out.push_str(text);
        used = total;
    } else if width > 0 {
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    }

    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_pads() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("", 2), "  ");
    }

    #[test]
    fn test_fit_exact() {
        assert_eq!(fit("abcde", 5), "abcde");
    }

    #[test]
    fn test_fit_truncates_with_ellipsis() {
        assert_eq!(fit("abcdefgh", 5), "abcd…");
        assert_eq!(fit("abc", 1), "…");
        assert_eq!(fit("abc", 0), "");
    }

    #[test]
    fn test_fit_wide_chars() {
        // Each CJK char is two columns wide.
        assert_eq!(fit("日本語", 6), "日本語");
        assert_eq!(fit("日本語", 5), "日本…");
        assert_eq!(fit("日本語", 4), "日… ");
    }
}
