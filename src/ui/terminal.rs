use super::{DisplaySink, UIError};
use crate::stream::DisplayUpdate;
use crossterm::style::{style, Color, Stylize};
use crossterm::{cursor, queue, terminal};
use regex::Regex;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Redraws the formatted response in place below the cursor.
///
/// The previous rendering is erased before each redraw, so the terminal
/// always shows exactly the latest output.
pub struct TerminalDisplay {
    writer: Box<dyn Write + Send>,
    /// Rows occupied by the rendering that is still live
    drawn_rows: u16,
    interactive: bool,
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            writer: Box::new(io::stdout()),
            drawn_rows: 0,
            interactive: true,
        }
    }

    /// Plain output without styling or terminal size lookups
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer,
            drawn_rows: 0,
            interactive: false,
        }
    }

    fn redraw(&mut self, text: &str) -> Result<(), UIError> {
        if self.drawn_rows > 0 {
            queue!(
                self.writer,
                cursor::MoveToPreviousLine(self.drawn_rows),
                terminal::Clear(terminal::ClearType::FromCursorDown)
            )?;
        }

        let width = if self.interactive {
            terminal::size().ok().map(|(columns, _)| columns.max(1) as usize)
        } else {
            None
        };

        let mut rows = 0usize;
        for line in text.lines() {
            if self.interactive {
                writeln!(self.writer, "{}", style_line(line))?;
            } else {
                writeln!(self.writer, "{line}")?;
            }
            rows += row_count(line, width);
        }
        self.writer.flush()?;

        self.drawn_rows = u16::try_from(rows).unwrap_or(u16::MAX);
        Ok(())
    }

    /// Print a line below the live rendering, which stays on screen from now on
    fn notice(&mut self, text: &str, color: Color) -> Result<(), UIError> {
        if self.interactive {
            writeln!(self.writer, "{}", style(text).with(color))?;
        } else {
            writeln!(self.writer, "{text}")?;
        }
        self.writer.flush()?;
        self.drawn_rows = 0;
        Ok(())
    }
}

impl DisplaySink for TerminalDisplay {
    fn show(&mut self, update: &DisplayUpdate) -> Result<(), UIError> {
        match update {
            DisplayUpdate::Render(text) => self.redraw(text),
            DisplayUpdate::Final(text) => {
                self.redraw(text)?;
                self.drawn_rows = 0;
                Ok(())
            }
            DisplayUpdate::Failed { message, .. } => {
                self.notice(&format!("✗ Optimization failed: {message}"), Color::Red)
            }
            DisplayUpdate::Cancelled { .. } => {
                self.notice("Optimization cancelled", Color::Yellow)
            }
            DisplayUpdate::Unchanged | DisplayUpdate::Ignored => Ok(()),
        }
    }
}

fn row_count(line: &str, width: Option<usize>) -> usize {
    let chars = line.chars().count();
    match width {
        Some(width) if chars > 0 => chars.div_ceil(width),
        _ => 1,
    }
}

fn inline_bold() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("inline bold pattern"))
}

/// Terminal styling for the display conventions: headings, bullets, status lines
fn style_line(line: &str) -> String {
    if let Some(heading) = line
        .strip_prefix("**")
        .and_then(|rest| rest.strip_suffix(":**"))
    {
        if !heading.contains("**") {
            return format!("{}", style(format!("{heading}:")).bold());
        }
    }

    if let Some(item) = line.strip_prefix("• ") {
        return format!("{} {}", style("•").with(Color::Blue), style_inline(item));
    }

    if line.len() > 2 && line.starts_with('*') && line.ends_with('*') && !line.starts_with("**")
    {
        let status = &line[1..line.len() - 1];
        return format!("{}", style(status).italic().with(Color::DarkGrey));
    }

    style_inline(line)
}

fn style_inline(text: &str) -> String {
    inline_bold()
        .replace_all(text, |captures: &regex::Captures| {
            format!("{}", style(&captures[1]).bold())
        })
        .into_owned()
}
