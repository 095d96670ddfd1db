//! Terminal setup, teardown and drawing.

use std::io::{self, Stdout, Write};
use std::panic;

use crossterm::{
    cursor::MoveTo,
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use tagger::{FieldSnapshot, TextMeasure, UnicodeWidthMeasure};

/// Restores the terminal when dropped, including on panic.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Ok(Self { stdout })
    }

    /// Draw the tag line with the suggestion list below it.
    pub fn draw(&mut self, snapshot: &FieldSnapshot) -> io::Result<()> {
        let out = &mut self.stdout;
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

        let mut column: u16 = 0;
        for tag in &snapshot.tags {
            if snapshot.highlighted.as_deref() == Some(tag.as_str()) {
                queue!(out, SetForegroundColor(Color::Yellow))?;
            } else {
                queue!(out, SetForegroundColor(Color::Cyan))?;
            }
            let token = format!("[{}] ", tag);
            column = column.saturating_add(UnicodeWidthMeasure.text_width(&token));
            queue!(out, Print(token), ResetColor)?;
        }

        let cursor = column.saturating_add(UnicodeWidthMeasure.text_width(&snapshot.pending));
        let padding = usize::from(snapshot.input_width)
            .saturating_sub(usize::from(UnicodeWidthMeasure.text_width(&snapshot.pending)));
        queue!(
            out,
            SetAttribute(Attribute::Underlined),
            Print(&snapshot.pending),
            Print(" ".repeat(padding)),
            SetAttribute(Attribute::Reset)
        )?;

        let mut row: u16 = 1;
        if snapshot.open {
            for (i, label) in snapshot.suggestions.iter().enumerate() {
                queue!(out, MoveTo(column, row))?;
                if snapshot.active == Some(i) {
                    queue!(
                        out,
                        SetAttribute(Attribute::Reverse),
                        Print(label),
                        SetAttribute(Attribute::Reset)
                    )?;
                } else {
                    queue!(out, Print(label))?;
                }
                row += 1;
            }
            if snapshot.has_more {
                queue!(out, MoveTo(column, row), Print("..."))?;
                row += 1;
            }
        }

        queue!(
            out,
            MoveTo(0, row + 1),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("value: {}", snapshot.form_value)),
            MoveTo(0, row + 2),
            Print("Enter/Tab/, commit  Up/Down choose  Esc close  Ctrl+C quit"),
            ResetColor,
            MoveTo(cursor, 0)
        )?;
        out.flush()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
