//! Line-oriented terminal console over stdin/stdout.

use crate::core::console::Console;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

const CONFIRM_PROMPT: &str = "Press Enter to continue...";
const SHAKE_OFFSETS: [usize; 6] = [0, 2, 1, 3, 0, 1];

pub struct TerminalConsole<R: BufRead, W: Write> {
    input: R,
    output: W,
    /// Pause used in place of a confirmation once input is closed
    closed_pause: Duration,
    frame_delay: Duration,
}

impl TerminalConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            closed_pause: Duration::from_millis(600),
            frame_delay: Duration::from_millis(45),
        }
    }

    /// Disables every sleep. Used when output is not a person.
    pub fn without_delays(mut self) -> Self {
        self.closed_pause = Duration::ZERO;
        self.frame_delay = Duration::ZERO;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_raw(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn write_line(&mut self, text: &str, color: Option<Color>) -> io::Result<()> {
        match color {
            Some(color) => queue!(
                self.output,
                SetForegroundColor(color),
                Print(text),
                ResetColor,
                Print("\n")
            )?,
            None => queue!(self.output, Print(text), Print("\n"))?,
        }
        self.output.flush()
    }

    fn shake(&mut self, banner: &str) -> io::Result<()> {
        for offset in SHAKE_OFFSETS {
            queue!(
                self.output,
                Print("\r"),
                Print(" ".repeat(offset)),
                SetAttribute(Attribute::Bold),
                SetForegroundColor(Color::Yellow),
                Print(banner),
                ResetColor,
                SetAttribute(Attribute::Reset),
                Print("   ")
            )?;
            self.output.flush()?;
            thread::sleep(self.frame_delay);
        }
        queue!(self.output, Print("\n"))?;
        self.output.flush()
    }
}

fn line_color(text: &str) -> Option<Color> {
    if text.contains("Elite ") {
        Some(Color::Magenta)
    } else if text.starts_with("***") {
        Some(Color::Green)
    } else {
        None
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn narrate(&mut self, text: &str) {
        let _ = self.write_line(text, line_color(text));
    }

    fn confirm(&mut self) {
        let _ = queue!(
            self.output,
            Print("\n"),
            SetForegroundColor(Color::Cyan),
            Print(CONFIRM_PROMPT),
            ResetColor
        );
        let _ = self.output.flush();
        if self.read_raw().is_none() {
            thread::sleep(self.closed_pause);
        }
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let _ = queue!(self.output, Print(prompt));
        let _ = self.output.flush();
        self.read_raw()
    }

    fn clear_screen(&mut self) {
        let _ = queue!(self.output, Clear(ClearType::All), MoveTo(0, 0));
        let _ = self.output.flush();
    }

    fn critical_flash(&mut self, banner: &str) {
        let _ = self.shake(banner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> TerminalConsole<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new()).without_delays()
    }

    #[test]
    fn test_read_line_strips_newline() {
        let mut c = console("a\r\nrun\n");
        assert_eq!(c.read_line("> ").as_deref(), Some("a"));
        assert_eq!(c.read_line("> ").as_deref(), Some("run"));
        assert_eq!(c.read_line("> "), None);
    }

    #[test]
    fn test_confirm_on_closed_input_returns() {
        let mut c = console("");
        c.confirm();
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains(CONFIRM_PROMPT));
    }

    #[test]
    fn test_narrate_and_flash_write_text() {
        let mut c = console("");
        c.narrate("A wild Elite Skeleton appeared!");
        c.critical_flash("CRITICAL HIT!");
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("Elite Skeleton"));
        assert_eq!(out.matches("CRITICAL HIT!").count(), SHAKE_OFFSETS.len());
    }
}
