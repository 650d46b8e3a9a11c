// src/ui/console.rs
//! Line-oriented terminal shared by the navigator and every menu action.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use crate::defaults::Defaults;
use crate::ui::style::{span_crumb, span_error, span_key, span_sep};

pub struct Console {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
    color: bool,
}

impl Console {
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>, color: bool) -> Self {
        Self { input, output, color }
    }

    /// Process stdin/stdout. Colour only when stdout is a terminal.
    pub fn stdio(color: bool) -> Self {
        use std::io::IsTerminal;
        let color = color && io::stdout().is_terminal();
        Self::new(Box::new(io::BufReader::new(io::stdin())), Box::new(io::stdout()), color)
    }

    /// Scripted input plus a transcript of everything written. Used by tests.
    pub fn scripted<I, S>(lines: I) -> (Self, Transcript)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for l in lines {
            text.push_str(l.as_ref());
            text.push('\n');
        }
        let transcript = Transcript::default();
        let console = Self::new(
            Box::new(io::Cursor::new(text.into_bytes())),
            Box::new(transcript.clone()),
            false,
        );
        (console, transcript)
    }

    /// Prints `msg` and reads one line. `None` once input is exhausted.
    pub fn prompt(&mut self, msg: &str) -> io::Result<Option<String>> {
        write!(self.output, "{msg}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(trimmed);
        Ok(Some(buf))
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    pub fn error(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        if self.color {
            writeln!(self.output, "{}", span_error(text.as_ref()))
        } else {
            self.line(text)
        }
    }

    pub fn breadcrumb<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
        let mut first = true;
        for name in names {
            if !first {
                if self.color {
                    write!(self.output, "{}", span_sep(Defaults::BREADCRUMB_SEP))?;
                } else {
                    write!(self.output, "{}", Defaults::BREADCRUMB_SEP)?;
                }
            }
            first = false;
            if self.color {
                write!(self.output, "{}", span_crumb(name))?;
            } else {
                write!(self.output, "{name}")?;
            }
        }
        writeln!(self.output)
    }

    pub fn option(&mut self, key: &str, name: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.output, "    {}. {name}", span_key(key))
        } else {
            writeln!(self.output, "    {key}. {name}")
        }
    }
}

/// Shared in-memory sink that records console output.
#[derive(Clone, Default)]
pub struct Transcript(Arc<Mutex<Vec<u8>>>);

impl Transcript {
    pub fn text(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for Transcript {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
