// src/output.rs
//! Human-readable terminal output for reports

use crate::report::Report;
use std::io::{self, Write};

/// Writes rendered reports, colored when attached to a terminal
pub struct HumanOutput<W: Write = io::Stdout> {
    writer: W,
    use_colors: bool,
}

impl HumanOutput<io::Stdout> {
    /// Create a new HumanOutput that writes to stdout
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
            use_colors: is_terminal::is_terminal(io::stdout()),
        }
    }
}

impl<W: Write> HumanOutput<W> {
    /// Create a new HumanOutput over any writer, without colors
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            use_colors: false,
        }
    }

    /// Write one stage's report and flush it
    pub fn emit(&mut self, report: &Report) -> io::Result<()> {
        let text = report.render(self.use_colors);
        if text.is_empty() {
            return Ok(());
        }

        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}
