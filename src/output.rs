//! Line-oriented output shared by every monitor loop

use crossterm::style::Stylize;
use std::io::{self, IsTerminal, Write};
use tokio::sync::Mutex;

use crate::monitor::TickReport;

pub const TRANSITION_MARKER: &str = "!!!! Warning !!!!";

/// Serializes writes so lines from different monitors never interleave
pub struct OutputSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl OutputSink {
    pub fn new(writer: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            color,
        }
    }

    /// Standard output, colored only when attached to a terminal
    pub fn stdout(color: bool) -> Self {
        let color = color && io::stdout().is_terminal();
        Self::new(Box::new(io::stdout()), color)
    }

    /// Write the line for one tick, followed by the marker on a transition
    pub async fn emit(&self, report: &TickReport) -> io::Result<()> {
        let line = report.render_line();

        let mut writer = self.writer.lock().await;
        writeln!(writer, "{}", self.paint(&line, report.alarm))?;
        if report.transition {
            writeln!(writer, "{}", self.paint(TRANSITION_MARKER, true))?;
        }
        writer.flush()
    }

    /// Write a failed tick as an alarm line
    pub async fn emit_error(&self, monitor: &str, error: &str) -> io::Result<()> {
        let line = format!("[{}] Task execution error: {}", monitor, error);

        let mut writer = self.writer.lock().await;
        writeln!(writer, "{}", self.paint(&line, true))?;
        writer.flush()
    }

    fn paint(&self, text: &str, alarm: bool) -> String {
        if self.color && alarm {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}
