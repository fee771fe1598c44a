//! Trace line capture.

use auxlink::TraceSink;

/// Collects every emitted trace line.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    lines: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl TraceSink for RecordingSink {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
}
