//! Console echo targets

use std::sync::Mutex;

/// Where undelivered alerts are surfaced for the operator
pub trait ConsoleSink: Send + Sync {
    fn echo(&self, text: &str);
}

/// Prints alerts to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConsole;

impl ConsoleSink for StdoutConsole {
    fn echo(&self, text: &str) {
        println!("\n{text}\n");
    }
}

/// Keeps echoed alerts in memory
#[derive(Debug, Default)]
pub struct MemoryConsole {
    lines: Mutex<Vec<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything echoed so far, in order
    pub fn echoed(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl ConsoleSink for MemoryConsole {
    fn echo(&self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.to_string());
        }
    }
}
