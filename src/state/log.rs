// Append-only event log shown in the simulation log panel
use crate::util::clock_label;

/// Styling tag for a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTag {
    Info,
    Error,
    Goal,
    Init,
}

impl LogTag {
    pub fn color(&self) -> &'static str {
        match self {
            LogTag::Info => "#c9d1d9",
            LogTag::Error => "#f85149",
            LogTag::Goal => "#3fb950",
            LogTag::Init => "#58a6ff",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub tag: LogTag,
    pub message: String,
}

impl LogEntry {
    pub fn line(&self) -> String {
        format!("[{}] {}", self.timestamp, self.message)
    }
}

#[derive(Clone, Debug)]
pub struct EventLog {
    entries: Vec<LogEntry>,
    clock: fn() -> String,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_clock(clock_label)
    }
}

impl EventLog {
    pub fn with_clock(clock: fn() -> String) -> Self {
        Self {
            entries: Vec::new(),
            clock,
        }
    }

    pub fn push(&mut self, tag: LogTag, message: impl Into<String>) {
        self.entries.push(LogEntry {
            timestamp: (self.clock)(),
            tag,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> String {
        "12:00:00".to_string()
    }

    #[test]
    fn entries_keep_order_and_timestamp() {
        let mut log = EventLog::with_clock(noon);
        log.push(LogTag::Init, "Simulation initialized with Simple Reflex agent");
        log.push(LogTag::Error, "Error: boom");
        assert_eq!(log.entries().len(), 2);
        assert_eq!(
            log.entries()[0].line(),
            "[12:00:00] Simulation initialized with Simple Reflex agent"
        );
        assert_eq!(log.entries()[1].tag, LogTag::Error);
        log.clear();
        assert!(log.entries().is_empty());
    }
}
