//! Receivers for the two side channels of an invocation: generated-file
//! notices and compiler diagnostics.

use parking_lot::Mutex;

use crate::notice::GeneratedFile;

/// Consumes notices that compass regenerated a file.
pub trait FlushSink: Send + Sync {
    fn flush(&self, file: GeneratedFile);
}

/// Consumes compiler diagnostic text meant for the user.
pub trait LogSink: Send + Sync {
    fn log(&self, text: &str);
}

// ── Stock implementations ────────────────────────────────────────

/// Logs each generated file and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFlushSink;

impl FlushSink for LogFlushSink {
    fn flush(&self, file: GeneratedFile) {
        log::info!("Generated {}", file.path.display());
    }
}

/// Forwards compiler diagnostics to the `log` facade under target `compass`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompassLogSink;

impl LogSink for CompassLogSink {
    fn log(&self, text: &str) {
        let text = text.trim_end_matches(['\n', '\r']);
        if !text.is_empty() {
            log::warn!(target: "compass", "{text}");
        }
    }
}

/// Collects generated-file notices in arrival order.
#[derive(Debug, Default)]
pub struct MemoryFlushSink {
    files: Mutex<Vec<GeneratedFile>>,
}

impl MemoryFlushSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<GeneratedFile> {
        self.files.lock().clone()
    }
}

impl FlushSink for MemoryFlushSink {
    fn flush(&self, file: GeneratedFile) {
        self.files.lock().push(file);
    }
}

/// Collects diagnostic chunks in arrival order.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, text: &str) {
        self.lines.lock().push(text.to_string());
    }
}
