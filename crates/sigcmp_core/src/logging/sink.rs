//! Injectable log sink with callback and file output.
//!
//! A sink is handed to the code that should log through it, so there is no
//! process-wide logger state. Each sink:
//! - Sends formatted lines to an optional callback
//! - Writes to an optional log file
//! - Keeps detail lines out of the output in compact mode
//! - Maintains a tail buffer of recent lines for error diagnosis

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Log sink with optional callback and file output.
pub struct LogSink {
    /// Sink name (used in the log filename).
    name: String,
    /// Path to log file, if file output is enabled.
    log_path: Option<PathBuf>,
    /// File writer (buffered).
    file_writer: Mutex<Option<BufWriter<File>>>,
    /// Callback receiving every formatted line.
    callback: Option<LogCallback>,
    /// Logging configuration.
    config: LogConfig,
    /// Tail buffer for recent lines.
    tail_buffer: Mutex<VecDeque<String>>,
    /// When false every message is discarded.
    enabled: bool,
}

impl LogSink {
    /// Create a sink with no outputs attached yet.
    pub fn new(name: impl Into<String>, config: LogConfig) -> Self {
        let capacity = config.error_tail;
        Self {
            name: name.into(),
            log_path: None,
            file_writer: Mutex::new(None),
            callback: None,
            config,
            tail_buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            enabled: true,
        }
    }

    /// A sink that discards everything.
    pub fn disabled() -> Self {
        let mut sink = Self::new("disabled", LogConfig::default());
        sink.enabled = false;
        sink
    }

    /// Attach a callback.
    pub fn with_callback(mut self, callback: LogCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Attach a log file `<log_dir>/<name>.log`, creating the directory if needed.
    pub fn with_log_dir(mut self, log_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&self.name)));
        let file = File::create(&log_path)?;

        self.file_writer = Mutex::new(Some(BufWriter::new(file)));
        self.log_path = Some(log_path);
        Ok(self)
    }

    /// Get the sink name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the log file path, if file output is enabled.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Check whether messages are emitted at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled || level < self.config.level {
            return;
        }

        let formatted = self.format_message(message);
        self.push_tail(&formatted);
        self.output(&formatted);
    }

    /// Log an info message.
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log a debug message.
    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        let msg = MessagePrefix::Warning.format(message);
        self.log(LogLevel::Warn, &msg);
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        let msg = MessagePrefix::Error.format(message);
        self.log(LogLevel::Error, &msg);
    }

    /// Log a phase marker.
    pub fn phase(&self, phase_name: &str) {
        let msg = MessagePrefix::Phase.format(phase_name);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a section marker.
    pub fn section(&self, section_name: &str) {
        let msg = MessagePrefix::Section.format(section_name);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a computed result.
    pub fn result(&self, message: &str) {
        let msg = MessagePrefix::Result.format(message);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        let msg = MessagePrefix::Success.format(message);
        self.log(LogLevel::Info, &msg);
    }

    /// Log a detail line (intermediate lengths, per-step values).
    ///
    /// Always kept in the tail buffer; only written out when not compact.
    pub fn detail(&self, line: &str) {
        if !self.enabled {
            return;
        }

        self.push_tail(line);

        if self.config.compact || LogLevel::Debug < self.config.level {
            return;
        }

        self.output(&self.format_message(line));
    }

    /// Write the tail buffer out (typically after an error).
    pub fn show_tail(&self, header: &str) {
        let lines = self.get_tail();
        if lines.is_empty() {
            return;
        }

        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in &lines {
            self.output(line);
        }
    }

    /// Clear the tail buffer.
    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    /// Get the current tail buffer contents.
    pub fn get_tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    /// Flush the log file.
    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Close the file output and release it.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn push_tail(&self, line: &str) {
        if self.config.error_tail == 0 {
            return;
        }
        let mut buffer = self.tail_buffer.lock();
        if buffer.len() >= self.config.error_tail {
            buffer.pop_front();
        }
        buffer.push_back(line.to_string());
    }

    /// Format a message with timestamp (if enabled).
    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    /// Output a formatted line to file and callback.
    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }

        if let Some(ref callback) = self.callback {
            callback(formatted);
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("name", &self.name)
            .field("log_path", &self.log_path)
            .field("has_callback", &self.callback.is_some())
            .field("config", &self.config)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Drop for LogSink {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sanitize a string to be safe for use as a filename.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Builder for creating a LogSink with fluent API.
pub struct LogSinkBuilder {
    name: String,
    log_dir: Option<PathBuf>,
    config: LogConfig,
    callback: Option<LogCallback>,
}

impl LogSinkBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log_dir: None,
            config: LogConfig::default(),
            callback: None,
        }
    }

    /// Set the logging configuration.
    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the log level.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Enable or disable compact mode.
    pub fn compact(mut self, compact: bool) -> Self {
        self.config.compact = compact;
        self
    }

    /// Write a log file into this directory.
    pub fn log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    /// Set the callback.
    pub fn callback(mut self, callback: LogCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Build the LogSink.
    pub fn build(self) -> std::io::Result<LogSink> {
        let mut sink = LogSink::new(self.name, self.config);
        if let Some(callback) = self.callback {
            sink = sink.with_callback(callback);
        }
        match self.log_dir {
            Some(dir) => sink.with_log_dir(dir),
            None => Ok(sink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn counting_callback() -> (LogCallback, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let callback: LogCallback = Box::new(move |_msg| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        (callback, count)
    }

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let sink = LogSink::new("bench_run", LogConfig::default())
            .with_log_dir(dir.path())
            .unwrap();

        let path = sink.log_path().unwrap();
        assert!(path.exists());
        assert!(path.to_string_lossy().contains("bench_run.log"));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempdir().unwrap();
        let sink = LogSink::new("bench_run", LogConfig::default())
            .with_log_dir(dir.path())
            .unwrap();

        sink.info("Test message");
        sink.flush();

        let content = fs::read_to_string(sink.log_path().unwrap()).unwrap();
        assert!(content.contains("Test message"));
    }

    #[test]
    fn calls_callback() {
        let (callback, count) = counting_callback();
        let sink = LogSink::new("bench_run", LogConfig::default()).with_callback(callback);

        sink.info("Message 1");
        sink.phase("Message 2");

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn level_filters_messages() {
        let (callback, count) = counting_callback();
        let sink = LogSink::new("bench_run", LogConfig::default()).with_callback(callback);

        sink.debug("hidden at info level");
        sink.warn("shown");

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_sink_discards_everything() {
        let sink = LogSink::disabled();
        sink.error("nothing");
        sink.detail("nothing");
        assert!(!sink.is_enabled());
        assert!(sink.get_tail().is_empty());
    }

    #[test]
    fn compact_mode_keeps_details_in_tail_only() {
        let (callback, count) = counting_callback();
        let mut config = LogConfig::debug();
        config.compact = true;
        let sink = LogSink::new("bench_run", config).with_callback(callback);

        sink.detail("meas: 100 -> 98 samples");
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(sink.get_tail(), vec!["meas: 100 -> 98 samples".to_string()]);
    }

    #[test]
    fn verbose_mode_outputs_details() {
        let (callback, count) = counting_callback();
        let sink = LogSink::new("bench_run", LogConfig::debug()).with_callback(callback);

        sink.detail("ref: 100 -> 100 samples");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tail_buffer_maintains_limit() {
        let mut config = LogConfig::default();
        config.error_tail = 5;
        let sink = LogSink::new("bench_run", config);

        for i in 0..10 {
            sink.detail(&format!("Line {}", i));
        }

        let tail = sink.get_tail();
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0], "Line 5");
        assert_eq!(tail[4], "Line 9");
    }

    #[test]
    fn builder_attaches_outputs() {
        let dir = tempdir().unwrap();
        let (callback, count) = counting_callback();
        let sink = LogSinkBuilder::new("built")
            .level(LogLevel::Warn)
            .compact(false)
            .log_dir(dir.path())
            .callback(callback)
            .build()
            .unwrap();

        sink.info("filtered");
        sink.error("kept");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(sink.log_path().is_some());
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("a<b>c"), "a_b_c");
    }
}
