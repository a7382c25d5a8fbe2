//! A small `log` backend that tints level names with truecolor escapes.
//!
//! The library itself only emits records through the `log` facade (parse
//! fallbacks are reported at `debug` level under `colour_rs::parse` and
//! `colour_rs::color`). Install [`ColourLogger`] to see them:
//!
//! ```no_run
//! use colour_rs::logging::ColourLogger;
//! use log::LevelFilter;
//!
//! ColourLogger::new()
//!     .level(LevelFilter::Debug)
//!     .show_path(false)
//!     .init()
//!     .expect("logger installed once");
//! ```
//!
//! Optional tracing integration is available via `ColourTracingLayer` when
//! the `tracing` feature is enabled.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::{OffsetDateTime, format_description::OwnedFormatItem};

use crate::color::Colour;
use crate::sync::lock_recover;

const RESET: &str = "\x1b[0m";

/// Level tints, indexed by `Level as usize - 1` (error first).
const LEVEL_TINTS: [[u8; 3]; 5] = [
    [0xd7, 0x00, 0x00],
    [0xd7, 0xaf, 0x00],
    [0x5f, 0xaf, 0x5f],
    [0x5f, 0x87, 0xd7],
    [0x80, 0x80, 0x80],
];

/// Logger for the `log` crate.
///
/// Writes one line per record: an optional timestamp, the padded level name
/// (tinted when colour is enabled), the message and an optional `file:line`.
///
/// # Thread Safety
///
/// The writer and the last printed timestamp are each behind a mutex with
/// poison recovery, so concurrent records never interleave within a line.
pub struct ColourLogger {
    level: LevelFilter,
    show_time: bool,
    omit_repeated_times: bool,
    show_level: bool,
    show_path: bool,
    color: bool,
    time_format: OwnedFormatItem,
    last_time: Mutex<Option<String>>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Default for ColourLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ColourLogger {
    /// Create a logger writing to stderr.
    ///
    /// Colour is on when stderr is a terminal and `NO_COLOR` is unset or empty.
    #[must_use]
    pub fn new() -> Self {
        let time_format = time::format_description::parse_owned::<2>("[hour]:[minute]:[second]")
            .unwrap_or_else(|_| OwnedFormatItem::Literal(Vec::<u8>::new().into_boxed_slice()));
        let no_color = std::env::var("NO_COLOR").is_ok_and(|value| !value.is_empty());
        Self {
            level: LevelFilter::Info,
            show_time: true,
            omit_repeated_times: true,
            show_level: true,
            show_path: true,
            color: !no_color && io::stderr().is_terminal(),
            time_format,
            last_time: Mutex::new(None),
            writer: Mutex::new(Box::new(io::stderr())),
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable timestamps.
    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    /// Blank out a timestamp identical to the previous one.
    #[must_use]
    pub fn omit_repeated_times(mut self, omit: bool) -> Self {
        self.omit_repeated_times = omit;
        self
    }

    /// Enable or disable level names.
    #[must_use]
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Enable or disable the `file:line` suffix.
    #[must_use]
    pub fn show_path(mut self, show: bool) -> Self {
        self.show_path = show;
        self
    }

    /// Force ANSI colour on or off.
    #[must_use]
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Override the time format. Invalid descriptions keep the current one.
    #[must_use]
    pub fn time_format(mut self, format: &str) -> Self {
        if let Ok(parsed) = time::format_description::parse_owned::<2>(format) {
            self.time_format = parsed;
        }
        self
    }

    /// Write to something other than stderr.
    #[must_use]
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Mutex::new(Box::new(writer));
        self
    }

    /// Install as the global logger.
    ///
    /// # Errors
    ///
    /// Fails if another logger is already installed.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }

    fn format_time(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        now.format(&self.time_format)
            .unwrap_or_else(|_| now.to_string())
    }

    /// Tint used for a level name.
    ///
    /// Built from bytes rather than parsed, so logging never touches the
    /// parse cache.
    #[must_use]
    pub fn level_colour(level: Level) -> Colour {
        let [r, g, b] = LEVEL_TINTS[level as usize - 1];
        Colour::from_rgb(r, g, b)
    }

    fn format_record(&self, record: &Record<'_>) -> String {
        let mut line = String::new();

        if self.show_time {
            let time_str = self.format_time();
            let display = if self.omit_repeated_times {
                let mut last = lock_recover(&self.last_time);
                if last.as_ref() == Some(&time_str) {
                    " ".repeat(time_str.len())
                } else {
                    *last = Some(time_str.clone());
                    time_str
                }
            } else {
                time_str
            };
            line.push_str(&display);
            line.push(' ');
        }

        if self.show_level {
            let padded = format!("{:<8}", record.level());
            if self.color {
                let codes = Self::level_colour(record.level()).ansi_codes(true).join(";");
                let _ = write!(line, "\x1b[{codes}m{padded}{RESET}");
            } else {
                line.push_str(&padded);
            }
            line.push(' ');
        }

        let _ = write!(line, "{}", record.args());

        if self.show_path
            && let Some(path) = record.file()
        {
            line.push(' ');
            line.push_str(path);
            if let Some(line_no) = record.line() {
                let _ = write!(line, ":{line_no}");
            }
        }

        line
    }
}

impl Log for ColourLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format_record(record);
        let mut writer = lock_recover(&self.writer);
        let _ = writeln!(writer, "{line}");
    }

    fn flush(&self) {
        let _ = lock_recover(&self.writer).flush();
    }
}

#[cfg(feature = "tracing")]
mod tracing_integration {
    use std::fmt::{self, Write as _};

    use log::{Level, Log, Record};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::{Layer, layer::Context};

    use super::ColourLogger;

    /// Tracing layer that writes events through a [`ColourLogger`].
    ///
    /// The event message comes first, followed by the remaining fields as
    /// `name=value` pairs. The logger's level filter applies.
    pub struct ColourTracingLayer {
        logger: ColourLogger,
    }

    impl ColourTracingLayer {
        /// Create a layer backed by a default `ColourLogger`.
        #[must_use]
        pub fn new() -> Self {
            Self::with_logger(ColourLogger::new())
        }

        /// Use an existing logger configuration.
        #[must_use]
        pub fn with_logger(logger: ColourLogger) -> Self {
            Self { logger }
        }

        /// Install as the global tracing subscriber.
        ///
        /// # Errors
        ///
        /// Fails if a global subscriber is already set.
        pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
            use tracing_subscriber::prelude::*;

            tracing::subscriber::set_global_default(tracing_subscriber::registry().with(self))
        }
    }

    impl Default for ColourTracingLayer {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Collects an event's fields into one line.
    #[derive(Default)]
    struct EventLine {
        message: String,
        fields: String,
    }

    impl EventLine {
        fn push(&mut self, field: &Field, value: fmt::Arguments<'_>) {
            if field.name() == "message" {
                let _ = self.message.write_fmt(value);
            } else {
                if !self.fields.is_empty() {
                    self.fields.push(' ');
                }
                let _ = write!(self.fields, "{}={value}", field.name());
            }
        }

        fn finish(self) -> String {
            match (self.message.is_empty(), self.fields.is_empty()) {
                (_, true) => self.message,
                (true, false) => self.fields,
                (false, false) => format!("{} {}", self.message, self.fields),
            }
        }
    }

    impl Visit for EventLine {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.push(field, format_args!("{value}"));
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.push(field, format_args!("{value:?}"));
        }
    }

    fn log_level(level: tracing::Level) -> Level {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }

    impl<S: Subscriber> Layer<S> for ColourTracingLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            let level = log_level(*metadata.level());
            if level > self.logger.level {
                return;
            }

            let mut line = EventLine::default();
            event.record(&mut line);
            let line = line.finish();

            self.logger.log(
                &Record::builder()
                    .args(format_args!("{line}"))
                    .level(level)
                    .target(metadata.target())
                    .file(metadata.file())
                    .line(metadata.line())
                    .module_path(metadata.module_path())
                    .build(),
            );
        }
    }
}

#[cfg(feature = "tracing")]
pub use tracing_integration::ColourTracingLayer;
