//! Runtime-adjustable tracing for hosts embedding the codec
//!
//! The codec only emits `tracing` events. Hosts that have no subscriber of their own
//! can install [`TracingLevel::init_file_tracing`], which writes events to a log
//! file through a [`DynamicFilter`] whose level can be changed while running.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};

use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use super::lazy_file_writer::LazyFileWriter;

/// Current level as [`TracingLevel::as_u8`]; starts at warn
static CURRENT_LEVEL: AtomicU8 = AtomicU8::new(TracingLevel::Warn.as_u8());

/// Filter layer that admits events at or above the current [`TracingLevel`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicFilter;

impl DynamicFilter {
    /// Whether an event at `level` passes when the filter is set to `current`
    #[must_use]
    pub const fn admits(level: &Level, current: TracingLevel) -> bool {
        TracingLevel::from_level(level).as_u8() <= current.as_u8()
    }
}

impl<S: Subscriber> Layer<S> for DynamicFilter {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        Self::admits(metadata.level(), TracingLevel::current())
    }
}

/// Verbosity of the file log, parsed case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    #[default]
    Warn,
    /// Informational events
    Info,
    /// Per-step diagnostics
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warn => 1,
            Self::Info => 2,
            Self::Debug => 3,
            Self::Trace => 4,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Error,
            2 => Self::Info,
            3 => Self::Debug,
            4 => Self::Trace,
            _ => Self::Warn,
        }
    }

    const fn from_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            Level::DEBUG => Self::Debug,
            Level::TRACE => Self::Trace,
        }
    }

    /// Level currently applied by [`DynamicFilter`]
    #[must_use]
    pub fn current() -> Self { Self::from_u8(CURRENT_LEVEL.load(Ordering::Relaxed)) }

    /// Change the level applied by [`DynamicFilter`]
    pub fn set_current(self) {
        CURRENT_LEVEL.store(self.as_u8(), Ordering::Relaxed);
        tracing::info!(level = %self, "Tracing level changed");
    }

    /// Install a global subscriber writing to `path`
    ///
    /// The file is created on the first event written. Returns `false` when a
    /// global subscriber is already installed.
    #[must_use]
    pub fn init_file_tracing(path: impl Into<PathBuf>) -> bool {
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(LazyFileWriter::new(path.into()))
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default()
            .with(DynamicFilter)
            .with(file_layer)
            .try_init()
            .is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_levels_parse_case_insensitively() {
        assert_eq!("DEBUG".parse::<TracingLevel>().unwrap(), TracingLevel::Debug);
        assert_eq!("warn".parse::<TracingLevel>().unwrap(), TracingLevel::Warn);
        assert!("verbose".parse::<TracingLevel>().is_err());
        for level in TracingLevel::iter() {
            assert_eq!(TracingLevel::from_u8(level.as_u8()), level);
            assert_eq!(level.to_string(), level.as_ref());
        }
    }

    #[test]
    fn test_filter_admits_more_severe_events() {
        assert!(DynamicFilter::admits(&Level::ERROR, TracingLevel::Warn));
        assert!(DynamicFilter::admits(&Level::WARN, TracingLevel::Warn));
        assert!(!DynamicFilter::admits(&Level::DEBUG, TracingLevel::Warn));
        assert!(DynamicFilter::admits(&Level::TRACE, TracingLevel::Trace));
    }

    #[test]
    fn test_file_tracing_installs_once_and_writes_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("codec.log");

        assert!(TracingLevel::init_file_tracing(&log));
        assert!(!TracingLevel::init_file_tracing(dir.path().join("second.log")));

        TracingLevel::Info.set_current();
        assert_eq!(TracingLevel::current(), TracingLevel::Info);
        tracing::warn!("codec file log check");

        let contents = std::fs::read_to_string(&log).unwrap();
        assert!(contents.contains("codec file log check"));
        assert!(!dir.path().join("second.log").exists());

        TracingLevel::Warn.set_current();
    }
}
