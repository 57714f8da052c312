use std::sync::atomic::{AtomicUsize, Ordering};

#[repr(u8)]
#[derive(Debug, Copy, Eq, Ord, Clone, PartialEq, PartialOrd)]
pub enum ELoggingVerbosity
{
    Error = 0,
    Warning = 1,
    Normal = 2,
    Verbose = 3,
    VeryVerbose = 4,
}

impl ELoggingVerbosity
{
    pub fn level_filter(self) -> tracing::level_filters::LevelFilter
    {
        use tracing::level_filters::LevelFilter;

        match self
        {
            ELoggingVerbosity::Error => LevelFilter::ERROR,
            ELoggingVerbosity::Warning => LevelFilter::WARN,
            ELoggingVerbosity::Normal => LevelFilter::INFO,
            ELoggingVerbosity::Verbose => LevelFilter::DEBUG,
            ELoggingVerbosity::VeryVerbose => LevelFilter::TRACE,
        }
    }
}

static GLOBAL_VERBOSITY: AtomicUsize = AtomicUsize::new(ELoggingVerbosity::Normal as usize);

pub fn set_global_verbosity(level: ELoggingVerbosity)
{
    GLOBAL_VERBOSITY.store(level as usize, Ordering::Relaxed);
}

pub fn global_verbosity() -> ELoggingVerbosity
{
    match GLOBAL_VERBOSITY.load(Ordering::Relaxed)
    {
        0 => ELoggingVerbosity::Error,
        1 => ELoggingVerbosity::Warning,
        2 => ELoggingVerbosity::Normal,
        3 => ELoggingVerbosity::Verbose,
        _ => ELoggingVerbosity::VeryVerbose,
    }
}

/// Sets the global verbosity and installs a `tracing` fmt subscriber capped at
/// the matching level. Safe to call more than once; later calls only move the
/// verbosity gate.
pub fn init_logging(level: ELoggingVerbosity)
{
    set_global_verbosity(level);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level.level_filter())
        .with_target(false)
        .try_init();
}

#[doc(hidden)]
pub use tracing as __tracing;

#[macro_export]
macro_rules! vlog
{
    ($level:expr, $($arg:tt)+) =>
    {{
        let level: $crate::ELoggingVerbosity = $level;
        if (level as usize) <= $crate::global_verbosity() as usize
        {
            match level
            {
                $crate::ELoggingVerbosity::Error => $crate::__tracing::error!($($arg)+),
                $crate::ELoggingVerbosity::Warning => $crate::__tracing::warn!($($arg)+),
                $crate::ELoggingVerbosity::Normal => $crate::__tracing::info!($($arg)+),
                $crate::ELoggingVerbosity::Verbose => $crate::__tracing::debug!($($arg)+),
                $crate::ELoggingVerbosity::VeryVerbose => $crate::__tracing::trace!($($arg)+),
            }
        }
    }};
}

pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod presenter;
pub mod round;
pub mod session;

pub use crate::card::*;
pub use crate::config::*;
pub use crate::deck::*;
pub use crate::error::*;
pub use crate::presenter::*;
pub use crate::round::*;
pub use crate::session::*;
