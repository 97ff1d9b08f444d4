//! Event loop configuration.

/// How the event loop clock advances when only timers are pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Jump straight to the next due timer. Deterministic; used by tests.
    #[default]
    Virtual,
    /// Sleep the current thread until the next timer is due.
    RealTime,
}

/// Settings for an [`EventLoop`](crate::EventLoop).
///
/// # Examples
///
/// ```
/// use async_runtime::{ClockMode, EventLoopConfig};
///
/// let config = EventLoopConfig::new()
///     .with_clock(ClockMode::RealTime)
///     .with_max_turns(10_000);
///
/// assert_eq!(config.clock, ClockMode::RealTime);
/// assert_eq!(config.max_turns, Some(10_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLoopConfig {
    /// Clock behaviour
    pub clock: ClockMode,
    /// Upper bound on loop turns per run; `None` means unbounded
    pub max_turns: Option<usize>,
}

impl EventLoopConfig {
    /// Creates the default configuration: virtual clock, no turn limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clock mode.
    pub fn with_clock(mut self, clock: ClockMode) -> Self {
        self.clock = clock;
        self
    }

    /// Limits the number of turns a single run may take.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }
}
