//! Cooperative timers
//!
//! Everything time-based is evaluated once per tick against the injected
//! millisecond clock. Nothing here blocks or draws: `TimerSet::poll`
//! returns a `TimerActions` value and the panel carries it out.

mod flash;
mod timeout;

pub use flash::{
    flash_key, FlashOscillator, FlashPhase, FLASH_OFF_MS, FLASH_ON_MS, FLASH_PERIOD_MS,
    MAX_FLASH_PORTS,
};
pub use timeout::Timeout;

use crate::config::{DEFAULT_DISPLAY_TIMEOUT_MS, DEFAULT_EVENT_TIMEOUT_MS};
use crate::state::Activity;

/// How long an rx/tx LED stays lit after a trigger
pub const RX_TX_LED_ON_MS: u32 = 300;

/// What fired during one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerActions {
    /// Drop the backlight to the dim level
    pub dim_backlight: bool,
    /// Blank the bottom event line
    pub clear_event: bool,
    /// Return the rx LED to the steady broker color
    pub revert_rx: bool,
    /// Return the tx LED to the steady broker color
    pub revert_tx: bool,
    /// New flash phase, if it changed
    pub flash: Option<FlashPhase>,
}

impl TimerActions {
    /// Check if nothing fired
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// All panel timers
#[derive(Debug, Clone)]
pub struct TimerSet {
    pub backlight: Timeout,
    pub event: Timeout,
    pub rx: Timeout,
    pub tx: Timeout,
    pub flash: FlashOscillator,
}

impl Default for TimerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerSet {
    /// Create disarmed timers with the default timeouts
    pub const fn new() -> Self {
        Self {
            backlight: Timeout::new(DEFAULT_DISPLAY_TIMEOUT_MS),
            event: Timeout::new(DEFAULT_EVENT_TIMEOUT_MS),
            rx: Timeout::new(RX_TX_LED_ON_MS),
            tx: Timeout::new(RX_TX_LED_ON_MS),
            flash: FlashOscillator::new(),
        }
    }

    /// Change the display and event timeouts (0 disables either)
    pub fn set_timeouts(&mut self, display_ms: u32, event_ms: u32) {
        self.backlight.set_duration(display_ms);
        self.event.set_duration(event_ms);
    }

    /// Timer for an activity LED
    pub fn activity(&mut self, activity: Activity) -> &mut Timeout {
        match activity {
            Activity::Rx => &mut self.rx,
            Activity::Tx => &mut self.tx,
        }
    }

    /// Disarm both activity LED timers
    pub fn cancel_activity(&mut self) {
        self.rx.cancel();
        self.tx.cancel();
    }

    /// Evaluate every timer once
    pub fn poll(&mut self, now_ms: u32) -> TimerActions {
        TimerActions {
            dim_backlight: self.backlight.poll(now_ms),
            clear_event: self.event.poll(now_ms),
            revert_rx: self.rx.poll(now_ms),
            revert_tx: self.tx.poll(now_ms),
            flash: self.flash.poll(now_ms),
        }
    }
}
