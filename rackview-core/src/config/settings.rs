//! Panel settings
//!
//! Backlight levels and timeouts. Hosts typically load these from their own
//! configuration store; the `serde` feature adds the derives for that.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Backlight level after activity (%)
pub const DEFAULT_BACKLIGHT_ON_PCT: u8 = 100;

/// Backlight level once the display timeout expires (%), 0 turns it off
pub const DEFAULT_BACKLIGHT_DIM_PCT: u8 = 10;

/// How long the backlight stays on after activity
pub const DEFAULT_DISPLAY_TIMEOUT_MS: u32 = 10_000;

/// How long an event stays on the bottom line
pub const DEFAULT_EVENT_TIMEOUT_MS: u32 = 3_000;

/// Backlight and timeout settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelSettings {
    /// Backlight when on (0-100 %)
    pub backlight_on_pct: u8,
    /// Backlight when dimmed (0-100 %)
    pub backlight_dim_pct: u8,
    /// Dim after this much inactivity, 0 never dims
    pub display_timeout_ms: u32,
    /// Clear the event line after this long, 0 keeps it
    pub event_timeout_ms: u32,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            backlight_on_pct: DEFAULT_BACKLIGHT_ON_PCT,
            backlight_dim_pct: DEFAULT_BACKLIGHT_DIM_PCT,
            display_timeout_ms: DEFAULT_DISPLAY_TIMEOUT_MS,
            event_timeout_ms: DEFAULT_EVENT_TIMEOUT_MS,
        }
    }
}

impl PanelSettings {
    /// Copy with backlight levels clamped to 100 %
    pub fn validated(self) -> Self {
        Self {
            backlight_on_pct: self.backlight_on_pct.min(100),
            backlight_dim_pct: self.backlight_dim_pct.min(100),
            ..self
        }
    }
}
