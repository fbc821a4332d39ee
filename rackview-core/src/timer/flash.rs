//! Flash oscillator for security ports in tamper or fault state

use crate::io::{MAX_EXPANDERS, PORTS_PER_EXPANDER};

/// Time the flashing ports are shown
pub const FLASH_ON_MS: u32 = 700;

/// Time the flashing ports are blanked
pub const FLASH_OFF_MS: u32 = 300;

/// Full oscillator period
pub const FLASH_PERIOD_MS: u32 = FLASH_ON_MS + FLASH_OFF_MS;

/// Flash ports tracked (one per 4-pin port of every expander)
pub const MAX_FLASH_PORTS: u8 = MAX_EXPANDERS as u8 * PORTS_PER_EXPANDER;

/// Oscillator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashPhase {
    On,
    Off,
}

/// Port key used by the flash set
pub const fn flash_key(expander: u8, port: u8) -> u8 {
    expander * PORTS_PER_EXPANDER + port
}

/// On/off oscillator with the set of ports it drives
///
/// Runs only while at least one port is registered. A started oscillator is
/// on for `[t0, t0 + 700)` and off for `[t0 + 700, t0 + 1000)`, repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashOscillator {
    started_at: Option<u32>,
    phase: FlashPhase,
    ports: u32,
}

impl Default for FlashOscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashOscillator {
    /// Create a stopped oscillator with no ports
    pub const fn new() -> Self {
        Self {
            started_at: None,
            phase: FlashPhase::On,
            ports: 0,
        }
    }

    /// Phase of an oscillator started at `started_at`
    pub const fn phase_at(started_at: u32, now_ms: u32) -> FlashPhase {
        if now_ms.wrapping_sub(started_at) % FLASH_PERIOD_MS < FLASH_ON_MS {
            FlashPhase::On
        } else {
            FlashPhase::Off
        }
    }

    /// Check if the oscillator is running
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Last phase reported
    pub const fn phase(&self) -> FlashPhase {
        self.phase
    }

    /// Add a port; starts the oscillator if it was idle
    ///
    /// Returns `false` for keys beyond the tracked range.
    pub fn register(&mut self, key: u8, now_ms: u32) -> bool {
        if key >= MAX_FLASH_PORTS {
            return false;
        }
        self.ports |= 1 << key;
        if self.started_at.is_none() {
            self.started_at = Some(now_ms);
            self.phase = FlashPhase::On;
        }
        true
    }

    /// Remove a port; stops the oscillator when none remain
    ///
    /// Returns `true` if the port was registered.
    pub fn unregister(&mut self, key: u8) -> bool {
        if !self.contains(key) {
            return false;
        }
        self.ports &= !(1 << key);
        if self.ports == 0 {
            self.stop();
        }
        true
    }

    /// Remove every port and stop
    pub fn stop(&mut self) {
        self.ports = 0;
        self.started_at = None;
        self.phase = FlashPhase::On;
    }

    /// Check if a port is registered
    pub const fn contains(&self, key: u8) -> bool {
        key < MAX_FLASH_PORTS && self.ports & (1 << key) != 0
    }

    /// Check if no port is registered
    pub const fn is_empty(&self) -> bool {
        self.ports == 0
    }

    /// Registered port keys, lowest first
    pub fn ports(&self) -> impl Iterator<Item = u8> {
        let ports = self.ports;
        (0..MAX_FLASH_PORTS).filter(move |&key| ports & (1 << key) != 0)
    }

    /// Advance to `now_ms`, returning the new phase on a phase change
    ///
    /// The start is moved forward by whole periods so the duty cycle holds
    /// across clock wrap-around.
    pub fn poll(&mut self, now_ms: u32) -> Option<FlashPhase> {
        let mut started_at = self.started_at?;
        let periods = now_ms.wrapping_sub(started_at) / FLASH_PERIOD_MS;
        if periods > 0 {
            started_at = started_at.wrapping_add(periods * FLASH_PERIOD_MS);
            self.started_at = Some(started_at);
        }
        let phase = Self::phase_at(started_at, now_ms);
        if phase == self.phase {
            return None;
        }
        self.phase = phase;
        Some(phase)
    }
}
