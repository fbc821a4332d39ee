//! Per-expander change detection
//!
//! Keeps the last sample of every expander and reports which pins changed.
//! An expander that has never been diffed (or was marked dirty) reports all
//! 16 pins as changed on its next sample, forcing a full repaint.

/// Maximum addressable expanders
pub const MAX_EXPANDERS: usize = 8;

/// Pins sampled per expander
pub const PINS_PER_EXPANDER: u8 = 16;

/// Set of changed pin positions within one 16-bit sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChangedPins(u16);

impl ChangedPins {
    /// No pin changed
    pub const NONE: Self = Self(0);

    /// Every pin changed
    pub const ALL: Self = Self(u16::MAX);

    /// Create from a bit mask
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw bit mask
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Check if no pin changed
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of changed pins
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Check if a pin changed
    pub const fn contains(self, pin: u8) -> bool {
        pin < PINS_PER_EXPANDER && self.0 & (1 << pin) != 0
    }

    /// Changed pin positions, lowest first
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..PINS_PER_EXPANDER).filter(move |&pin| self.contains(pin))
    }
}

/// Last-seen state of one expander
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExpanderState {
    /// Last sample ingested
    pub sample: u16,
    /// No sample diffed since (re)configuration
    pub dirty: bool,
}

impl ExpanderState {
    const fn new() -> Self {
        Self {
            sample: 0,
            dirty: true,
        }
    }
}

impl Default for ExpanderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Change detector over all expanders
#[derive(Debug, Clone)]
pub struct DiffEngine {
    expanders: [ExpanderState; MAX_EXPANDERS],
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffEngine {
    /// Create a detector with every expander dirty
    pub const fn new() -> Self {
        Self {
            expanders: [ExpanderState::new(); MAX_EXPANDERS],
        }
    }

    /// Ingest a sample and return the changed pins
    ///
    /// Returns `None` for expander ids beyond the fixed maximum; the sample
    /// is dropped.
    pub fn ingest(&mut self, expander: u8, sample: u16) -> Option<ChangedPins> {
        let state = self.expanders.get_mut(expander as usize)?;

        let changed = if state.dirty {
            state.dirty = false;
            ChangedPins::ALL
        } else {
            ChangedPins(sample ^ state.sample)
        };
        state.sample = sample;

        Some(changed)
    }

    /// Force the next sample of an expander to report every pin
    ///
    /// Returns `false` if the expander id is out of range.
    pub fn mark_dirty(&mut self, expander: u8) -> bool {
        match self.expanders.get_mut(expander as usize) {
            Some(state) => {
                state.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Force a full repaint on the next sample of every expander
    pub fn mark_all_dirty(&mut self) {
        for state in &mut self.expanders {
            state.dirty = true;
        }
    }

    /// Get the state of an expander
    pub fn state(&self, expander: u8) -> Option<&ExpanderState> {
        self.expanders.get(expander as usize)
    }

    /// Last sample of an expander
    pub fn sample(&self, expander: u8) -> Option<u16> {
        self.state(expander).map(|s| s.sample)
    }
}
