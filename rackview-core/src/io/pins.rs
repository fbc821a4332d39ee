//! Per-pin configuration and semantic pin state
//!
//! Configuration is stored as one `u16` bit vector per expander for each
//! attribute. Samples are active-low: a pin reads active when its bit is 0,
//! unless the pin is inverted.

use super::diff::{MAX_EXPANDERS, PINS_PER_EXPANDER};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pins grouped into one port
pub const PINS_PER_PORT: u8 = 4;

/// Ports per expander
pub const PORTS_PER_EXPANDER: u8 = PINS_PER_EXPANDER / PINS_PER_PORT;

/// Pin wiring type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinType {
    /// Plain contact, one LED per pin
    #[default]
    Default,
    /// End-of-line supervised sensor; the whole 4-pin port is one reading
    Security,
}

/// Rendered state of a single pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    Active,
    Inactive,
    Disabled,
}

/// Classification of a security port nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecurityState {
    Normal,
    Alarm,
    TamperOrShort,
    Fault,
}

impl SecurityState {
    /// Classify the four levels of a security port (bit 0 is the lowest pin)
    pub const fn classify(nibble: u8) -> Self {
        match nibble & 0x0F {
            0b0101 => SecurityState::Normal,
            0b0001 => SecurityState::Alarm,
            0b0010 | 0b1101 => SecurityState::TamperOrShort,
            _ => SecurityState::Fault,
        }
    }

    /// Whether this state is shown flashing
    pub const fn flashes(self) -> bool {
        matches!(self, SecurityState::TamperOrShort | SecurityState::Fault)
    }
}

/// Rendered state of a 4-pin port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortState {
    /// Default port, each pin drawn on its own
    Pins([PinState; 4]),
    /// Security port with its classification
    Security(SecurityState),
    /// Security port whose lead pin is disabled
    Disabled,
}

impl PortState {
    /// Whether this port belongs on the flash list
    pub const fn flashes(&self) -> bool {
        match self {
            PortState::Security(state) => state.flashes(),
            _ => false,
        }
    }
}

/// Bit vectors for pin type, invert and disabled flags
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfigStore {
    security: [u16; MAX_EXPANDERS],
    invert: [u16; MAX_EXPANDERS],
    disabled: [u16; MAX_EXPANDERS],
}

fn set_bit(bits: &mut [u16; MAX_EXPANDERS], expander: u8, pin: u8, value: bool) -> bool {
    if pin >= PINS_PER_EXPANDER {
        return false;
    }
    match bits.get_mut(expander as usize) {
        Some(word) => {
            if value {
                *word |= 1 << pin;
            } else {
                *word &= !(1 << pin);
            }
            true
        }
        None => false,
    }
}

fn get_bit(bits: &[u16; MAX_EXPANDERS], expander: u8, pin: u8) -> Option<bool> {
    if pin >= PINS_PER_EXPANDER {
        return None;
    }
    bits.get(expander as usize).map(|word| word & (1 << pin) != 0)
}

impl PinConfigStore {
    /// Create a store with every pin default, non-inverted, enabled
    pub const fn new() -> Self {
        Self {
            security: [0; MAX_EXPANDERS],
            invert: [0; MAX_EXPANDERS],
            disabled: [0; MAX_EXPANDERS],
        }
    }

    /// Set a pin's type
    ///
    /// Returns `false` (and changes nothing) for out-of-range addresses.
    pub fn set_pin_type(&mut self, expander: u8, pin: u8, pin_type: PinType) -> bool {
        set_bit(
            &mut self.security,
            expander,
            pin,
            pin_type == PinType::Security,
        )
    }

    /// Set a pin's invert flag
    pub fn set_pin_invert(&mut self, expander: u8, pin: u8, invert: bool) -> bool {
        set_bit(&mut self.invert, expander, pin, invert)
    }

    /// Set a pin's disabled flag
    pub fn set_pin_disabled(&mut self, expander: u8, pin: u8, disabled: bool) -> bool {
        set_bit(&mut self.disabled, expander, pin, disabled)
    }

    /// Get a pin's type
    pub fn pin_type(&self, expander: u8, pin: u8) -> Option<PinType> {
        get_bit(&self.security, expander, pin).map(|security| {
            if security {
                PinType::Security
            } else {
                PinType::Default
            }
        })
    }

    /// Check if a pin is inverted
    pub fn is_inverted(&self, expander: u8, pin: u8) -> Option<bool> {
        get_bit(&self.invert, expander, pin)
    }

    /// Check if a pin is disabled
    pub fn is_disabled(&self, expander: u8, pin: u8) -> Option<bool> {
        get_bit(&self.disabled, expander, pin)
    }

    /// Sample with per-pin invert applied
    pub fn levels(&self, expander: u8, sample: u16) -> Option<u16> {
        self.invert
            .get(expander as usize)
            .map(|invert| sample ^ invert)
    }

    /// Whether a port renders as a security port
    pub fn is_security_port(&self, expander: u8, port: u8) -> bool {
        port < PORTS_PER_EXPANDER
            && get_bit(&self.security, expander, port * PINS_PER_PORT) == Some(true)
    }

    /// Semantic state of one pin in a sample
    pub fn pin_state(&self, expander: u8, pin: u8, sample: u16) -> Option<PinState> {
        if self.is_disabled(expander, pin)? {
            return Some(PinState::Disabled);
        }
        let levels = self.levels(expander, sample)?;
        // Active-low inputs
        if levels & (1 << pin) == 0 {
            Some(PinState::Active)
        } else {
            Some(PinState::Inactive)
        }
    }

    /// Semantic state of a 4-pin port in a sample
    pub fn port_state(&self, expander: u8, port: u8, sample: u16) -> Option<PortState> {
        if expander as usize >= MAX_EXPANDERS || port >= PORTS_PER_EXPANDER {
            return None;
        }
        let first = port * PINS_PER_PORT;

        if self.is_security_port(expander, port) {
            if self.is_disabled(expander, first)? {
                return Some(PortState::Disabled);
            }
            let nibble = (self.levels(expander, sample)? >> first) as u8 & 0x0F;
            return Some(PortState::Security(SecurityState::classify(nibble)));
        }

        let mut pins = [PinState::Inactive; 4];
        for (offset, state) in pins.iter_mut().enumerate() {
            *state = self.pin_state(expander, first + offset as u8, sample)?;
        }
        Some(PortState::Pins(pins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_classification() {
        assert_eq!(SecurityState::classify(0b0101), SecurityState::Normal);
        assert_eq!(SecurityState::classify(0b0001), SecurityState::Alarm);
        assert_eq!(SecurityState::classify(0b0010), SecurityState::TamperOrShort);
        assert_eq!(SecurityState::classify(0b1101), SecurityState::TamperOrShort);
        assert_eq!(SecurityState::classify(0b0000), SecurityState::Fault);
        assert_eq!(SecurityState::classify(0b1111), SecurityState::Fault);

        assert!(!SecurityState::Normal.flashes());
        assert!(!SecurityState::Alarm.flashes());
        assert!(SecurityState::TamperOrShort.flashes());
        assert!(SecurityState::Fault.flashes());
    }

    #[test]
    fn test_active_low_and_invert() {
        let mut store = PinConfigStore::new();
        assert_eq!(store.pin_state(0, 0, 0xFFFE), Some(PinState::Active));
        assert_eq!(store.pin_state(0, 1, 0xFFFE), Some(PinState::Inactive));

        store.set_pin_invert(0, 0, true);
        assert_eq!(store.pin_state(0, 0, 0xFFFE), Some(PinState::Inactive));
        assert_eq!(store.is_inverted(0, 0), Some(true));
    }

    #[test]
    fn test_disabled_pin_ignores_sample() {
        let mut store = PinConfigStore::new();
        store.set_pin_disabled(2, 5, true);
        for sample in [0x0000, 0xFFFF, 0x0020, 0xFFDF] {
            assert_eq!(store.pin_state(2, 5, sample), Some(PinState::Disabled));
        }
        store.set_pin_disabled(2, 5, false);
        assert_eq!(store.pin_state(2, 5, 0x0000), Some(PinState::Active));
    }

    #[test]
    fn test_out_of_range_mutations_ignored() {
        let mut store = PinConfigStore::new();
        assert!(!store.set_pin_type(8, 0, PinType::Security));
        assert!(!store.set_pin_invert(0, 16, true));
        assert!(!store.set_pin_disabled(255, 255, true));
        assert_eq!(store.pin_type(8, 0), None);
        assert_eq!(store.pin_state(0, 16, 0), None);
        assert_eq!(store.port_state(0, 4, 0), None);
    }

    #[test]
    fn test_security_port_uses_lead_pin_type() {
        let mut store = PinConfigStore::new();
        store.set_pin_type(1, 5, PinType::Security);
        assert!(!store.is_security_port(1, 1));

        store.set_pin_type(1, 4, PinType::Security);
        assert!(store.is_security_port(1, 1));
        assert!(!store.is_security_port(1, 0));
    }

    #[test]
    fn test_security_port_state() {
        let mut store = PinConfigStore::new();
        store.set_pin_type(0, 4, PinType::Security);

        // Port 1 occupies bits 4..8
        let normal = 0b0101 << 4;
        assert_eq!(
            store.port_state(0, 1, normal),
            Some(PortState::Security(SecurityState::Normal))
        );
        let tamper = 0b0010 << 4;
        let state = store.port_state(0, 1, tamper).unwrap();
        assert_eq!(state, PortState::Security(SecurityState::TamperOrShort));
        assert!(state.flashes());
    }

    #[test]
    fn test_security_nibble_after_invert() {
        let mut store = PinConfigStore::new();
        store.set_pin_type(0, 0, PinType::Security);
        // Raw 0b0100 with pin 0 inverted reads 0b0101
        store.set_pin_invert(0, 0, true);
        assert_eq!(
            store.port_state(0, 0, 0b0100),
            Some(PortState::Security(SecurityState::Normal))
        );
    }

    #[test]
    fn test_disabled_security_port_never_flashes() {
        let mut store = PinConfigStore::new();
        store.set_pin_type(0, 0, PinType::Security);
        store.set_pin_disabled(0, 0, true);
        for nibble in 0..16u16 {
            let state = store.port_state(0, 0, nibble).unwrap();
            assert_eq!(state, PortState::Disabled);
            assert!(!state.flashes());
        }
    }

    #[test]
    fn test_default_port_state() {
        let mut store = PinConfigStore::new();
        store.set_pin_disabled(0, 2, true);
        assert_eq!(
            store.port_state(0, 0, 0b1110),
            Some(PortState::Pins([
                PinState::Active,
                PinState::Inactive,
                PinState::Disabled,
                PinState::Inactive,
            ]))
        );
    }
}
