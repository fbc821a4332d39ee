//! Expander sample handling
//!
//! Change detection over raw samples and the per-pin configuration that
//! turns sample bits into rendered pin and port states.

mod diff;
mod pins;

pub use diff::{ChangedPins, DiffEngine, ExpanderState, MAX_EXPANDERS, PINS_PER_EXPANDER};
pub use pins::{
    PinConfigStore, PinState, PinType, PortState, SecurityState, PINS_PER_PORT,
    PORTS_PER_EXPANDER,
};
