//! Board-agnostic status display core for rack I/O controllers
//!
//! This crate contains the display logic that does not depend on a
//! particular panel, network stack or broker client:
//!
//! - Port layouts and the logical-index to screen-cell mapping
//! - Change detection over 16-bit expander samples
//! - Per-pin configuration (type, invert, disabled) and security classification
//! - Network/broker connectivity state machine
//! - Cooperative timers (backlight dim, event line, activity LEDs, flashing)
//! - `StatusPanel`, which ties them together over a `DrawSurface`

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod io;
pub mod layout;
pub mod panel;
pub mod state;
pub mod timer;
pub mod traits;

pub use config::PanelSettings;
pub use layout::{LayoutError, PortLayout};
pub use panel::{StatusPanel, TickOutcome};
