//! Port area rendering
//!
//! Input regions draw one frame per 4-pin port with a rounded LED per pin;
//! a port whose lead pin is typed security is drawn as a single filled
//! block instead. Output and smoke regions draw one framed cell per pin.

use rackview_display::{Color, DrawSurface};

use super::style::{self, FLASH_NEUTRAL, PIN_RADIUS, PORT_AREA, PORT_NEUTRAL};
use super::StatusPanel;
use crate::io::{
    ChangedPins, PinState, PortState, MAX_EXPANDERS, PINS_PER_PORT, PORTS_PER_EXPANDER,
};
use crate::layout::{cell_for, ResolvedLayout};
use crate::timer::{flash_key, FlashPhase};
use crate::traits::Clock;

impl<D: DrawSurface, C: Clock> StatusPanel<D, C> {
    /// Redraw the whole port area
    ///
    /// Frames are drawn for every port the layout shows, white for present
    /// expanders and grey for absent ones. Pins show the last sample, or
    /// inactive for expanders not sampled since configuration. Slots an
    /// auto layout has no expander for are drawn as absent.
    pub fn redraw_ports(&mut self) {
        self.fill(PORT_AREA, Color::Black);
        self.timers.flash.stop();
        let Some(layout) = self.layout else {
            return;
        };

        for expander in 0..MAX_EXPANDERS as u8 {
            self.render_expander(&layout, expander, ChangedPins::ALL, true);
        }
        if layout.packed.is_some() {
            for slot in 0..MAX_EXPANDERS as u8 {
                if layout.expander_in(slot).is_none() {
                    self.render_empty_slot(&layout, slot);
                }
            }
        }
    }

    /// Draw the absent-expander frames and inactive pins of an empty slot
    fn render_empty_slot(&mut self, layout: &ResolvedLayout, slot: u8) {
        let frame = style::frame_color(false);
        for pin in 0..layout.pins_per_expander() {
            let Some(index) = layout.slot_index(slot, pin) else {
                return;
            };
            if layout.has_ports_at(index) && pin % PINS_PER_PORT == 0 {
                if let Some(cell) = cell_for(layout, index) {
                    self.outline(cell.frame(), frame);
                }
            }
            self.draw_pin(layout, index, PinState::Inactive, frame, true);
        }
    }

    /// Render the changed pins of one expander
    pub(super) fn render_expander(
        &mut self,
        layout: &ResolvedLayout,
        expander: u8,
        changed: ChangedPins,
        frames: bool,
    ) {
        let ports = layout.pins_per_expander() / PINS_PER_PORT;

        for port in 0..ports {
            let lead = port * PINS_PER_PORT;
            let Some(lead_index) = layout.logical_index(expander, lead) else {
                continue;
            };
            let port_changed = (changed.bits() >> lead) & 0x0F != 0;

            if layout.has_ports_at(lead_index) {
                if self.pins.is_security_port(expander, port) {
                    if frames {
                        self.port_frame(layout, expander, lead_index);
                    }
                    if port_changed || frames {
                        self.render_security_port(layout, expander, port);
                    }
                    continue;
                }
                // A full repaint may follow a security block, clear it first
                if frames || changed == ChangedPins::ALL {
                    if let Some(cell) = cell_for(layout, lead_index) {
                        self.fill(style::port_interior(cell.frame()), PORT_NEUTRAL);
                    }
                }
                if frames {
                    self.port_frame(layout, expander, lead_index);
                }
            }

            for pin in lead..lead + PINS_PER_PORT {
                if frames || changed.contains(pin) {
                    self.render_pin(layout, expander, pin, frames);
                }
            }
        }
    }

    fn port_frame(&mut self, layout: &ResolvedLayout, expander: u8, lead_index: u8) {
        if let Some(cell) = cell_for(layout, lead_index) {
            let color = style::frame_color(self.is_present(expander));
            self.outline(cell.frame(), color);
        }
    }

    /// Draw one pin LED (and, for standalone cells, its frame)
    fn render_pin(&mut self, layout: &ResolvedLayout, expander: u8, pin: u8, frame: bool) {
        let Some(index) = layout.logical_index(expander, pin) else {
            return;
        };

        let state = match self.live_sample(expander) {
            Some(sample) => self.pins.pin_state(expander, pin, sample),
            None if self.pins.is_disabled(expander, pin) == Some(true) => {
                Some(PinState::Disabled)
            }
            None => Some(PinState::Inactive),
        };
        let Some(state) = state else {
            return;
        };
        let frame_color = style::frame_color(self.is_present(expander));
        self.draw_pin(layout, index, state, frame_color, frame);
    }

    fn draw_pin(
        &mut self,
        layout: &ResolvedLayout,
        index: u8,
        state: PinState,
        frame_color: Color,
        frame: bool,
    ) {
        let Some(cell) = cell_for(layout, index) else {
            return;
        };
        let color = style::pin_color(state);

        if cell.quadrant.is_some() {
            self.round_fill(cell.led(), PIN_RADIUS, color);
        } else {
            if frame {
                self.outline(cell.frame(), frame_color);
            }
            self.fill(cell.led(), color);
        }
    }

    /// Draw a security port from its live classification
    ///
    /// Keeps the flash registration in step with the classification and
    /// honors the current flash phase.
    pub(super) fn render_security_port(
        &mut self,
        layout: &ResolvedLayout,
        expander: u8,
        port: u8,
    ) {
        let Some(index) = layout.logical_index(expander, port * PINS_PER_PORT) else {
            return;
        };
        let Some(cell) = cell_for(layout, index) else {
            return;
        };
        let interior = style::port_interior(cell.frame());
        let key = flash_key(expander, port);

        let state = self
            .live_sample(expander)
            .and_then(|sample| self.pins.port_state(expander, port, sample));

        let color = match state {
            Some(PortState::Security(security)) if security.flashes() => {
                let now = self.clock.now_ms();
                if !self.timers.flash.contains(key) {
                    debug!("port {}.{} flashing: {:?}", expander, port, security);
                }
                self.timers.flash.register(key, now);
                match self.timers.flash.phase() {
                    FlashPhase::On => style::security_color(security),
                    FlashPhase::Off => FLASH_NEUTRAL,
                }
            }
            Some(PortState::Security(security)) => {
                self.timers.flash.unregister(key);
                style::security_color(security)
            }
            _ => {
                self.timers.flash.unregister(key);
                PORT_NEUTRAL
            }
        };
        self.fill(interior, color);
    }

    /// Re-render every flashing port for a new oscillator phase
    pub(super) fn render_flash_phase(&mut self, phase: FlashPhase) {
        let Some(layout) = self.layout else {
            return;
        };
        trace!("flash phase {:?}", phase);

        let flash = self.timers.flash;
        for key in flash.ports() {
            let expander = key / PORTS_PER_EXPANDER;
            let port = key % PORTS_PER_EXPANDER;
            self.render_security_port(&layout, expander, port);
        }
    }

    /// Last sample of an expander, `None` if not sampled since configuration
    fn live_sample(&self, expander: u8) -> Option<u16> {
        self.diff
            .state(expander)
            .filter(|state| !state.dirty)
            .map(|state| state.sample)
    }

    fn is_present(&self, expander: u8) -> bool {
        (expander as usize) < MAX_EXPANDERS && self.presence_mask & (1 << expander) != 0
    }
}
