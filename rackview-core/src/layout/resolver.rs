//! Layout resolution
//!
//! Turns a symbolic layout and the expander presence mask into the concrete
//! geometry used for every subsequent cell lookup. Resolution happens once
//! per `configure`; the result is cached by the panel.

use super::geometry::{self, LayoutGeometry};
use super::id::{Capacity, ChipWidth, PortLayout, Tier};
use crate::io::MAX_EXPANDERS;

/// Geometry family, resolved once at configure time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutFamily {
    /// 4-pin port cells with LED quadrants
    Input {
        geometry: LayoutGeometry,
        multi_row: bool,
    },
    /// One cell per pin
    Output {
        geometry: LayoutGeometry,
        chip: ChipWidth,
    },
    /// Input ports up to `threshold`, output pins after it
    Hybrid {
        inputs: LayoutGeometry,
        outputs: LayoutGeometry,
        threshold: u8,
    },
    /// Interleaved detector columns
    Smoke { geometry: LayoutGeometry },
}

/// Region a logical index falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    Input,
    Output,
}

/// A layout with its geometry resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolvedLayout {
    /// Configured layout with any auto capacity replaced by the detected tier
    pub layout: PortLayout,
    /// Geometry family and its cached parameters
    pub family: LayoutFamily,
    /// Presence mask of an auto layout; its expanders fill consecutive slots
    pub packed: Option<u8>,
}

impl ResolvedLayout {
    /// Pins per expander feeding this layout
    pub const fn pins_per_expander(&self) -> u8 {
        match self.family {
            LayoutFamily::Output { chip, .. } => chip.pins(),
            _ => 16,
        }
    }

    /// Highest logical index (1-based) shown by this layout
    pub const fn max_index(&self) -> u8 {
        match self.family {
            LayoutFamily::Input { geometry, .. }
            | LayoutFamily::Output { geometry, .. }
            | LayoutFamily::Smoke { geometry } => geometry.max_index,
            LayoutFamily::Hybrid {
                inputs, outputs, ..
            } => inputs.max_index + outputs.max_index,
        }
    }

    /// Logical index where output numbering begins (0 if none)
    ///
    /// Indices above the threshold are outputs.
    pub const fn output_threshold(&self) -> u8 {
        match self.family {
            LayoutFamily::Input { geometry, .. } => geometry.max_index,
            LayoutFamily::Output { .. } => 0,
            LayoutFamily::Hybrid { threshold, .. } => threshold,
            LayoutFamily::Smoke { .. } => 16,
        }
    }

    /// Region of a logical index, `None` if out of range
    pub fn region(&self, index: u8) -> Option<Region> {
        if index == 0 || index > self.max_index() {
            return None;
        }
        if index > self.output_threshold() {
            Some(Region::Output)
        } else {
            Some(Region::Input)
        }
    }

    /// Whether 4-pin port cells are drawn at this index
    pub fn has_ports_at(&self, index: u8) -> bool {
        match self.family {
            LayoutFamily::Input { .. } | LayoutFamily::Hybrid { .. } => {
                self.region(index) == Some(Region::Input)
            }
            _ => false,
        }
    }

    /// Display slot of an expander
    ///
    /// Fixed layouts place expanders by address. Auto layouts place the
    /// present expanders in consecutive slots by rank within the mask and
    /// give absent ones no slot.
    pub fn slot_of(&self, expander: u8) -> Option<u8> {
        if expander as usize >= MAX_EXPANDERS {
            return None;
        }
        match self.packed {
            None => Some(expander),
            Some(mask) if mask & (1 << expander) != 0 => {
                let below = mask & ((1u16 << expander) - 1) as u8;
                Some(below.count_ones() as u8)
            }
            Some(_) => None,
        }
    }

    /// Expander shown in a display slot, `None` for an empty slot
    pub fn expander_in(&self, slot: u8) -> Option<u8> {
        if slot as usize >= MAX_EXPANDERS {
            return None;
        }
        match self.packed {
            None => Some(slot),
            Some(mask) => (0..MAX_EXPANDERS as u8)
                .filter(|&expander| mask & (1 << expander) != 0)
                .nth(slot as usize),
        }
    }

    /// Logical index (1-based) of a pin in a display slot
    pub fn slot_index(&self, slot: u8, pin: u8) -> Option<u8> {
        let per_chip = self.pins_per_expander();
        if slot as usize >= MAX_EXPANDERS || pin >= per_chip {
            return None;
        }
        let index = slot as u16 * per_chip as u16 + pin as u16 + 1;
        if index > self.max_index() as u16 {
            return None;
        }
        Some(index as u8)
    }

    /// Logical index (1-based) of an expander pin
    ///
    /// Returns `None` for pins the layout does not show: expanders beyond
    /// the fixed maximum or without a slot, pins beyond the chip width, or
    /// indices beyond the layout capacity.
    pub fn logical_index(&self, expander: u8, pin: u8) -> Option<u8> {
        self.slot_of(expander)
            .and_then(|slot| self.slot_index(slot, pin))
    }
}

/// Pick the capacity tier for an auto layout from the expander presence mask
///
/// The thresholds are applied to the population of the mask packed into its
/// lowest bits, so gaps in expander addressing do not inflate the tier.
pub fn auto_tier(presence_mask: u8, chip: ChipWidth) -> Tier {
    let populated = presence_mask.count_ones();
    let packed: u16 = (1u16 << populated) - 1;

    match chip {
        ChipWidth::Wide => {
            if packed < 0x04 {
                Tier::T32
            } else if packed < 0x10 {
                Tier::T64
            } else if packed < 0x40 {
                Tier::T96
            } else {
                Tier::T128
            }
        }
        // 8 narrow chips top out at 64 pins
        ChipWidth::Narrow => {
            if packed < 0x10 {
                Tier::T32
            } else {
                Tier::T64
            }
        }
    }
}

/// Resolve a layout against the expander presence mask
///
/// Deterministic: the same inputs always produce the same geometry.
pub fn resolve(layout: PortLayout, presence_mask: u8) -> ResolvedLayout {
    match layout {
        PortLayout::Input(capacity) => {
            let tier = match capacity {
                Capacity::Auto => auto_tier(presence_mask, ChipWidth::Wide),
                Capacity::Fixed(tier) => tier,
            };
            ResolvedLayout {
                layout: PortLayout::Input(Capacity::Fixed(tier)),
                family: LayoutFamily::Input {
                    geometry: geometry::input(tier),
                    multi_row: geometry::input_is_multi_row(tier),
                },
                packed: packed(capacity, presence_mask),
            }
        }
        PortLayout::Output(capacity, chip) => {
            let tier = match capacity {
                Capacity::Auto => auto_tier(presence_mask, chip),
                Capacity::Fixed(tier) if chip == ChipWidth::Narrow => tier.min(Tier::T64),
                Capacity::Fixed(tier) => tier,
            };
            ResolvedLayout {
                layout: PortLayout::Output(Capacity::Fixed(tier), chip),
                family: LayoutFamily::Output {
                    geometry: geometry::output(tier, chip),
                    chip,
                },
                packed: packed(capacity, presence_mask),
            }
        }
        PortLayout::Hybrid(split) => {
            let (inputs, outputs) = geometry::hybrid(split);
            ResolvedLayout {
                layout,
                family: LayoutFamily::Hybrid {
                    inputs,
                    outputs,
                    threshold: split.inputs().pins(),
                },
                packed: None,
            }
        }
        PortLayout::Smoke => ResolvedLayout {
            layout,
            family: LayoutFamily::Smoke {
                geometry: geometry::smoke(),
            },
            packed: None,
        },
    }
}

fn packed(capacity: Capacity, presence_mask: u8) -> Option<u8> {
    match capacity {
        Capacity::Auto => Some(presence_mask),
        Capacity::Fixed(_) => None,
    }
}

/// Resolve a numeric layout code
///
/// Unknown codes leave the layout unresolved.
pub fn resolve_code(code: u16, presence_mask: u8) -> Option<ResolvedLayout> {
    PortLayout::from_code(code).map(|layout| resolve(layout, presence_mask))
}
