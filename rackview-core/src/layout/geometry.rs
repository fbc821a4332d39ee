//! Geometry constants for each layout family
//!
//! The port area sits between the status lines and the bottom event line of
//! a 240x240 panel. Every table below keeps its cells inside
//! `PORT_AREA_TOP..EVENT_LINE_Y`.

use rackview_display::SCREEN_WIDTH;

use super::id::{ChipWidth, HybridSplit, Tier};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First row available to port cells
pub const PORT_AREA_TOP: u16 = 116;

/// Top of the bottom event line
pub const EVENT_LINE_Y: u16 = 225;

/// Extra horizontal gap after every 8 output pins
pub const OUTPUT_GROUP_GAP: u16 = 2;

/// Vertical gap between output rows
pub const OUTPUT_ROW_GAP: u16 = 4;

/// Output pins per row
pub const OUTPUT_PINS_PER_ROW: u8 = 32;

/// Ports per band in multi-row input layouts
pub const INPUT_PORTS_PER_BAND: u8 = 16;

/// Geometry of one display region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutGeometry {
    /// Left edge of the first cell
    pub origin_x: u16,
    /// Top edge of the first cell
    pub origin_y: u16,
    /// Gap separating physical chip groups
    pub cell_offset: u16,
    /// Cell width in pixels
    pub cell_width: u16,
    /// Cell height in pixels
    pub cell_height: u16,
    /// Highest logical index (1-based) drawn in this region
    pub max_index: u8,
}

const fn centered(span: u16) -> u16 {
    (SCREEN_WIDTH - span) / 2
}

/// Input layouts: 4 pins per square port cell, 2 port rows per band
pub const fn input(tier: Tier) -> LayoutGeometry {
    match tier {
        // 4 columns
        Tier::T32 => LayoutGeometry {
            origin_x: centered(4 * 30),
            origin_y: 160,
            cell_offset: 3,
            cell_width: 30,
            cell_height: 30,
            max_index: 32,
        },
        // 8 columns, one chip-pair gap
        Tier::T64 => LayoutGeometry {
            origin_x: centered(8 * 26 + 3),
            origin_y: 168,
            cell_offset: 3,
            cell_width: 26,
            cell_height: 26,
            max_index: 64,
        },
        // 12 columns, single band
        Tier::T96 => LayoutGeometry {
            origin_x: centered(12 * 19 + 2 * 3),
            origin_y: 180,
            cell_offset: 3,
            cell_width: 19,
            cell_height: 19,
            max_index: 96,
        },
        // 2 bands of 8 columns
        Tier::T128 => LayoutGeometry {
            origin_x: centered(8 * 24 + 3),
            origin_y: 118,
            cell_offset: 3,
            cell_width: 24,
            cell_height: 24,
            max_index: 128,
        },
    }
}

/// Whether an input tier wraps into a second band of ports
pub const fn input_is_multi_row(tier: Tier) -> bool {
    matches!(tier, Tier::T128)
}

/// Output layouts: one narrow cell per pin, 32 pins per row
///
/// Narrow chips are only resolved up to `Tier::T64`; 8 of them carry 64 pins.
pub const fn output(tier: Tier, chip: ChipWidth) -> LayoutGeometry {
    const CELL_WIDTH: u16 = 6;
    const CHIP_GAP: u16 = 6;

    let span = match chip {
        // group gap every 8 pins, chip gap every 16
        ChipWidth::Wide => 32 * CELL_WIDTH + 3 * OUTPUT_GROUP_GAP + CHIP_GAP,
        // every group of 8 is its own chip
        ChipWidth::Narrow => 32 * CELL_WIDTH + 3 * (OUTPUT_GROUP_GAP + CHIP_GAP),
    };
    let (origin_y, cell_height) = match tier {
        Tier::T32 => (176, 40),
        Tier::T64 => (150, 30),
        Tier::T96 => (146, 20),
        Tier::T128 => (140, 16),
    };

    LayoutGeometry {
        origin_x: centered(span),
        origin_y,
        cell_offset: CHIP_GAP,
        cell_width: CELL_WIDTH,
        cell_height,
        max_index: tier.pins(),
    }
}

/// Hybrid layouts: compact input band on top, output rows below
///
/// Returns (input region, output region).
pub const fn hybrid(split: HybridSplit) -> (LayoutGeometry, LayoutGeometry) {
    const PORT: u16 = 19;

    let inputs = split.inputs();
    let columns = inputs.ports() as u16 / 2;
    let gaps = (inputs.ports() as u16 - 1) / 8;

    let input = LayoutGeometry {
        origin_x: centered(columns * PORT + gaps * 3),
        origin_y: 118,
        cell_offset: 3,
        cell_width: PORT,
        cell_height: PORT,
        max_index: inputs.pins(),
    };
    let output = LayoutGeometry {
        origin_x: centered(32 * 6 + 3 * OUTPUT_GROUP_GAP + 6),
        origin_y: 160,
        cell_offset: 6,
        cell_width: 6,
        cell_height: 14,
        max_index: split.outputs().pins(),
    };
    (input, output)
}

/// Smoke-detector enclosure: 16 columns of 3 cells
pub const fn smoke() -> LayoutGeometry {
    LayoutGeometry {
        origin_x: centered(16 * 13 + 3 * 3),
        origin_y: 158,
        cell_offset: 3,
        cell_width: 13,
        cell_height: 20,
        max_index: 48,
    }
}
