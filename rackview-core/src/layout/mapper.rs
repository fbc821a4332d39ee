//! Logical index to screen cell mapping
//!
//! Input ports are drawn as a square cell holding four pin LEDs:
//!
//! ```text
//!   Ports:  | 1 | 3 | 5 | 7 |...     Pins:  | 1 : 3 | 9 : 11|
//!           +---+---+---+---+               |.......|.......|
//!           | 2 | 4 | 6 | 8 |               | 2 : 4 | 10: 12|
//!                                           +-------+-------+...
//! ```
//!
//! Outputs get one narrow cell per pin, 32 to a row. The smoke-detector
//! enclosure interleaves one input under two outputs per column, following
//! the enclosure silkscreen.

use rackview_display::Rect;

use super::geometry::{
    LayoutGeometry, INPUT_PORTS_PER_BAND, OUTPUT_GROUP_GAP, OUTPUT_PINS_PER_ROW, OUTPUT_ROW_GAP,
};
use super::id::ChipWidth;
use super::resolver::{LayoutFamily, ResolvedLayout};

/// Inputs in the smoke-detector layout
pub const SMOKE_INPUTS: u8 = 16;

/// Cells per smoke-detector column
const SMOKE_CELLS_PER_COLUMN: u16 = 3;

/// Pin LED position inside a port cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quadrant {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl Quadrant {
    /// Quadrant of the n-th pin of a port (0..4)
    pub const fn from_pin(pin: u8) -> Self {
        match pin % 4 {
            0 => Quadrant::TopLeft,
            1 => Quadrant::BottomLeft,
            2 => Quadrant::TopRight,
            _ => Quadrant::BottomRight,
        }
    }
}

/// Screen cell of one logical index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cell {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// LED position for pins drawn inside a port cell
    pub quadrant: Option<Quadrant>,
}

impl Cell {
    /// Outer frame of the cell (the whole port for quadrant cells)
    pub const fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Area filled to show the pin state
    pub const fn led(&self) -> Rect {
        let (w, h) = (self.width, self.height);
        let (led_w, led_h) = (w / 2 - 2, h / 2 - 2);
        match self.quadrant {
            Some(Quadrant::TopLeft) => Rect::new(self.x + 2, self.y + 2, led_w, led_h),
            Some(Quadrant::BottomLeft) => Rect::new(self.x + 2, self.y + h / 2 + 1, led_w, led_h),
            Some(Quadrant::TopRight) => Rect::new(self.x + w / 2 + 1, self.y + 2, led_w, led_h),
            Some(Quadrant::BottomRight) => {
                Rect::new(self.x + w / 2 + 1, self.y + h / 2 + 1, led_w, led_h)
            }
            None => Rect::new(self.x + 1, self.y + 1, w - 2, h - 2),
        }
    }
}

/// Remap a 0-based smoke layout index onto its position in the
/// 3-cells-per-column grid
///
/// Inputs sit in the third cell of each column, outputs fill the first two
/// cells pairwise.
pub const fn smoke_position(index: u8) -> u8 {
    if index < SMOKE_INPUTS {
        index * 3 + 2
    } else {
        let j = index - SMOKE_INPUTS;
        (j / 2) * 3 + j % 2
    }
}

/// Resolve the cell of a 1-based logical index
///
/// Returns `None` for index 0 and anything beyond the layout capacity.
pub fn cell_for(layout: &ResolvedLayout, index: u8) -> Option<Cell> {
    if index == 0 || index > layout.max_index() {
        return None;
    }

    match layout.family {
        LayoutFamily::Input {
            geometry,
            multi_row,
        } => Some(input_cell(&geometry, index, multi_row)),
        LayoutFamily::Output { geometry, chip } => Some(output_cell(&geometry, index, chip)),
        LayoutFamily::Hybrid {
            inputs,
            outputs,
            threshold,
        } => {
            if index <= threshold {
                Some(input_cell(&inputs, index, false))
            } else {
                Some(output_cell(&outputs, index - threshold, ChipWidth::Wide))
            }
        }
        LayoutFamily::Smoke { geometry } => Some(smoke_cell(&geometry, index)),
    }
}

fn input_cell(g: &LayoutGeometry, index: u8, multi_row: bool) -> Cell {
    let pin = index - 1;
    let port = (pin / 4) as u16;
    let per_band = INPUT_PORTS_PER_BAND as u16;

    let (band, local) = if multi_row {
        (port / per_band, port % per_band)
    } else {
        (0, port)
    };
    let column = local / 2;
    let row = local % 2;

    Cell {
        x: g.origin_x + column * g.cell_width + (local / 8) * g.cell_offset,
        y: g.origin_y + row * g.cell_height + band * (2 * g.cell_height + g.cell_offset),
        width: g.cell_width,
        height: g.cell_height,
        quadrant: Some(Quadrant::from_pin(pin)),
    }
}

fn output_cell(g: &LayoutGeometry, index: u8, chip: ChipWidth) -> Cell {
    let pin = (index - 1) as u16;
    let per_row = OUTPUT_PINS_PER_ROW as u16;
    let row = pin / per_row;
    let k = pin % per_row;

    let gaps = match chip {
        ChipWidth::Wide => (k / 8) * OUTPUT_GROUP_GAP + (k / 16) * g.cell_offset,
        ChipWidth::Narrow => (k / 8) * (OUTPUT_GROUP_GAP + g.cell_offset),
    };

    Cell {
        x: g.origin_x + k * g.cell_width + gaps,
        y: g.origin_y + row * (g.cell_height + OUTPUT_ROW_GAP),
        width: g.cell_width,
        height: g.cell_height,
        quadrant: None,
    }
}

fn smoke_cell(g: &LayoutGeometry, index: u8) -> Cell {
    let position = smoke_position(index - 1) as u16;
    let column = position / SMOKE_CELLS_PER_COLUMN;
    let row = position % SMOKE_CELLS_PER_COLUMN;

    Cell {
        x: g.origin_x + column * g.cell_width + (column / 4) * g.cell_offset,
        y: g.origin_y + row * g.cell_height,
        width: g.cell_width,
        height: g.cell_height,
        quadrant: None,
    }
}
