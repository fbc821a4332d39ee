//! Symbolic port layout identifiers
//!
//! A layout selects which expanders feed the display, in which role
//! (input, output, mixed, smoke-detector enclosure) and at what capacity.
//! Hosts usually carry layouts as numeric codes in their configuration, so
//! every layout has a stable `u16` code.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacity tier in pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Tier {
    T32,
    T64,
    T96,
    T128,
}

impl Tier {
    /// Number of pins in this tier
    pub const fn pins(self) -> u8 {
        match self {
            Tier::T32 => 32,
            Tier::T64 => 64,
            Tier::T96 => 96,
            Tier::T128 => 128,
        }
    }

    /// Number of 4-pin ports in this tier
    pub const fn ports(self) -> u8 {
        self.pins() / 4
    }

    fn from_pins(pins: u16) -> Option<Self> {
        match pins {
            32 => Some(Tier::T32),
            64 => Some(Tier::T64),
            96 => Some(Tier::T96),
            128 => Some(Tier::T128),
            _ => None,
        }
    }
}

/// Capacity selection: fixed tier or detected from expander presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Capacity {
    Auto,
    Fixed(Tier),
}

/// Pins wired per expander chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChipWidth {
    /// 16-pin expanders (MCP23017 class)
    #[default]
    Wide,
    /// 8-pin expanders (MCP23008 class)
    Narrow,
}

impl ChipWidth {
    /// Pins per expander
    pub const fn pins(self) -> u8 {
        match self {
            ChipWidth::Wide => 16,
            ChipWidth::Narrow => 8,
        }
    }
}

/// Input/output split of a hybrid layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HybridSplit {
    /// 2 input expanders, 6 output expanders
    In32Out96,
    /// 4 input expanders, 4 output expanders
    In64Out64,
    /// 6 input expanders, 2 output expanders
    In96Out32,
}

impl HybridSplit {
    /// Tier of the input region
    pub const fn inputs(self) -> Tier {
        match self {
            HybridSplit::In32Out96 => Tier::T32,
            HybridSplit::In64Out64 => Tier::T64,
            HybridSplit::In96Out32 => Tier::T96,
        }
    }

    /// Tier of the output region
    pub const fn outputs(self) -> Tier {
        match self {
            HybridSplit::In32Out96 => Tier::T96,
            HybridSplit::In64Out64 => Tier::T64,
            HybridSplit::In96Out32 => Tier::T32,
        }
    }
}

/// Port layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PortLayout {
    /// Input expanders, 4 pins per port cell
    Input(Capacity),
    /// Output expanders, one cell per pin
    Output(Capacity, ChipWidth),
    /// Input expanders first, output expanders after
    Hybrid(HybridSplit),
    /// Smoke-detector enclosure: 16 inputs and 32 outputs interleaved
    Smoke,
}

/// Layout errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Code not in the enumerated layout set
    UnknownLayout(u16),
}

const INPUT_BASE: u16 = 1000;
const OUTPUT_BASE: u16 = 2000;
const OUTPUT_NARROW_BASE: u16 = 2500;
const HYBRID_BASE: u16 = 3000;
const SMOKE_CODE: u16 = 4048;

impl PortLayout {
    pub const INPUT_AUTO: Self = PortLayout::Input(Capacity::Auto);
    pub const INPUT_32: Self = PortLayout::Input(Capacity::Fixed(Tier::T32));
    pub const INPUT_64: Self = PortLayout::Input(Capacity::Fixed(Tier::T64));
    pub const INPUT_96: Self = PortLayout::Input(Capacity::Fixed(Tier::T96));
    pub const INPUT_128: Self = PortLayout::Input(Capacity::Fixed(Tier::T128));
    pub const OUTPUT_AUTO: Self = PortLayout::Output(Capacity::Auto, ChipWidth::Wide);
    pub const OUTPUT_32: Self = PortLayout::Output(Capacity::Fixed(Tier::T32), ChipWidth::Wide);
    pub const OUTPUT_64: Self = PortLayout::Output(Capacity::Fixed(Tier::T64), ChipWidth::Wide);
    pub const OUTPUT_96: Self = PortLayout::Output(Capacity::Fixed(Tier::T96), ChipWidth::Wide);
    pub const OUTPUT_128: Self = PortLayout::Output(Capacity::Fixed(Tier::T128), ChipWidth::Wide);
    pub const OUTPUT_AUTO_8: Self = PortLayout::Output(Capacity::Auto, ChipWidth::Narrow);
    pub const OUTPUT_32_8: Self =
        PortLayout::Output(Capacity::Fixed(Tier::T32), ChipWidth::Narrow);
    pub const OUTPUT_64_8: Self =
        PortLayout::Output(Capacity::Fixed(Tier::T64), ChipWidth::Narrow);
    pub const IO_32_96: Self = PortLayout::Hybrid(HybridSplit::In32Out96);
    pub const IO_64_64: Self = PortLayout::Hybrid(HybridSplit::In64Out64);
    pub const IO_96_32: Self = PortLayout::Hybrid(HybridSplit::In96Out32);
    pub const IO_48: Self = PortLayout::Smoke;

    /// Every valid layout, for host-side validation and menus
    ///
    /// Narrow output layouts stop at 64 pins, the most 8 narrow chips carry.
    pub const ALL: [PortLayout; 17] = [
        Self::INPUT_AUTO,
        Self::INPUT_32,
        Self::INPUT_64,
        Self::INPUT_96,
        Self::INPUT_128,
        Self::OUTPUT_AUTO,
        Self::OUTPUT_32,
        Self::OUTPUT_64,
        Self::OUTPUT_96,
        Self::OUTPUT_128,
        Self::OUTPUT_AUTO_8,
        Self::OUTPUT_32_8,
        Self::OUTPUT_64_8,
        Self::IO_32_96,
        Self::IO_64_64,
        Self::IO_96_32,
        Self::IO_48,
    ];

    /// Numeric code of this layout
    pub const fn code(self) -> u16 {
        const fn capacity_code(capacity: Capacity) -> u16 {
            match capacity {
                Capacity::Auto => 0,
                Capacity::Fixed(tier) => tier.pins() as u16,
            }
        }

        match self {
            PortLayout::Input(capacity) => INPUT_BASE + capacity_code(capacity),
            PortLayout::Output(capacity, ChipWidth::Wide) => {
                OUTPUT_BASE + capacity_code(capacity)
            }
            PortLayout::Output(capacity, ChipWidth::Narrow) => {
                OUTPUT_NARROW_BASE + capacity_code(capacity)
            }
            PortLayout::Hybrid(split) => HYBRID_BASE + split.inputs().pins() as u16,
            PortLayout::Smoke => SMOKE_CODE,
        }
    }

    /// Look up a layout by numeric code
    pub fn from_code(code: u16) -> Option<Self> {
        fn capacity(offset: u16) -> Option<Capacity> {
            if offset == 0 {
                Some(Capacity::Auto)
            } else {
                Tier::from_pins(offset).map(Capacity::Fixed)
            }
        }

        // Offsets never exceed 128, so each group owns a disjoint code range
        match code {
            SMOKE_CODE => Some(PortLayout::Smoke),
            HYBRID_BASE..=3128 => match code - HYBRID_BASE {
                32 => Some(Self::IO_32_96),
                64 => Some(Self::IO_64_64),
                96 => Some(Self::IO_96_32),
                _ => None,
            },
            // 8 narrow chips top out at 64 pins
            OUTPUT_NARROW_BASE..=2564 => capacity(code - OUTPUT_NARROW_BASE)
                .map(|cap| PortLayout::Output(cap, ChipWidth::Narrow)),
            OUTPUT_BASE..=2128 => {
                capacity(code - OUTPUT_BASE).map(|cap| PortLayout::Output(cap, ChipWidth::Wide))
            }
            INPUT_BASE..=1128 => capacity(code - INPUT_BASE).map(PortLayout::Input),
            _ => None,
        }
    }

    /// Check if the capacity is detected from expander presence
    pub const fn is_auto(self) -> bool {
        matches!(
            self,
            PortLayout::Input(Capacity::Auto) | PortLayout::Output(Capacity::Auto, _)
        )
    }
}

impl TryFrom<u16> for PortLayout {
    type Error = LayoutError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(LayoutError::UnknownLayout(code))
    }
}

impl From<PortLayout> for u16 {
    fn from(layout: PortLayout) -> u16 {
        layout.code()
    }
}
