//! Port layouts
//!
//! Resolves a symbolic layout into screen geometry and maps logical pin
//! indices onto screen cells.

pub mod geometry;
pub mod id;
pub mod mapper;
pub mod resolver;

pub use geometry::LayoutGeometry;
pub use id::{Capacity, ChipWidth, HybridSplit, LayoutError, PortLayout, Tier};
pub use mapper::{cell_for, smoke_position, Cell, Quadrant};
pub use resolver::{auto_tier, resolve, resolve_code, LayoutFamily, Region, ResolvedLayout};
