//! Draw-surface abstraction for the rackview status display
//!
//! This crate provides:
//! - `DrawSurface` trait: the small set of primitives the status core needs
//!   (rectangle fill/outline, text, 1bpp bitmap blit, backlight)
//! - `Color` palette and `Rect` geometry shared by all renderers
//! - `TextLine` fixed-capacity text buffer for status lines
//! - `EgSurface` adapter onto any embedded-graphics `DrawTarget`
//!   (feature `embedded-graphics`)
//!
//! # Architecture
//!
//! The status core never touches pixels. It resolves *where* and *what* to
//! draw and hands absolute pixel coordinates plus a palette color to a
//! `DrawSurface`. Panel drivers (ST7789 over SPI, a simulator window, a test
//! recorder) implement the trait.

#![no_std]
#![deny(unsafe_code)]

pub mod surface;
pub mod text;

#[cfg(feature = "embedded-graphics")]
pub mod eg;

#[cfg(any(test, feature = "testing"))]
pub mod recording;

// Re-export key types
pub use surface::{Bitmap, Color, DisplayError, DrawSurface, Rect};
pub use text::TextLine;

#[cfg(feature = "embedded-graphics")]
pub use eg::EgSurface;

#[cfg(any(test, feature = "testing"))]
pub use recording::{DrawOp, RecordingSurface};

/// Panel width in pixels (240x240 ST7789)
pub const SCREEN_WIDTH: u16 = 240;

/// Panel height in pixels
pub const SCREEN_HEIGHT: u16 = 240;
