//! Draw surface trait
//!
//! Defines the drawing primitives a panel driver must provide.

/// Draw surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel
    Communication,
    /// Coordinates or dimensions outside the panel
    InvalidCoordinates,
    /// Panel not initialized
    NotInitialized,
    /// Bitmap data shorter than its declared dimensions
    InvalidBitmap,
}

/// Named display colors
///
/// The core only ever speaks in these names; drivers map them to their
/// native pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
    DarkGrey,
    LightGrey,
    Yellow,
    Red,
    Green,
    Orange,
    Blue,
    /// Brand accent used for the header logo
    Teal,
}

impl Color {
    /// 8-bit RGB components
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0, 0, 0),
            Color::White => (255, 255, 255),
            Color::DarkGrey => (123, 125, 123),
            Color::LightGrey => (198, 195, 198),
            Color::Yellow => (255, 255, 0),
            Color::Red => (255, 0, 0),
            Color::Green => (0, 255, 0),
            Color::Orange => (255, 165, 0),
            Color::Blue => (0, 0, 255),
            Color::Teal => (0, 165, 179),
        }
    }

    /// Packed RGB565 value, as written to ST77xx panels
    pub const fn to_rgb565(self) -> u16 {
        let (r, g, b) = self.rgb();
        ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
    }
}

/// Axis-aligned rectangle in absolute pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// First column to the right of the rectangle
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// First row below the rectangle
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point lies inside the rectangle
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if the rectangle has no area
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// 1 bit-per-pixel bitmap, rows padded to whole bytes, MSB first
///
/// This is the layout produced by the usual image-to-C-array converters, so
/// logo assets can be blitted without conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    width: u16,
    height: u16,
    data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// Wrap raw bitmap data
    ///
    /// Returns `None` if `data` is too short for the given dimensions.
    pub fn new(width: u16, height: u16, data: &'a [u8]) -> Option<Self> {
        let needed = Self::stride_for(width) * height as usize;
        if data.len() < needed {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    const fn stride_for(width: u16) -> usize {
        (width as usize + 7) / 8
    }

    /// Width in pixels
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Check whether the pixel at (x, y) is set
    ///
    /// Pixels outside the bitmap read as unset.
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = y as usize * Self::stride_for(self.width) + x as usize / 8;
        self.data
            .get(byte)
            .map(|b| b & (0x80 >> (x % 8)) != 0)
            .unwrap_or(false)
    }
}

/// Draw surface trait
///
/// Provides a hardware-agnostic interface for the rendering primitives the
/// status core uses. All coordinates are absolute pixels.
pub trait DrawSurface {
    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Draw a one-pixel rectangle outline
    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Fill a rectangle with rounded corners
    ///
    /// Drivers without rounded primitives may fall back to a plain fill.
    fn fill_round_rect(
        &mut self,
        rect: Rect,
        radius: u16,
        color: Color,
    ) -> Result<(), DisplayError> {
        let _ = radius;
        self.fill_rect(rect, color)
    }

    /// Draw text with its top-left corner at (x, y)
    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Color,
        bg: Color,
    ) -> Result<(), DisplayError>;

    /// Blit a 1bpp bitmap, set pixels in `fg`, clear pixels in `bg`
    fn draw_bitmap(
        &mut self,
        x: u16,
        y: u16,
        bitmap: &Bitmap<'_>,
        fg: Color,
        bg: Color,
    ) -> Result<(), DisplayError>;

    /// Set backlight brightness in percent (0 = off, 100 = full)
    fn set_backlight(&mut self, percent: u8) -> Result<(), DisplayError>;

    /// Get pixel dimensions (width, height)
    fn pixel_dimensions(&self) -> (u16, u16);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_packing() {
        assert_eq!(Color::Black.to_rgb565(), 0x0000);
        assert_eq!(Color::White.to_rgb565(), 0xFFFF);
        assert_eq!(Color::Red.to_rgb565(), 0xF800);
        assert_eq!(Color::Green.to_rgb565(), 0x07E0);
        assert_eq!(Color::Blue.to_rgb565(), 0x001F);
    }

    #[test]
    fn test_rect_bounds() {
        let rect = Rect::new(10, 20, 5, 4);
        assert_eq!(rect.right(), 15);
        assert_eq!(rect.bottom(), 24);
        assert!(rect.contains(10, 20));
        assert!(rect.contains(14, 23));
        assert!(!rect.contains(15, 23));
        assert!(!rect.contains(14, 24));
        assert!(Rect::new(0, 0, 0, 3).is_empty());
    }

    #[test]
    fn test_bitmap_pixels() {
        // 10 pixels wide => 2 bytes per row
        let data = [0b1000_0000, 0b0100_0000, 0b0000_0001, 0b0000_0000];
        let bitmap = Bitmap::new(10, 2, &data).unwrap();
        assert!(bitmap.pixel(0, 0));
        assert!(bitmap.pixel(9, 0));
        assert!(!bitmap.pixel(1, 0));
        assert!(bitmap.pixel(7, 1));
        assert!(!bitmap.pixel(8, 1));
        assert!(!bitmap.pixel(10, 0));
    }

    #[test]
    fn test_bitmap_rejects_short_data() {
        let data = [0u8; 3];
        assert!(Bitmap::new(10, 2, &data).is_none());
    }
}
