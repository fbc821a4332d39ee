//! embedded-graphics adapter
//!
//! Implements `DrawSurface` for any RGB565 `DrawTarget`, so SPI panel
//! drivers built on embedded-graphics (ST7789, ILI9341, simulator) can be
//! used directly.

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyleBuilder},
    pixelcolor::{raw::RawU16, Rgb565},
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle, RoundedRectangle},
    text::{Baseline, Text},
};

use crate::surface::{Bitmap, Color, DisplayError, DrawSurface, Rect};

/// Backlight control hook for `EgSurface`
///
/// Backlight is usually a PWM channel owned by the board, not the panel
/// driver, so it is injected separately.
pub trait Backlight {
    /// Set brightness in percent
    fn set_percent(&mut self, percent: u8);
}

/// No-op backlight for panels without dimming
impl Backlight for () {
    fn set_percent(&mut self, _percent: u8) {}
}

/// `DrawSurface` over an embedded-graphics draw target
pub struct EgSurface<T, B = ()> {
    target: T,
    backlight: B,
}

impl<T> EgSurface<T, ()>
where
    T: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    /// Wrap a draw target without backlight control
    pub fn new(target: T) -> Self {
        Self {
            target,
            backlight: (),
        }
    }
}

impl<T, B> EgSurface<T, B>
where
    T: DrawTarget<Color = Rgb565> + OriginDimensions,
    B: Backlight,
{
    /// Wrap a draw target with a backlight controller
    pub fn with_backlight(target: T, backlight: B) -> Self {
        Self { target, backlight }
    }

    /// Get access to the underlying draw target
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Release the draw target and backlight
    pub fn release(self) -> (T, B) {
        (self.target, self.backlight)
    }
}

fn to_rgb565(color: Color) -> Rgb565 {
    Rgb565::from(RawU16::new(color.to_rgb565()))
}

fn to_rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(
        Point::new(rect.x as i32, rect.y as i32),
        Size::new(rect.width as u32, rect.height as u32),
    )
}

impl<T, B> DrawSurface for EgSurface<T, B>
where
    T: DrawTarget<Color = Rgb565> + OriginDimensions,
    B: Backlight,
{
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&to_rectangle(rect), to_rgb565(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        to_rectangle(rect)
            .into_styled(PrimitiveStyle::with_stroke(to_rgb565(color), 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_round_rect(
        &mut self,
        rect: Rect,
        radius: u16,
        color: Color,
    ) -> Result<(), DisplayError> {
        let corner = Size::new(radius as u32, radius as u32);
        RoundedRectangle::with_equal_corners(to_rectangle(rect), corner)
            .into_styled(PrimitiveStyle::with_fill(to_rgb565(color)))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Color,
        bg: Color,
    ) -> Result<(), DisplayError> {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(to_rgb565(fg))
            .background_color(to_rgb565(bg))
            .build();
        Text::with_baseline(text, Point::new(x as i32, y as i32), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_bitmap(
        &mut self,
        x: u16,
        y: u16,
        bitmap: &Bitmap<'_>,
        fg: Color,
        bg: Color,
    ) -> Result<(), DisplayError> {
        let (fg, bg) = (to_rgb565(fg), to_rgb565(bg));
        let width = bitmap.width();
        let origin = Point::new(x as i32, y as i32);
        let pixels = (0..bitmap.height()).flat_map(move |row| {
            (0..width).map(move |col| {
                let color = if bitmap.pixel(col, row) { fg } else { bg };
                Pixel(origin + Point::new(col as i32, row as i32), color)
            })
        });
        self.target
            .draw_iter(pixels)
            .map_err(|_| DisplayError::Communication)
    }

    fn set_backlight(&mut self, percent: u8) -> Result<(), DisplayError> {
        self.backlight.set_percent(percent.min(100));
        Ok(())
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        let size = self.target.size();
        (size.width as u16, size.height as u16)
    }
}
