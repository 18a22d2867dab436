//! The device adapter seam: the external addressable pixel grid the
//! compositor targets.

use std::sync::Arc;

use crate::{core::Rgb, fonts::FontInstance};

mod buffer;

pub use buffer::{BufferDevice, TextDraw};

/// Draw surface of a concrete display.
///
/// Primitives are deliberately close to LED-matrix driver surfaces:
/// stateful foreground color and font, coordinate pairs for `fill_rect`
/// (inclusive corners), flattened `x,y` lists for polygons. Draw calls are
/// infallible; anything that can fail (resource loads) fails before
/// dispatch. A frame is composed by any number of draw calls followed by
/// exactly one `sync`.
pub trait Device {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reset the whole surface to black.
    fn clear(&mut self);
    fn set_foreground_color(&mut self, color: Rgb);

    /// Fill between two inclusive corners with the foreground color.
    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64);
    fn draw_rect(&mut self, x: i64, y: i64, width: u32, height: u32);
    fn draw_filled_rect(&mut self, x: i64, y: i64, width: u32, height: u32);
    fn draw_circle(&mut self, x: i64, y: i64, radius: u32);
    fn draw_filled_circle(&mut self, x: i64, y: i64, radius: u32);
    /// `coords` is a flattened list of `x,y` vertex pairs.
    fn draw_polygon(&mut self, coords: &[i64]);
    fn draw_filled_polygon(&mut self, coords: &[i64]);
    fn set_pixel(&mut self, x: i64, y: i64);

    fn set_font(&mut self, font: &Arc<dyn FontInstance>);
    fn draw_text(&mut self, text: &str, x: i64, y: i64);

    /// Push the composed frame to the display.
    fn sync(&mut self);
}
