//! Font metrics seam.
//!
//! Glyph rasterization is the device's problem; the compositor only needs
//! string extents to drive scroll wrap math, and a handle it can pass back
//! through [`Device::set_font`](crate::device::Device::set_font).

use std::sync::Arc;

/// A loaded font as seen by the compositor: identity plus metrics.
pub trait FontInstance: Send + Sync {
    fn name(&self) -> &str;
    fn path(&self) -> &str;
    /// Rendered width of `text` in pixels.
    fn string_width(&self, text: &str) -> u32;
    /// Line height in pixels; the vertical extent of single-line text.
    fn line_height(&self) -> u32;
}

/// External font loader, keyed by `(name, path)`.
///
/// `load` runs on a background thread owned by the painter's font cache, so
/// implementations are free to do blocking I/O.
pub trait FontService: Send + Sync {
    fn load(&self, name: &str, path: &str) -> anyhow::Result<Arc<dyn FontInstance>>;
}
