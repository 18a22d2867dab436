//! Headless framebuffer backend.
//!
//! Renders every geometric primitive into a row-major `Rgb` buffer so
//! frames can be composed and inspected without hardware. Text is recorded
//! rather than rasterized: glyph rendering belongs to real drivers, and
//! the recorded draws are what tests and higher layers assert on.

use std::sync::Arc;

use crate::{core::Rgb, device::Device, fonts::FontInstance};

/// One recorded `draw_text` call with the device state it was issued under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDraw {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub color: Rgb,
    pub font: Option<String>,
}

/// In-memory [`Device`] with a `width * height` RGB framebuffer.
pub struct BufferDevice {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
    color: Rgb,
    font: Option<String>,
    text_draws: Vec<TextDraw>,
    sync_count: u64,
}

impl BufferDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; (width as usize) * (height as usize)],
            color: Rgb::BLACK,
            font: None,
            text_draws: Vec::new(),
            sync_count: 0,
        }
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Text draws recorded since construction, in issue order.
    pub fn text_draws(&self) -> &[TextDraw] {
        &self.text_draws
    }

    pub fn sync_count(&self) -> u64 {
        self.sync_count
    }

    /// Count of pixels currently holding `color`.
    pub fn count_pixels(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    fn put(&mut self, x: i64, y: i64) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = self.color;
        }
    }

    fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64) {
        // Bresenham over signed coordinates; endpoints inclusive.
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.put(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Scanline x-intersections of the polygon edges with row `y`,
    /// paired for even-odd filling.
    fn fill_scanline(&mut self, coords: &[(i64, i64)], y: i64) {
        let n = coords.len();
        let mut xs: Vec<f64> = Vec::new();
        for i in 0..n {
            let (x0, y0) = coords[i];
            let (x1, y1) = coords[(i + 1) % n];
            if y0 == y1 {
                continue;
            }
            let (lo, hi) = if y0 < y1 { (y0, y1) } else { (y1, y0) };
            if y < lo || y >= hi {
                continue;
            }
            let t = (y - y0) as f64 / (y1 - y0) as f64;
            xs.push(x0 as f64 + t * (x1 - x0) as f64);
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        for pair in xs.chunks_exact(2) {
            let start = pair[0].ceil() as i64;
            let end = pair[1].floor() as i64;
            for x in start..=end {
                self.put(x, y);
            }
        }
    }

    fn vertices(coords: &[i64]) -> Vec<(i64, i64)> {
        coords.chunks_exact(2).map(|c| (c[0], c[1])).collect()
    }
}

impl Device for BufferDevice {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }

    fn set_foreground_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y);
            }
        }
    }

    fn draw_rect(&mut self, x: i64, y: i64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let (x1, y1) = (x + i64::from(width) - 1, y + i64::from(height) - 1);
        self.line(x, y, x1, y);
        self.line(x, y1, x1, y1);
        self.line(x, y, x, y1);
        self.line(x1, y, x1, y1);
    }

    fn draw_filled_rect(&mut self, x: i64, y: i64, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.fill_rect(x, y, x + i64::from(width) - 1, y + i64::from(height) - 1);
    }

    fn draw_circle(&mut self, cx: i64, cy: i64, radius: u32) {
        // Midpoint circle, eight-way symmetry.
        let r = i64::from(radius);
        let (mut x, mut y) = (r, 0i64);
        let mut err = 1 - r;
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.put(px, py);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    fn draw_filled_circle(&mut self, cx: i64, cy: i64, radius: u32) {
        // Same midpoint walk as the outline, filling horizontal spans, so
        // a filled circle always covers its own outline.
        let r = i64::from(radius);
        let (mut x, mut y) = (r, 0i64);
        let mut err = 1 - r;
        while x >= y {
            for (x0, x1, row) in [
                (cx - x, cx + x, cy + y),
                (cx - x, cx + x, cy - y),
                (cx - y, cx + y, cy + x),
                (cx - y, cx + y, cy - x),
            ] {
                for px in x0..=x1 {
                    self.put(px, row);
                }
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    fn draw_polygon(&mut self, coords: &[i64]) {
        let vs = Self::vertices(coords);
        match vs.len() {
            0 => {}
            1 => self.put(vs[0].0, vs[0].1),
            2 => self.line(vs[0].0, vs[0].1, vs[1].0, vs[1].1),
            n => {
                for i in 0..n {
                    let (x0, y0) = vs[i];
                    let (x1, y1) = vs[(i + 1) % n];
                    self.line(x0, y0, x1, y1);
                }
            }
        }
    }

    fn draw_filled_polygon(&mut self, coords: &[i64]) {
        let vs = Self::vertices(coords);
        if vs.len() < 3 {
            self.draw_polygon(coords);
            return;
        }
        let min_y = vs.iter().map(|v| v.1).min().unwrap_or(0);
        let max_y = vs.iter().map(|v| v.1).max().unwrap_or(0);
        for y in min_y..=max_y {
            self.fill_scanline(&vs, y);
        }
        // Scanline interiors miss single-pixel edge extremes; trace the
        // outline so the boundary is always present.
        self.draw_polygon(coords);
    }

    fn set_pixel(&mut self, x: i64, y: i64) {
        self.put(x, y);
    }

    fn set_font(&mut self, font: &Arc<dyn FontInstance>) {
        self.font = Some(font.name().to_string());
    }

    fn draw_text(&mut self, text: &str, x: i64, y: i64) {
        self.text_draws.push(TextDraw {
            text: text.to_string(),
            x,
            y,
            color: self.color,
            font: self.font.clone(),
        });
    }

    fn sync(&mut self) {
        self.sync_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    fn device() -> BufferDevice {
        let mut d = BufferDevice::new(16, 16);
        d.set_foreground_color(RED);
        d
    }

    #[test]
    fn fill_rect_is_inclusive_and_clamped() {
        let mut d = device();
        d.fill_rect(-2, -2, 3, 3);
        assert_eq!(d.pixel(0, 0), Some(RED));
        assert_eq!(d.pixel(3, 3), Some(RED));
        assert_eq!(d.pixel(4, 3), Some(Rgb::BLACK));
        assert_eq!(d.count_pixels(RED), 16);
    }

    #[test]
    fn draw_rect_paints_outline_only() {
        let mut d = device();
        d.draw_rect(1, 1, 4, 3);
        assert_eq!(d.pixel(1, 1), Some(RED));
        assert_eq!(d.pixel(4, 3), Some(RED));
        assert_eq!(d.pixel(2, 2), Some(Rgb::BLACK));
        assert_eq!(d.count_pixels(RED), 2 * 4 + 2 * 1);
    }

    #[test]
    fn lines_are_endpoint_inclusive_in_all_octants() {
        for (x1, y1) in [(5i64, 2i64), (2, 5), (-3, 4), (4, -3), (5, 5), (-5, -5)] {
            let mut d = device();
            d.draw_polygon(&[8, 8, 8 + x1, 8 + y1]);
            assert_eq!(d.pixel(8, 8), Some(RED), "start missing for ({x1},{y1})");
            assert_eq!(
                d.pixel(8 + x1, 8 + y1),
                Some(RED),
                "end missing for ({x1},{y1})"
            );
        }
    }

    #[test]
    fn filled_circle_contains_outline() {
        let mut outline = device();
        outline.draw_circle(8, 8, 4);
        let mut filled = device();
        filled.draw_filled_circle(8, 8, 4);
        for y in 0..16 {
            for x in 0..16 {
                if outline.pixel(x, y) == Some(RED) {
                    assert_eq!(filled.pixel(x, y), Some(RED), "hole at ({x},{y})");
                }
            }
        }
        assert_eq!(filled.pixel(8, 8), Some(RED));
        assert_eq!(filled.pixel(8, 3), Some(Rgb::BLACK));
    }

    #[test]
    fn filled_polygon_covers_interior_and_boundary() {
        let mut d = device();
        d.draw_filled_polygon(&[2, 2, 10, 2, 10, 10, 2, 10]);
        for y in 2..=10 {
            for x in 2..=10 {
                assert_eq!(d.pixel(x, y), Some(RED), "hole at ({x},{y})");
            }
        }
        assert_eq!(d.pixel(1, 2), Some(Rgb::BLACK));
        assert_eq!(d.pixel(11, 10), Some(Rgb::BLACK));
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut d = device();
        d.set_pixel(-1, 0);
        d.set_pixel(0, 16);
        d.set_pixel(99, 99);
        assert_eq!(d.count_pixels(RED), 0);
    }

    #[test]
    fn clear_resets_to_black_and_text_is_recorded() {
        let mut d = device();
        d.fill_rect(0, 0, 15, 15);
        d.clear();
        assert_eq!(d.count_pixels(RED), 0);

        d.draw_text("12:34", 3, 4);
        d.sync();
        assert_eq!(
            d.text_draws(),
            &[TextDraw {
                text: "12:34".into(),
                x: 3,
                y: 4,
                color: RED,
                font: None,
            }]
        );
        assert_eq!(d.sync_count(), 1);
    }
}
