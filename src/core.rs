//! Integer geometry and color primitives for the device pixel grid.
//!
//! Coordinates are signed: effect offsets routinely push geometry past any
//! edge of a section before it wraps back in.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle on the device grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// One past the rightmost column.
    pub fn right(self) -> i64 {
        self.x + i64::from(self.width)
    }

    /// One past the bottom row.
    pub fn bottom(self) -> i64 {
        self.y + i64::from(self.height)
    }

    pub fn contains(self, x: i64, y: i64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn covers_row(self, y: i64) -> bool {
        y >= self.y && y < self.bottom()
    }

    /// Smallest rectangle containing every point, `None` for an empty set.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(
            min_x,
            min_y,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
        ))
    }
}

/// Straight (non-premultiplied) 8-bit RGB, the device color model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value; the top byte is ignored.
    pub fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_bounds_are_exclusive_on_right_and_bottom() {
        let r = Rect::new(2, 3, 4, 5);
        assert_eq!(r.right(), 6);
        assert_eq!(r.bottom(), 8);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 7));
        assert!(!r.contains(6, 3));
        assert!(!r.contains(2, 8));
    }

    #[test]
    fn rect_covers_row() {
        let r = Rect::new(0, 10, 5, 2);
        assert!(!r.covers_row(9));
        assert!(r.covers_row(10));
        assert!(r.covers_row(11));
        assert!(!r.covers_row(12));
    }

    #[test]
    fn bounding_of_points_spans_extremes() {
        let pts = [Point::new(3, -1), Point::new(-2, 4), Point::new(0, 0)];
        let b = Rect::bounding(&pts).unwrap();
        assert_eq!(b, Rect::new(-2, -1, 6, 6));
        assert!(Rect::bounding(&[]).is_none());
    }

    #[test]
    fn rgb_packs_and_unpacks() {
        let c = Rgb::from_u32(0x800000);
        assert_eq!(c, Rgb::new(0x80, 0, 0));
        assert_eq!(c.to_u32(), 0x800000);
        assert_eq!(Rgb::from_u32(0xFF123456), Rgb::new(0x12, 0x34, 0x56));
    }
}
