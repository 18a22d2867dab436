//! The declarative instruction/effect value model.
//!
//! A [`PaintingInstruction`] describes one drawable primitive; a section's
//! representation is an ordered list of them, replaced wholesale by whoever
//! controls content. Draw modes are a closed sum type ([`Shape`]) so the
//! frame loop dispatches exhaustively instead of probing optional fields.

use crate::core::{Point, Rect, Rgb};

/// One drawable primitive plus its color and time-based effects.
///
/// `id` is the stable identity used for effect continuity across frames:
/// the first snapshot seen for an id is cached for the painter's lifetime,
/// and scroll wrap decisions are made against that snapshot's anchor. Ids
/// must be unique within one painter or continuity is undefined.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PaintingInstruction {
    pub id: String,
    pub color: Rgb,
    /// Inert metadata. Paint order is representation order; `layer` is
    /// carried for external tooling and never consulted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    pub shape: Shape,
}

impl PaintingInstruction {
    pub fn new(id: impl Into<String>, color: Rgb, shape: Shape) -> Self {
        Self {
            id: id.into(),
            color,
            layer: None,
            effects: Vec::new(),
            shape,
        }
    }

    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }
}

/// Closed set of draw modes.
///
/// `Ellipse`, `Pixel { fill: true }` and `Buffer` are part of the declared
/// set but are not painted: the frame loop logs them and moves on.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Shape {
    Rectangle {
        origin: Point,
        width: u32,
        height: u32,
        #[serde(default)]
        fill: bool,
    },
    Circle {
        center: Point,
        radius: u32,
        #[serde(default)]
        fill: bool,
    },
    Ellipse {
        center: Point,
        width: u32,
        height: u32,
    },
    Polygon {
        vertices: Vec<Point>,
        #[serde(default)]
        fill: bool,
    },
    Pixel {
        points: Vec<Point>,
        #[serde(default)]
        fill: bool,
    },
    Line {
        from: Point,
        to: Point,
    },
    Text {
        origin: Point,
        text: String,
        font: FontSpec,
    },
    Image {
        origin: Point,
        path: String,
    },
    Buffer {
        origin: Point,
    },
}

impl Shape {
    /// Axis-aligned bounding box in section-local coordinates.
    ///
    /// `None` when the geometry is empty (no vertices) or when the extent
    /// comes from an external service (text metrics, image dimensions).
    pub fn local_bounds(&self) -> Option<Rect> {
        match self {
            Shape::Rectangle {
                origin,
                width,
                height,
                ..
            } => Some(Rect::new(origin.x, origin.y, *width, *height)),
            Shape::Ellipse {
                center,
                width,
                height,
            } => Some(Rect::new(
                center.x - i64::from(*width) / 2,
                center.y - i64::from(*height) / 2,
                *width,
                *height,
            )),
            Shape::Circle { center, radius, .. } => {
                let d = radius.saturating_mul(2).max(1);
                Some(Rect::new(
                    center.x - i64::from(*radius),
                    center.y - i64::from(*radius),
                    d,
                    d,
                ))
            }
            Shape::Polygon { vertices, .. } => Rect::bounding(vertices),
            Shape::Pixel { points, .. } => Rect::bounding(points),
            Shape::Line { from, to } => Rect::bounding(&[*from, *to]),
            Shape::Text { .. } | Shape::Image { .. } | Shape::Buffer { .. } => None,
        }
    }

    /// Section-local position the scroll wrap guard anchors on: the
    /// bounding-box origin where one is computable, the declared origin
    /// otherwise.
    pub fn anchor(&self) -> Point {
        match self {
            Shape::Text { origin, .. }
            | Shape::Image { origin, .. }
            | Shape::Buffer { origin } => *origin,
            other => other
                .local_bounds()
                .map(Rect::origin)
                .unwrap_or_default(),
        }
    }

    /// Display name used in logs and `Unsupported` errors.
    pub fn mode_name(&self) -> &'static str {
        match self {
            Shape::Rectangle { .. } => "RECTANGLE",
            Shape::Circle { .. } => "CIRCLE",
            Shape::Ellipse { .. } => "ELLIPSE",
            Shape::Polygon { .. } => "POLYGON",
            Shape::Pixel { .. } => "PIXEL",
            Shape::Line { .. } => "LINE",
            Shape::Text { .. } => "TEXT",
            Shape::Image { .. } => "IMAGE",
            Shape::Buffer { .. } => "BUFFER",
        }
    }
}

/// Identity of a font as understood by the external metrics service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    pub name: String,
    pub path: String,
}

impl FontSpec {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A time-parameterized geometric offset or visibility toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub options: EffectOptions,
}

impl Effect {
    pub fn new(kind: EffectKind, rate_ms: u64) -> Self {
        Self {
            kind,
            options: EffectOptions { rate_ms },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EffectKind {
    ScrollLeft,
    ScrollRight,
    ScrollUp,
    ScrollDown,
    Blink,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EffectOptions {
    /// Milliseconds per pixel of travel (scroll) or per visibility toggle
    /// (blink). A rate of zero disables the effect.
    pub rate_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_bounds_match_declaration() {
        let s = Shape::Rectangle {
            origin: Point::new(3, 4),
            width: 10,
            height: 2,
            fill: true,
        };
        assert_eq!(s.local_bounds(), Some(Rect::new(3, 4, 10, 2)));
        assert_eq!(s.anchor(), Point::new(3, 4));
    }

    #[test]
    fn circle_bounds_center_the_radius() {
        let s = Shape::Circle {
            center: Point::new(5, 5),
            radius: 3,
            fill: false,
        };
        assert_eq!(s.local_bounds(), Some(Rect::new(2, 2, 6, 6)));
    }

    #[test]
    fn ellipse_bounds_center_the_extent() {
        let s = Shape::Ellipse {
            center: Point::new(5, 5),
            width: 6,
            height: 4,
        };
        assert_eq!(s.local_bounds(), Some(Rect::new(2, 3, 6, 4)));
        assert_eq!(s.anchor(), Point::new(2, 3));
    }

    #[test]
    fn polygon_bounds_span_vertices_and_empty_is_none() {
        let s = Shape::Polygon {
            vertices: vec![Point::new(0, 0), Point::new(4, -2), Point::new(2, 3)],
            fill: false,
        };
        assert_eq!(s.local_bounds(), Some(Rect::new(0, -2, 5, 6)));

        let empty = Shape::Polygon {
            vertices: vec![],
            fill: false,
        };
        assert_eq!(empty.local_bounds(), None);
        assert_eq!(empty.anchor(), Point::new(0, 0));
    }

    #[test]
    fn text_and_image_extents_are_external() {
        let t = Shape::Text {
            origin: Point::new(1, 2),
            text: "hi".into(),
            font: FontSpec::new("5x7", "fonts/5x7.bdf"),
        };
        assert_eq!(t.local_bounds(), None);
        assert_eq!(t.anchor(), Point::new(1, 2));

        let i = Shape::Image {
            origin: Point::new(7, 0),
            path: "icons/sun.png".into(),
        };
        assert_eq!(i.local_bounds(), None);
        assert_eq!(i.anchor(), Point::new(7, 0));
    }

    #[test]
    fn json_roundtrip() {
        let instr = PaintingInstruction::new(
            "time",
            Rgb::from_u32(0x800000),
            Shape::Text {
                origin: Point::new(0, 0),
                text: "12:34".into(),
                font: FontSpec::new("6x13", "fonts/6x13.bdf"),
            },
        )
        .with_effects(vec![Effect::new(EffectKind::ScrollLeft, 40)]);

        let s = serde_json::to_string_pretty(&instr).unwrap();
        let de: PaintingInstruction = serde_json::from_str(&s).unwrap();
        assert_eq!(de, instr);
    }
}
