//! The frame compositor.
//!
//! [`Painter`] owns the animation clock, the per-instruction identity
//! cache, the font/image caches and the device, and recomputes the whole
//! surface every frame: sections are painted in z order over a fresh black
//! erase of their own rectangle, then everything outside the section union
//! is forced black, then the frame is flushed with one `sync`.
//!
//! One `paint` is in flight at a time by construction (`&mut self`);
//! callers serialize canvas mutations between frames themselves.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, warn};

use crate::{
    canvas::{Canvas, CanvasSection},
    core::{Point, Rect, Rgb, Size},
    device::Device,
    error::{PaintError, PaintResult},
    fonts::{FontInstance, FontService},
    fx,
    images::{DecodedImage, ImageLoader},
    model::{FontSpec, PaintingInstruction, Shape},
    resource::{ResourceCache, ResourceState},
};

/// Shared animation clock: all effects are phased off one start instant.
#[derive(Clone, Copy, Debug)]
struct FrameClock {
    start: Instant,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn reset(&mut self) {
        self.start = Instant::now();
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Frame compositor over a concrete [`Device`].
pub struct Painter<D: Device> {
    canvas: Canvas,
    device: D,
    clock: FrameClock,
    /// First-seen snapshot per instruction id; never evicted. Scroll wrap
    /// decisions anchor on these, not on the current frame's geometry.
    identity: HashMap<String, PaintingInstruction>,
    fonts: ResourceCache<FontSpec, dyn FontInstance>,
    images: ResourceCache<String, DecodedImage>,
    font_service: Arc<dyn FontService>,
    image_loader: Arc<dyn ImageLoader>,
}

impl<D: Device> Painter<D> {
    pub fn new(
        device: D,
        font_service: Arc<dyn FontService>,
        image_loader: Arc<dyn ImageLoader>,
    ) -> Self {
        Self {
            canvas: Canvas::new(),
            device,
            clock: FrameClock::new(),
            identity: HashMap::new(),
            fonts: ResourceCache::new(),
            images: ResourceCache::new(),
            font_service,
            image_loader,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Restart the animation clock; every effect re-phases from zero.
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    /// Compose one frame at the clock's current elapsed duration.
    pub fn paint(&mut self) -> PaintResult<()> {
        let duration = self.clock.elapsed();
        self.paint_at(duration)
    }

    /// Compose one frame as if the clock read `duration`.
    ///
    /// `paint` delegates here; tests and offline rendering call it directly
    /// for deterministic output.
    #[tracing::instrument(skip(self))]
    pub fn paint_at(&mut self, duration: Duration) -> PaintResult<()> {
        let Self {
            canvas,
            device,
            identity,
            fonts,
            images,
            font_service,
            image_loader,
            ..
        } = self;

        device.clear();

        for section in canvas.sections_by_z() {
            erase_section(device, section);
            let section_extent = Size::new(section.width, section.height);
            for instruction in &section.representation {
                // Independent unit of work: nothing an instruction does
                // keeps the rest of the frame from painting.
                if let Err(err) = paint_instruction(
                    device,
                    identity,
                    fonts,
                    images,
                    font_service,
                    image_loader,
                    section,
                    section_extent,
                    instruction,
                    duration,
                ) {
                    match err {
                        PaintError::ResourceLoad(_) => {
                            debug!(id = %instruction.id, error = %err, "instruction skipped")
                        }
                        _ => warn!(id = %instruction.id, error = %err, "instruction skipped"),
                    }
                }
            }
        }

        // Coverage pass: everything outside the section union goes black,
        // so the full surface is deterministic every frame.
        let rects: Vec<Rect> = canvas.sections().iter().map(CanvasSection::rect).collect();
        device.set_foreground_color(Rgb::BLACK);
        for (y, x0, x1) in uncovered_spans(device.width(), device.height(), &rects) {
            device.fill_rect(x0, y, x1, y);
        }

        device.sync();
        Ok(())
    }

    /// Poll the font cache, triggering the load on first request.
    pub fn font_instance(&mut self, name: &str, path: &str) -> ResourceState<dyn FontInstance> {
        let spec = FontSpec::new(name, path);
        font_state(&mut self.fonts, &self.font_service, &spec)
    }

    /// Poll the image cache, triggering the load on first request.
    pub fn image_instance(&mut self, path: &str) -> ResourceState<DecodedImage> {
        image_state(&mut self.images, &self.image_loader, path)
    }
}

fn erase_section(device: &mut impl Device, section: &CanvasSection) {
    if section.width == 0 || section.height == 0 {
        return;
    }
    device.set_foreground_color(Rgb::BLACK);
    device.fill_rect(
        section.x,
        section.y,
        section.x + i64::from(section.width) - 1,
        section.y + i64::from(section.height) - 1,
    );
}

fn font_state(
    fonts: &mut ResourceCache<FontSpec, dyn FontInstance>,
    service: &Arc<dyn FontService>,
    spec: &FontSpec,
) -> ResourceState<dyn FontInstance> {
    let service = Arc::clone(service);
    let for_load = spec.clone();
    fonts.get_or_spawn(spec.clone(), move || {
        service.load(&for_load.name, &for_load.path)
    })
}

fn image_state(
    images: &mut ResourceCache<String, DecodedImage>,
    loader: &Arc<dyn ImageLoader>,
    path: &str,
) -> ResourceState<DecodedImage> {
    let loader = Arc::clone(loader);
    let for_load = path.to_string();
    images.get_or_spawn(path.to_string(), move || {
        loader.load(&for_load).map(Arc::new)
    })
}

/// Resolved drawable form of one instruction for this frame.
enum Visual {
    Geometric,
    Text(Arc<dyn FontInstance>),
    Image(Arc<DecodedImage>),
}

#[allow(clippy::too_many_arguments)]
fn paint_instruction(
    device: &mut impl Device,
    identity: &mut HashMap<String, PaintingInstruction>,
    fonts: &mut ResourceCache<FontSpec, dyn FontInstance>,
    images: &mut ResourceCache<String, DecodedImage>,
    font_service: &Arc<dyn FontService>,
    image_loader: &Arc<dyn ImageLoader>,
    section: &CanvasSection,
    section_extent: Size,
    instruction: &PaintingInstruction,
    duration: Duration,
) -> PaintResult<()> {
    // Register identity on first sight; the cached snapshot is what the
    // wrap guard anchors on for the painter's lifetime.
    let anchor = identity
        .entry(instruction.id.clone())
        .or_insert_with(|| instruction.clone())
        .shape
        .anchor();

    let (extent, visual) = match prepare(fonts, images, font_service, image_loader, instruction)? {
        Some(prepared) => prepared,
        None => return Ok(()), // pending resource or empty geometry
    };

    let offset = fx::resolve_effects(duration, anchor, extent, section_extent, &instruction.effects);
    if offset.suppress {
        debug!(id = %instruction.id, "instruction suppressed by effect");
        return Ok(());
    }

    let dx = section.x + offset.dx;
    let dy = section.y + offset.dy;
    device.set_foreground_color(instruction.color);

    match (&instruction.shape, &visual) {
        (
            Shape::Rectangle {
                origin,
                width,
                height,
                fill,
            },
            _,
        ) => {
            if *fill {
                device.draw_filled_rect(origin.x + dx, origin.y + dy, *width, *height);
            } else {
                device.draw_rect(origin.x + dx, origin.y + dy, *width, *height);
            }
        }
        (
            Shape::Circle {
                center,
                radius,
                fill,
            },
            _,
        ) => {
            if *fill {
                device.draw_filled_circle(center.x + dx, center.y + dy, *radius);
            } else {
                device.draw_circle(center.x + dx, center.y + dy, *radius);
            }
        }
        (Shape::Polygon { vertices, fill }, _) => {
            let coords = flatten(vertices, dx, dy);
            if *fill {
                device.draw_filled_polygon(&coords);
            } else {
                device.draw_polygon(&coords);
            }
        }
        (Shape::Pixel { points, .. }, _) => {
            for p in points {
                device.set_pixel(p.x + dx, p.y + dy);
            }
        }
        (Shape::Line { from, to }, _) => {
            // No dedicated line primitive on the device surface; a
            // two-vertex polygon is the pixel walk between the endpoints.
            device.draw_polygon(&[from.x + dx, from.y + dy, to.x + dx, to.y + dy]);
        }
        (Shape::Text { origin, text, .. }, Visual::Text(font)) => {
            device.set_font(font);
            device.draw_text(text, origin.x + dx, origin.y + dy);
        }
        (Shape::Image { origin, .. }, Visual::Image(image)) => {
            blit(device, image, origin.translated(dx, dy));
        }
        (shape, _) => {
            debug!(mode = shape.mode_name(), "no drawable visual for shape");
        }
    }

    Ok(())
}

/// Resolve an instruction's extent and drawable form, or decide it is
/// skipped this frame (`Ok(None)`) or undrawable (`Err`).
fn prepare(
    fonts: &mut ResourceCache<FontSpec, dyn FontInstance>,
    images: &mut ResourceCache<String, DecodedImage>,
    font_service: &Arc<dyn FontService>,
    image_loader: &Arc<dyn ImageLoader>,
    instruction: &PaintingInstruction,
) -> PaintResult<Option<(Size, Visual)>> {
    match &instruction.shape {
        Shape::Ellipse { .. } | Shape::Buffer { .. } => {
            Err(PaintError::unsupported(instruction.shape.mode_name()))
        }
        Shape::Pixel { fill: true, .. } => Err(PaintError::unsupported("PIXEL (filled)")),
        Shape::Text { text, font, .. } => match font_state(fonts, font_service, font) {
            ResourceState::Ready(f) => {
                let extent = Size::new(f.string_width(text), f.line_height());
                Ok(Some((extent, Visual::Text(f))))
            }
            ResourceState::Pending => {
                debug!(font = %font.name, "font still loading");
                Ok(None)
            }
            ResourceState::Failed => Err(PaintError::resource(format!(
                "font '{}' ('{}')",
                font.name, font.path
            ))),
        },
        Shape::Image { path, .. } => match image_state(images, image_loader, path) {
            ResourceState::Ready(image) => {
                let extent = Size::new(image.width, image.height);
                Ok(Some((extent, Visual::Image(image))))
            }
            ResourceState::Pending => {
                debug!(%path, "image still loading");
                Ok(None)
            }
            ResourceState::Failed => Err(PaintError::resource(format!("image '{path}'"))),
        },
        geometric => match geometric.local_bounds() {
            Some(bounds) => Ok(Some((bounds.size(), Visual::Geometric))),
            None => {
                debug!(mode = geometric.mode_name(), "empty geometry");
                Ok(None)
            }
        },
    }
}

/// Per-pixel blit with an alpha test: fully transparent source pixels are
/// skipped, everything else lands at its RGB value.
fn blit(device: &mut impl Device, image: &DecodedImage, origin: Point) {
    for sy in 0..image.height {
        for sx in 0..image.width {
            let Some((rgb, alpha)) = image.pixel(sx, sy) else {
                continue;
            };
            if alpha == 0 {
                continue;
            }
            device.set_foreground_color(rgb);
            device.set_pixel(origin.x + i64::from(sx), origin.y + i64::from(sy));
        }
    }
}

fn flatten(vertices: &[Point], dx: i64, dy: i64) -> Vec<i64> {
    let mut coords = Vec::with_capacity(vertices.len() * 2);
    for v in vertices {
        coords.push(v.x + dx);
        coords.push(v.y + dy);
    }
    coords
}

/// Device rows not covered by any section rectangle, as inclusive
/// `(y, x0, x1)` spans clamped to the surface.
fn uncovered_spans(width: u32, height: u32, rects: &[Rect]) -> Vec<(i64, i64, i64)> {
    let w = i64::from(width);
    let mut out = Vec::new();
    for y in 0..i64::from(height) {
        let mut intervals: Vec<(i64, i64)> = rects
            .iter()
            .filter(|r| r.covers_row(y))
            .map(|r| (r.x.max(0), r.right().min(w)))
            .filter(|(a, b)| a < b)
            .collect();
        intervals.sort_unstable();

        let mut cursor = 0i64;
        for (a, b) in intervals {
            if a > cursor {
                out.push((y, cursor, a - 1));
            }
            cursor = cursor.max(b);
        }
        if cursor < w {
            out.push((y, cursor, w - 1));
        }
    }
    out
}
