#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use matrixpaint::{
    BufferDevice, DecodedImage, Device, FontInstance, FontService, ImageLoader, Painter,
    ResourceState, Rgb,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Font stub with a fixed per-character advance.
pub struct FixedFont {
    pub name: String,
    pub path: String,
    pub advance: u32,
    pub height: u32,
}

impl FontInstance for FixedFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn string_width(&self, text: &str) -> u32 {
        self.advance * text.chars().count() as u32
    }

    fn line_height(&self) -> u32 {
        self.height
    }
}

/// Counts loads and serves a `FixedFont` for any key.
#[derive(Default)]
pub struct StubFontService {
    pub loads: AtomicUsize,
}

impl FontService for StubFontService {
    fn load(&self, name: &str, path: &str) -> anyhow::Result<Arc<dyn FontInstance>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FixedFont {
            name: name.to_string(),
            path: path.to_string(),
            advance: 6,
            height: 13,
        }))
    }
}

/// Serves preloaded images by path; unknown paths fail.
#[derive(Default)]
pub struct MapImageLoader {
    pub images: Mutex<HashMap<String, DecodedImage>>,
    pub loads: AtomicUsize,
}

impl MapImageLoader {
    pub fn with_image(path: &str, image: DecodedImage) -> Self {
        let loader = Self::default();
        loader.images.lock().unwrap().insert(path.to_string(), image);
        loader
    }
}

impl ImageLoader for MapImageLoader {
    fn load(&self, path: &str) -> anyhow::Result<DecodedImage> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.images
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such image '{path}'"))
    }
}

/// Image loader that blocks until the test drops its hold on `gate`.
pub struct GatedImageLoader {
    pub inner: MapImageLoader,
    pub gate: Arc<Mutex<()>>,
}

impl ImageLoader for GatedImageLoader {
    fn load(&self, path: &str) -> anyhow::Result<DecodedImage> {
        let _open = self.gate.lock().unwrap();
        self.inner.load(path)
    }
}

/// Poll until an image settles; panics if it never does.
pub fn wait_image<D: Device>(painter: &mut Painter<D>, path: &str) -> ResourceState<DecodedImage> {
    for _ in 0..500 {
        let state = painter.image_instance(path);
        if !state.is_pending() {
            return state;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("image '{path}' never settled");
}

/// Poll until a font settles; panics if it never does.
pub fn wait_font<D: Device>(
    painter: &mut Painter<D>,
    name: &str,
    path: &str,
) -> ResourceState<dyn FontInstance> {
    for _ in 0..500 {
        let state = painter.font_instance(name, path);
        if !state.is_pending() {
            return state;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("font '{name}' never settled");
}

pub fn buffer_painter(width: u32, height: u32) -> Painter<BufferDevice> {
    Painter::new(
        BufferDevice::new(width, height),
        Arc::new(StubFontService::default()),
        Arc::new(MapImageLoader::default()),
    )
}

/// Device call recorded by [`RecordingDevice`].
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear,
    SetColor(Rgb),
    FillRect(i64, i64, i64, i64),
    DrawRect(i64, i64, u32, u32),
    DrawFilledRect(i64, i64, u32, u32),
    DrawCircle(i64, i64, u32),
    DrawFilledCircle(i64, i64, u32),
    DrawPolygon(Vec<i64>),
    DrawFilledPolygon(Vec<i64>),
    SetPixel(i64, i64),
    SetFont(String),
    DrawText(String, i64, i64),
    Sync,
}

/// Records every device call in issue order.
pub struct RecordingDevice {
    pub width: u32,
    pub height: u32,
    pub ops: Vec<Op>,
}

impl RecordingDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Color state at the time `ops[idx]` was issued.
    pub fn color_before(&self, idx: usize) -> Option<Rgb> {
        self.ops[..idx].iter().rev().find_map(|op| match op {
            Op::SetColor(c) => Some(*c),
            _ => None,
        })
    }
}

impl Device for RecordingDevice {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn set_foreground_color(&mut self, color: Rgb) {
        self.ops.push(Op::SetColor(color));
    }

    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64) {
        self.ops.push(Op::FillRect(x0, y0, x1, y1));
    }

    fn draw_rect(&mut self, x: i64, y: i64, width: u32, height: u32) {
        self.ops.push(Op::DrawRect(x, y, width, height));
    }

    fn draw_filled_rect(&mut self, x: i64, y: i64, width: u32, height: u32) {
        self.ops.push(Op::DrawFilledRect(x, y, width, height));
    }

    fn draw_circle(&mut self, x: i64, y: i64, radius: u32) {
        self.ops.push(Op::DrawCircle(x, y, radius));
    }

    fn draw_filled_circle(&mut self, x: i64, y: i64, radius: u32) {
        self.ops.push(Op::DrawFilledCircle(x, y, radius));
    }

    fn draw_polygon(&mut self, coords: &[i64]) {
        self.ops.push(Op::DrawPolygon(coords.to_vec()));
    }

    fn draw_filled_polygon(&mut self, coords: &[i64]) {
        self.ops.push(Op::DrawFilledPolygon(coords.to_vec()));
    }

    fn set_pixel(&mut self, x: i64, y: i64) {
        self.ops.push(Op::SetPixel(x, y));
    }

    fn set_font(&mut self, font: &Arc<dyn FontInstance>) {
        self.ops.push(Op::SetFont(font.name().to_string()));
    }

    fn draw_text(&mut self, text: &str, x: i64, y: i64) {
        self.ops.push(Op::DrawText(text.to_string(), x, y));
    }

    fn sync(&mut self) {
        self.ops.push(Op::Sync);
    }
}
