//! Image assets: decoded pixel content and the loader seam.

use std::path::PathBuf;

use anyhow::Context;

use crate::core::Rgb;

/// Row-major 32-bit RGBA pixel content, straight (non-premultiplied) alpha.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    /// Decode any format the `image` crate understands into RGBA8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> anyhow::Result<Self> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            anyhow::bail!("rgba buffer does not match {width}x{height}*4");
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Source pixel at `(x, y)` as `(rgb, alpha)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(Rgb, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba[idx..idx + 4];
        Some((Rgb::new(px[0], px[1], px[2]), px[3]))
    }
}

/// External asynchronous image source, keyed by path.
///
/// `load` runs on a background thread owned by the painter's image cache;
/// until it resolves, instructions referencing the path are skipped.
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &str) -> anyhow::Result<DecodedImage>;
}

/// Filesystem-backed loader resolving paths relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &str) -> anyhow::Result<DecodedImage> {
        let full = self.root.join(path);
        let bytes = std::fs::read(&full)
            .with_context(|| format!("read image bytes from '{}'", full.display()))?;
        DecodedImage::from_bytes(&bytes)
    }
}
