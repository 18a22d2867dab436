//! matrixpaint renders animated content onto an addressable pixel surface
//! by compositing named rectangular regions ("canvas sections"), each
//! holding an ordered list of declarative painting instructions that are
//! re-evaluated every frame against a shared animation clock.
//!
//! # Frame pipeline
//!
//! 1. **Register**: an external controller populates [`Canvas`] sections
//!    and replaces their representations wholesale between frames.
//! 2. **Resolve**: each frame, [`Painter`] resolves every instruction's
//!    time-driven effects ([`fx`]) against the clock and the cached
//!    first-seen instruction snapshot.
//! 3. **Composite**: sections paint in z order over a black erase of their
//!    own rectangle, the area outside the section union is forced black,
//!    and the frame is flushed to the [`Device`] with one `sync`.
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Whole-surface repaint**: no double buffering or dirty rectangles;
//!   every device pixel is written every frame, deterministically.
//! - **Non-blocking resources**: font metrics and image content load on
//!   background threads; an unresolved resource skips only its own
//!   instruction for that frame.
#![forbid(unsafe_code)]

pub mod canvas;
pub mod core;
pub mod device;
pub mod error;
pub mod fonts;
pub mod fx;
pub mod images;
pub mod model;
pub mod painter;
pub mod resource;

pub use canvas::{Canvas, CanvasSection};
pub use crate::core::{Point, Rect, Rgb, Size};
pub use device::{BufferDevice, Device, TextDraw};
pub use error::{PaintError, PaintResult};
pub use fonts::{FontInstance, FontService};
pub use fx::{Offset, resolve_effects};
pub use images::{DecodedImage, FsImageLoader, ImageLoader};
pub use model::{Effect, EffectKind, EffectOptions, FontSpec, PaintingInstruction, Shape};
pub use painter::Painter;
pub use resource::ResourceState;
