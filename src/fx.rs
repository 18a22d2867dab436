//! Time-driven effect resolution.
//!
//! Pure functions from (elapsed clock duration, cached anchor, geometry
//! extent, section extent, effect list) to a geometric offset and a
//! visibility flag. Scroll position is periodic with period
//! `extent + section_extent` pixels on the travel axis; at duration zero
//! the offset is zero, so the rendered position equals the declared
//! anchor.

use std::time::Duration;

use tracing::warn;

use crate::{
    core::{Point, Size},
    model::{Effect, EffectKind},
};

/// Resolved result of every effect on one instruction for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Offset {
    pub dx: i64,
    pub dy: i64,
    pub suppress: bool,
}

/// Resolve `effects` in list order, accumulating offsets additively.
/// Suppression from any effect wins over later effects.
///
/// `anchor` is the section-local position cached when the instruction was
/// first seen; the wrap guard compares against it rather than the current
/// frame's raw formula, so geometry that has fully left the section snaps
/// to re-enter from the opposite edge.
pub fn resolve_effects(
    duration: Duration,
    anchor: Point,
    extent: Size,
    section: Size,
    effects: &[Effect],
) -> Offset {
    let mut out = Offset::default();
    for effect in effects {
        let rate = effect.options.rate_ms;
        if rate == 0 {
            warn!(kind = ?effect.kind, "effect rate_ms is zero, effect skipped");
            continue;
        }
        match effect.kind {
            EffectKind::ScrollLeft => {
                out.dx += scroll_negative(duration, rate, anchor.x, extent.width, section.width);
            }
            EffectKind::ScrollRight => {
                out.dx += scroll_positive(duration, rate, anchor.x, extent.width, section.width);
            }
            EffectKind::ScrollUp => {
                out.dy += scroll_negative(duration, rate, anchor.y, extent.height, section.height);
            }
            EffectKind::ScrollDown => {
                out.dy += scroll_positive(duration, rate, anchor.y, extent.height, section.height);
            }
            EffectKind::Blink => {
                out.suppress |= blink_suppressed(duration, rate);
            }
        }
    }
    out
}

/// `true` during every odd `rate_ms` window: visible in `[0, R)`, hidden in
/// `[R, 2R)`, and so on.
pub fn blink_suppressed(duration: Duration, rate_ms: u64) -> bool {
    if rate_ms == 0 {
        return false;
    }
    (duration.as_millis() / u128::from(rate_ms)) % 2 == 1
}

/// Pixels traveled so far, wrapped to the scroll period
/// `extent + section_extent`.
fn wrapped_travel(duration: Duration, rate_ms: u64, extent: u32, span: u32) -> (i64, i64) {
    let period = i64::from(extent) + i64::from(span);
    if period == 0 {
        return (0, 0);
    }
    let travel = (duration.as_millis() / u128::from(rate_ms)) % period as u128;
    (travel as i64, period)
}

/// Travel toward negative coordinates (scroll left / scroll up).
///
/// Wraps once the cached anchor plus the offset puts the geometry fully
/// past the low edge: the last visible row/column counts as visible, so
/// the guard fires at `anchor + dx + extent <= 0`.
fn scroll_negative(duration: Duration, rate_ms: u64, anchor: i64, extent: u32, span: u32) -> i64 {
    let (travel, period) = wrapped_travel(duration, rate_ms, extent, span);
    let mut dx = -travel;
    if anchor + dx + i64::from(extent) <= 0 {
        dx += period;
    }
    dx
}

/// Travel toward positive coordinates (scroll right / scroll down),
/// wrapping once the geometry is fully past the high edge of the section.
fn scroll_positive(duration: Duration, rate_ms: u64, anchor: i64, extent: u32, span: u32) -> i64 {
    let (travel, period) = wrapped_travel(duration, rate_ms, extent, span);
    let mut dx = travel;
    if anchor + dx >= i64::from(span) {
        dx -= period;
    }
    dx
}
