use crate::foundation::core::Size;

/// Source/destination start along one axis, and the overlapping length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AxisSpan {
    pub(crate) src: u32,
    pub(crate) dst: u32,
    pub(crate) len: u32,
}

/// Slide-and-clip along one axis: content at `src..src+len` lands at `dst..dst+len`.
///
/// `None` when the shift moves everything out of `0..extent`.
pub(crate) fn shift_overlap(extent: u32, delta: i64) -> Option<AxisSpan> {
    let mag = delta.unsigned_abs();
    if mag >= u64::from(extent) {
        return None;
    }
    let mag = mag as u32;
    let len = extent - mag;
    if delta >= 0 {
        Some(AxisSpan {
            src: 0,
            dst: mag,
            len,
        })
    } else {
        Some(AxisSpan {
            src: mag,
            dst: 0,
            len,
        })
    }
}

/// Matching source and destination sub-rectangles of a `(dx, dy)` shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ShiftRects {
    pub(crate) x: AxisSpan,
    pub(crate) y: AxisSpan,
}

/// Intersect the shifted footprint of a `size` plane with its own bounds.
pub(crate) fn shifted_rects(size: Size, dx: i64, dy: i64) -> Option<ShiftRects> {
    Some(ShiftRects {
        x: shift_overlap(size.width, dx)?,
        y: shift_overlap(size.height, dy)?,
    })
}

/// Scale a sample by `factor`, truncating toward zero and saturating to `0..=255`.
pub(crate) fn scale_u8(v: u8, factor: f64) -> u8 {
    (f64::from(v) * factor) as u8
}

/// `a * t + b * (1 - t)`, truncated to 8 bits.
pub(crate) fn blend_u8(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) * t + f64::from(b) * (1.0 - t)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
