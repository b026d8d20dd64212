use crate::foundation::error::{BlockturnError, BlockturnResult};

pub use kurbo::{Point, Rect};

/// 0-based frame ordinal within one turntable animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

/// Block identity: numeric block id plus data variant.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BlockKey {
    /// Block type id.
    pub id: u16,
    /// Data value selecting the variant.
    pub data: u8,
}

impl BlockKey {
    /// Create a key from id and data value.
    pub fn new(id: u16, data: u8) -> Self {
        Self { id, data }
    }
}

impl std::fmt::Display for BlockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.id, self.data)
    }
}

/// Integer pixel rectangle a renderer claims it will draw into.
///
/// Bounds are inclusive-min, exclusive-max in screen space (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderedExtent {
    /// Left edge.
    pub min_x: i32,
    /// Top edge.
    pub min_y: i32,
    /// Right edge.
    pub max_x: i32,
    /// Bottom edge.
    pub max_y: i32,
}

impl RenderedExtent {
    /// Create an extent from raw bounds. No validation is performed.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Round float screen bounds outward to whole pixels.
    pub fn from_rect(rect: Rect) -> BlockturnResult<Self> {
        let r = rect.expand();
        let to_i32 = |v: f64| -> BlockturnResult<i32> {
            if !v.is_finite() || v < f64::from(i32::MIN) || v > f64::from(i32::MAX) {
                return Err(BlockturnError::invalid_extent(format!(
                    "projected bound {v} is not representable in pixels"
                )));
            }
            Ok(v as i32)
        };
        Ok(Self {
            min_x: to_i32(r.x0)?,
            min_y: to_i32(r.y0)?,
            max_x: to_i32(r.x1)?,
            max_y: to_i32(r.y1)?,
        })
    }

    /// Return `true` when `min <= max` on both axes.
    pub fn is_well_formed(self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Width in pixels (0 for malformed extents).
    pub fn width(self) -> u32 {
        self.max_x.saturating_sub(self.min_x).max(0) as u32
    }

    /// Height in pixels (0 for malformed extents).
    pub fn height(self) -> u32 {
        self.max_y.saturating_sub(self.min_y).max(0) as u32
    }

    /// Smallest extent containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Shared output canvas: identical origin and size for every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanvasSpec {
    /// Screen-space x of the canvas' top-left pixel.
    pub origin_x: i32,
    /// Screen-space y of the canvas' top-left pixel.
    pub origin_y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSpec {
    /// Screen-space origin as a point.
    pub fn origin(self) -> Point {
        Point::new(f64::from(self.origin_x), f64::from(self.origin_y))
    }

    /// Canvas dimensions narrowed to `u16`, as required by the rasterizer and GIF output.
    pub fn size_u16(self) -> BlockturnResult<(u16, u16)> {
        let w: u16 = self.width.try_into().map_err(|_| {
            BlockturnError::validation(format!("canvas width {} exceeds u16", self.width))
        })?;
        let h: u16 = self.height.try_into().map_err(|_| {
            BlockturnError::validation(format!("canvas height {} exceeds u16", self.height))
        })?;
        Ok((w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
