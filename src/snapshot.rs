use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use egui::{Pos2, pos2};
use image::{ImageFormat, RgbaImage};
use uuid::Uuid;

use crate::error::{CanvasError, CanvasResult};

/// Identity of one captured snapshot. Two stacks never hold the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An encoded full-surface capture. Immutable once created; cloning shares
/// the encoded bytes.
#[derive(Clone)]
pub struct Snapshot {
    id: SnapshotId,
    bytes: Arc<[u8]>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("id", &self.id)
            .field("encoded_len", &self.bytes.len())
            .finish()
    }
}

impl Snapshot {
    /// Encode `pixels` as PNG
    pub fn encode(pixels: &RgbaImage) -> CanvasResult<Self> {
        let mut bytes = Vec::new();
        pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(CanvasError::SnapshotEncode)?;
        Ok(Self::from_encoded(bytes))
    }

    /// Wrap already-encoded bytes. Nothing is validated until decode.
    pub fn from_encoded(bytes: Vec<u8>) -> Self {
        Self {
            id: SnapshotId::new(),
            bytes: bytes.into(),
        }
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn encoded(&self) -> &[u8] {
        &self.bytes
    }

    pub fn decode_now(&self) -> CanvasResult<RgbaImage> {
        let image = image::load_from_memory_with_format(&self.bytes, ImageFormat::Png)
            .map_err(CanvasError::SnapshotDecode)?;
        Ok(image.into_rgba8())
    }

    /// Decode as a future, so callers can coalesce superseded requests
    /// before presenting the result.
    pub async fn decode(&self) -> CanvasResult<RgbaImage> {
        self.decode_now()
    }
}

/// Integer pixel rectangle with a non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Normalised rectangle spanned by two pointer positions, in either order
    pub fn from_corners(a: Pos2, b: Pos2) -> Self {
        let (x0, x1) = (a.x.min(b.x).floor() as i32, a.x.max(b.x).floor() as i32);
        let (y0, y1) = (a.y.min(b.y).floor() as i32, a.y.max(b.y).floor() as i32);
        Self {
            x: x0,
            y: y0,
            width: x1.abs_diff(x0),
            height: y1.abs_diff(y0),
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Inclusive of the right and bottom edges
    pub fn contains(&self, pos: Pos2) -> bool {
        pos.x >= self.x as f32
            && pos.x <= self.right() as f32
            && pos.y >= self.y as f32
            && pos.y <= self.bottom() as f32
    }

    /// Part of the rectangle inside a `width` x `height` surface
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let max_x = i32::try_from(width).unwrap_or(i32::MAX);
        let max_y = i32::try_from(height).unwrap_or(i32::MAX);
        let x0 = self.x.clamp(0, max_x);
        let y0 = self.y.clamp(0, max_y);
        let x1 = self.right().clamp(0, max_x);
        let y1 = self.bottom().clamp(0, max_y);
        Self {
            x: x0,
            y: y0,
            width: x1.abs_diff(x0),
            height: y1.abs_diff(y0),
        }
    }

    pub fn moved_to(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..*self }
    }

    pub fn min(&self) -> Pos2 {
        pos2(self.x as f32, self.y as f32)
    }

    pub fn max(&self) -> Pos2 {
        pos2(self.right() as f32, self.bottom() as f32)
    }
}

/// Raw pixels of a sub-rectangle of the surface
#[derive(Clone)]
pub struct RegionSnapshot {
    rect: PixelRect,
    pixels: RgbaImage,
}

impl fmt::Debug for RegionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionSnapshot")
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

impl RegionSnapshot {
    pub fn new(rect: PixelRect, pixels: RgbaImage) -> Self {
        Self { rect, pixels }
    }

    /// Where the pixels were captured from
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }
}
