use egui::{Pos2, Vec2};
use image::RgbaImage;

use crate::error::CanvasResult;
use crate::raster;
use crate::snapshot::{PixelRect, RegionSnapshot, Snapshot};
use crate::stroke::StrokeStyle;

/// The drawing surface the history and renderer operate on.
pub trait Surface {
    /// `[width, height]` in pixels
    fn size(&self) -> [u32; 2];

    /// Reset every pixel to the transparent background
    fn clear(&mut self);

    fn stroke_line(&mut self, from: Pos2, to: Pos2, style: &StrokeStyle);

    /// Outline with corners at `a` and `b`; either corner may be the smaller one
    fn stroke_rect(&mut self, a: Pos2, b: Pos2, style: &StrokeStyle);

    fn stroke_ellipse(&mut self, center: Pos2, radii: Vec2, style: &StrokeStyle);

    /// Capture the whole surface
    fn encode(&self) -> CanvasResult<Snapshot>;

    /// Clear the surface, then paint `frame` at the origin
    fn present(&mut self, frame: &RgbaImage);

    /// Decode and present `snapshot`. The surface is untouched when
    /// decoding fails.
    fn restore(&mut self, snapshot: &Snapshot) -> CanvasResult<()> {
        let frame = snapshot.decode_now()?;
        self.present(&frame);
        Ok(())
    }

    fn capture_region(&self, rect: PixelRect) -> RegionSnapshot;

    /// Paint captured pixels with their top-left at (`x`, `y`)
    fn paint_region(&mut self, region: &RegionSnapshot, x: i32, y: i32);

    fn clear_region(&mut self, rect: PixelRect);

    /// Paint `image` scaled to cover the whole surface
    fn draw_image_fill(&mut self, image: &RgbaImage);

    /// Flattened copy of the current pixels
    fn to_image(&self) -> RgbaImage;
}

/// In-memory RGBA surface
#[derive(Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    /// Bumped on every mutation so front-ends know when to re-upload
    revision: u64,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("size", &self.pixels.dimensions())
            .field("revision", &self.revision)
            .finish()
    }
}

impl RasterSurface {
    /// A transparent surface. Both dimensions are at least one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width.max(1), height.max(1)),
            revision: 0,
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) -> &mut RgbaImage {
        self.revision = self.revision.wrapping_add(1);
        &mut self.pixels
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }

    fn clear(&mut self) {
        raster::clear(self.touch());
    }

    fn stroke_line(&mut self, from: Pos2, to: Pos2, style: &StrokeStyle) {
        raster::stroke_segment(self.touch(), from, to, style);
    }

    fn stroke_rect(&mut self, a: Pos2, b: Pos2, style: &StrokeStyle) {
        raster::stroke_rect(self.touch(), a, b, style);
    }

    fn stroke_ellipse(&mut self, center: Pos2, radii: Vec2, style: &StrokeStyle) {
        raster::stroke_ellipse(self.touch(), center, radii, style);
    }

    fn encode(&self) -> CanvasResult<Snapshot> {
        Snapshot::encode(&self.pixels)
    }

    fn present(&mut self, frame: &RgbaImage) {
        let pixels = self.touch();
        raster::clear(pixels);
        raster::put_pixels(pixels, frame, 0, 0);
    }

    fn capture_region(&self, rect: PixelRect) -> RegionSnapshot {
        raster::capture_region(&self.pixels, rect)
    }

    fn paint_region(&mut self, region: &RegionSnapshot, x: i32, y: i32) {
        raster::put_pixels(self.touch(), region.pixels(), x, y);
    }

    fn clear_region(&mut self, rect: PixelRect) {
        raster::clear_rect(self.touch(), rect);
    }

    fn draw_image_fill(&mut self, image: &RgbaImage) {
        raster::draw_scaled(self.touch(), image);
    }

    fn to_image(&self) -> RgbaImage {
        self.pixels.clone()
    }
}
