//! Hard-edged rasterisation of stroked paths onto an RGBA buffer.
//!
//! A pixel is covered by a path when its integer coordinate lies within half
//! the stroke width of it. Coverage of a whole path is collected first and
//! then composited once, so overlapping segments of a translucent stroke do
//! not darken at the joins.

use std::f32::consts::{PI, TAU};

use egui::{Pos2, Vec2, pos2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::snapshot::{PixelRect, RegionSnapshot};
use crate::stroke::{Composite, DashPattern, StrokeStyle};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Longest polyline segment used to approximate an ellipse
const ELLIPSE_SEGMENT_LENGTH: f32 = 2.0;

/// Upper bound on ellipse polyline points, whatever the radii
const MAX_ELLIPSE_POINTS: usize = 8192;

/// Covered pixels of one path, clipped to the target image
struct Coverage {
    width: u32,
    height: u32,
    mask: Vec<bool>,
}

impl Coverage {
    fn new(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            mask: vec![false; width as usize * height as usize],
        }
    }

    /// Cover every pixel within `radius` of the segment `a`-`b`
    fn add_capsule(&mut self, a: Pos2, b: Pos2, radius: f32) {
        let min_x = ((a.x.min(b.x) - radius).floor() as i64).max(0);
        let min_y = ((a.y.min(b.y) - radius).floor() as i64).max(0);
        let max_x = ((a.x.max(b.x) + radius).ceil() as i64).min(self.width as i64 - 1);
        let max_y = ((a.y.max(b.y) + radius).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = pos2(x as f32, y as f32);
                if distance_to_segment(p, a, b) <= radius + f32::EPSILON {
                    self.mask[y as usize * self.width as usize + x as usize] = true;
                }
            }
        }
    }

    fn add_polyline(&mut self, points: &[Pos2], closed: bool, style: &StrokeStyle) {
        let radius = style.half_width();
        let edges = points.windows(2).map(|w| (w[0], w[1]));
        let closing = match (closed, points.first(), points.last()) {
            (true, Some(first), Some(last)) if points.len() > 2 => Some((*last, *first)),
            _ => None,
        };

        match style.dash() {
            None => {
                for (a, b) in edges.chain(closing) {
                    self.add_capsule(a, b, radius);
                }
            }
            Some(pattern) => {
                // The dash phase carries across corners
                let mut phase = 0.0;
                for (a, b) in edges.chain(closing) {
                    phase = self.add_dashed(a, b, radius, pattern, phase);
                }
            }
        }
    }

    /// Returns the dash phase at `b`
    fn add_dashed(&mut self, a: Pos2, b: Pos2, radius: f32, pattern: DashPattern, phase: f32) -> f32 {
        let dir = b - a;
        let total = dir.length();
        if total <= f32::EPSILON {
            return phase;
        }
        let unit = dir / total;
        let period = pattern.period();

        // Position along the edge where the current period started
        let mut t = -phase;
        while t < total {
            let start = t.max(0.0);
            let end = (t + pattern.dash()).min(total);
            if start < end {
                self.add_capsule(a + unit * start, a + unit * end, radius);
            }
            t += period;
        }
        (phase + total) % period
    }

    fn apply(&self, image: &mut RgbaImage, style: &StrokeStyle) {
        let src = style.color().to_srgba_unmultiplied();
        for (index, covered) in self.mask.iter().enumerate() {
            if !covered {
                continue;
            }
            let x = index as u32 % self.width;
            let y = index as u32 / self.width;
            let pixel = image.get_pixel_mut(x, y);
            *pixel = match style.composite() {
                Composite::Erase => TRANSPARENT,
                Composite::SourceOver => blend_over(*pixel, src),
            };
        }
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Unpremultiplied source-over
fn blend_over(dst: Rgba<u8>, src: [u8; 4]) -> Rgba<u8> {
    let src_a = src[3] as f32 / 255.0;
    if src[3] == 255 {
        return Rgba(src);
    }
    if src[3] == 0 {
        return dst;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= f32::EPSILON {
        return TRANSPARENT;
    }
    let channel = |i: usize| {
        let c = (src[i] as f32 * src_a + dst[i] as f32 * dst_a * (1.0 - src_a)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}

pub fn stroke_polyline(image: &mut RgbaImage, points: &[Pos2], closed: bool, style: &StrokeStyle) {
    let mut coverage = Coverage::new(image);
    coverage.add_polyline(points, closed, style);
    coverage.apply(image, style);
}

pub fn stroke_segment(image: &mut RgbaImage, from: Pos2, to: Pos2, style: &StrokeStyle) {
    stroke_polyline(image, &[from, to], false, style);
}

/// Axis-aligned outline with corners at `a` and `b`, in either order
pub fn stroke_rect(image: &mut RgbaImage, a: Pos2, b: Pos2, style: &StrokeStyle) {
    let corners = [a, pos2(b.x, a.y), b, pos2(a.x, b.y)];
    stroke_polyline(image, &corners, true, style);
}

pub fn ellipse_points(center: Pos2, radii: Vec2) -> Vec<Pos2> {
    let (a, b) = (radii.x.abs(), radii.y.abs());
    // Ramanujan's approximation of the perimeter
    let perimeter = PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt());
    let count = ((perimeter / ELLIPSE_SEGMENT_LENGTH).ceil() as usize).clamp(16, MAX_ELLIPSE_POINTS);
    (0..count)
        .map(|i| {
            let theta = TAU * i as f32 / count as f32;
            pos2(center.x + a * theta.cos(), center.y + b * theta.sin())
        })
        .collect()
}

pub fn stroke_ellipse(image: &mut RgbaImage, center: Pos2, radii: Vec2, style: &StrokeStyle) {
    let points = ellipse_points(center, radii);
    stroke_polyline(image, &points, true, style);
}

pub fn capture_region(image: &RgbaImage, rect: PixelRect) -> RegionSnapshot {
    let rect = rect.clamped(image.width(), image.height());
    let pixels = if rect.is_empty() {
        RgbaImage::new(0, 0)
    } else {
        imageops::crop_imm(image, rect.x as u32, rect.y as u32, rect.width, rect.height).to_image()
    };
    RegionSnapshot::new(rect, pixels)
}

/// Copy `pixels` with their top-left at (`x`, `y`), replacing what is there.
/// Parts falling outside the image are dropped.
pub fn put_pixels(image: &mut RgbaImage, pixels: &RgbaImage, x: i32, y: i32) {
    for (px, py, pixel) in pixels.enumerate_pixels() {
        let tx = x as i64 + px as i64;
        let ty = y as i64 + py as i64;
        if tx >= 0 && ty >= 0 && tx < image.width() as i64 && ty < image.height() as i64 {
            image.put_pixel(tx as u32, ty as u32, *pixel);
        }
    }
}

pub fn clear_rect(image: &mut RgbaImage, rect: PixelRect) {
    let rect = rect.clamped(image.width(), image.height());
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            image.put_pixel(x as u32, y as u32, TRANSPARENT);
        }
    }
}

pub fn clear(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        *pixel = TRANSPARENT;
    }
}

/// Scale `source` to cover the whole image and composite it on top
pub fn draw_scaled(image: &mut RgbaImage, source: &RgbaImage) {
    if source.width() == 0 || source.height() == 0 {
        return;
    }
    let scaled = imageops::resize(source, image.width(), image.height(), FilterType::Triangle);
    for (dst, src) in image.pixels_mut().zip(scaled.pixels()) {
        *dst = blend_over(*dst, src.0);
    }
}
