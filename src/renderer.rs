use egui::{Pos2, Rect, Vec2};
use futures::executor::block_on;
use image::RgbaImage;

use crate::error::{CanvasError, CanvasResult};
use crate::history::History;
use crate::preview::{FrameScheduler, FrameTicket};
use crate::snapshot::{PixelRect, RegionSnapshot, SnapshotId};
use crate::stroke::StrokeStyle;
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Ellipse,
}

/// A shape spanned from the fixed anchor to the current pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub anchor: Pos2,
    pub current: Pos2,
}

impl Shape {
    pub fn new(kind: ShapeKind, anchor: Pos2, current: Pos2) -> Self {
        Self { kind, anchor, current }
    }

    /// Normalised bounding box; the same whichever corner is the anchor
    pub fn bounds(&self) -> Rect {
        Rect::from_two_pos(self.anchor, self.current)
    }

    /// Center and (non-negative) radii of the ellipse inscribed in the bounds
    pub fn ellipse_geometry(&self) -> (Pos2, Vec2) {
        let center = self.anchor + (self.current - self.anchor) / 2.0;
        let radii = ((self.current - self.anchor) / 2.0).abs();
        (center, radii)
    }

    /// Shapes with no extent draw nothing
    pub fn is_degenerate(&self) -> bool {
        self.anchor == self.current
    }

    pub fn draw<S: Surface>(&self, surface: &mut S, style: &StrokeStyle) {
        if self.is_degenerate() {
            return;
        }
        match self.kind {
            ShapeKind::Line => surface.stroke_line(self.anchor, self.current, style),
            // Signed extents go straight to the primitive
            ShapeKind::Rectangle => surface.stroke_rect(self.anchor, self.current, style),
            ShapeKind::Ellipse => {
                let (center, radii) = self.ellipse_geometry();
                surface.stroke_ellipse(center, radii, style);
            }
        }
    }
}

/// Decoded pixels of the checkpoint previews are drawn on top of
struct PreviewBase {
    snapshot: SnapshotId,
    frame: RgbaImage,
}

/// What a preview frame draws over the restored checkpoint
#[derive(Debug, Clone)]
enum FrameRequest {
    /// The checkpoint alone
    Base,
    Shape { shape: Shape, style: StrokeStyle },
    /// Captured pixels cleared at `from` and painted with their top-left at `to`
    Drag {
        region: RegionSnapshot,
        from: PixelRect,
        to: (i32, i32),
        outline: Option<StrokeStyle>,
    },
}

impl FrameRequest {
    fn draw<S: Surface>(&self, surface: &mut S) {
        match self {
            FrameRequest::Base => {}
            FrameRequest::Shape { shape, style } => {
                shape.draw(surface, style);
                log::trace!("Preview {:?} {:?} -> {:?}", shape.kind, shape.anchor, shape.current);
            }
            FrameRequest::Drag {
                region,
                from,
                to,
                outline,
            } => {
                surface.clear_region(*from);
                surface.paint_region(region, to.0, to.1);
                if let Some(style) = outline {
                    let moved = from.moved_to(to.0, to.1);
                    if !moved.is_empty() {
                        surface.stroke_rect(moved.min(), moved.max(), style);
                    }
                }
            }
        }
    }
}

/// A requested frame waiting to be presented
#[derive(Debug)]
struct PendingFrame {
    ticket: FrameTicket,
    request: FrameRequest,
}

/// Renders freehand strokes incrementally and shape previews by
/// restore-then-redraw.
///
/// Preview frames are queued behind a [`FrameScheduler`] ticket. While
/// frames are held, a newer request replaces the queued one and the older
/// frame is dropped without ever touching the surface.
#[derive(Default)]
pub struct Renderer {
    frames: FrameScheduler,
    base: Option<PreviewBase>,
    pending: Option<PendingFrame>,
    holding: bool,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("frames", &self.frames)
            .field("base", &self.base.as_ref().map(|b| b.snapshot))
            .field("pending", &self.pending.as_ref().map(|p| p.ticket))
            .field("holding", &self.holding)
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached preview base and any queued frame
    pub fn end_gesture(&mut self) {
        self.base = None;
        self.pending = None;
    }

    /// Present the last queued frame, then forget the gesture's base
    pub fn finish_gesture<S: Surface>(&mut self, surface: &mut S, history: &History) -> CanvasResult<()> {
        let presented = self.present_pending(surface, history);
        self.end_gesture();
        presented.map(|_| ())
    }

    pub fn frames(&self) -> &FrameScheduler {
        &self.frames
    }

    /// Queue preview frames instead of presenting them right away
    pub fn hold_frames(&mut self) {
        self.holding = true;
    }

    /// Stop holding and present the latest queued frame
    pub fn release_frames<S: Surface>(&mut self, surface: &mut S, history: &History) -> CanvasResult<bool> {
        self.holding = false;
        self.present_pending(surface, history)
    }

    /// Freehand strategy: one permanent segment, no restore
    pub fn extend_stroke<S: Surface>(&mut self, surface: &mut S, from: Pos2, to: Pos2, style: &StrokeStyle) {
        surface.stroke_line(from, to, style);
    }

    /// Decode the checkpoint on top of the undo stack, once per snapshot
    fn load_base(&mut self, history: &History) -> CanvasResult<()> {
        let top = history.peek_undo().ok_or(CanvasError::NoCheckpoint)?;
        if self.base.as_ref().is_some_and(|base| base.snapshot == top.id()) {
            return Ok(());
        }
        let frame = block_on(top.decode())?;
        self.base = Some(PreviewBase {
            snapshot: top.id(),
            frame,
        });
        Ok(())
    }

    /// Take a ticket for `request`; the frame queued before it is dropped
    fn replace_pending(&mut self, request: FrameRequest) {
        let ticket = self.frames.issue();
        if let Some(stale) = self.pending.replace(PendingFrame { ticket, request }) {
            self.frames.accept(stale.ticket);
        }
    }

    /// Queue `request`. Presented immediately unless frames are held.
    fn queue<S: Surface>(&mut self, surface: &mut S, history: &History, request: FrameRequest) -> CanvasResult<()> {
        self.replace_pending(request);
        if !self.holding {
            self.present_pending(surface, history)?;
        }
        Ok(())
    }

    /// Restore the checkpoint and draw the queued frame over it. Returns
    /// `false` when there was nothing to present or it was superseded.
    pub fn present_pending<S: Surface>(&mut self, surface: &mut S, history: &History) -> CanvasResult<bool> {
        let Some(frame) = self.pending.take() else {
            return Ok(false);
        };
        self.load_base(history)?;
        if !self.frames.accept(frame.ticket) {
            return Ok(false);
        }
        if let Some(base) = &self.base {
            surface.present(&base.frame);
        }
        frame.request.draw(surface);
        Ok(true)
    }

    /// Put the checkpoint on top of the undo stack back on the surface
    /// without popping it, superseding any queued frame.
    pub fn restore_base<S: Surface>(&mut self, surface: &mut S, history: &History) -> CanvasResult<bool> {
        self.replace_pending(FrameRequest::Base);
        self.present_pending(surface, history)
    }

    /// Shape strategy: restore the checkpoint, then draw anchor to current
    pub fn preview_shape<S: Surface>(
        &mut self,
        surface: &mut S,
        history: &History,
        shape: &Shape,
        style: &StrokeStyle,
    ) -> CanvasResult<()> {
        let request = FrameRequest::Shape {
            shape: *shape,
            style: *style,
        };
        self.queue(surface, history, request)
    }

    /// Dashed selection rectangle over the restored checkpoint
    pub fn preview_selection<S: Surface>(
        &mut self,
        surface: &mut S,
        history: &History,
        anchor: Pos2,
        current: Pos2,
        outline: &StrokeStyle,
    ) -> CanvasResult<()> {
        let request = FrameRequest::Shape {
            shape: Shape::new(ShapeKind::Rectangle, anchor, current),
            style: *outline,
        };
        self.queue(surface, history, request)
    }

    /// Move captured pixels: clear them at `from`, paint them with their
    /// top-left at `to`, optionally outlining the new position.
    pub fn preview_drag<S: Surface>(
        &mut self,
        surface: &mut S,
        history: &History,
        region: &RegionSnapshot,
        from: PixelRect,
        to: (i32, i32),
        outline: Option<&StrokeStyle>,
    ) -> CanvasResult<()> {
        let request = FrameRequest::Drag {
            region: region.clone(),
            from,
            to,
            outline: outline.copied(),
        };
        self.queue(surface, history, request)
    }
}
