//! Ordering of preview frames.
//!
//! Decoding the base frame of a preview may complete out of order with
//! respect to the pointer moves that requested it. Every request takes a
//! ticket; only the most recently issued ticket may be presented, so a slow
//! decode for an older pointer position can never overwrite a newer frame.

/// Handle for one requested preview frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameTicket(u64);

/// Latest-request-wins coalescing of preview frames
#[derive(Debug, Default)]
pub struct FrameScheduler {
    issued: u64,
    presented: Option<u64>,
    dropped: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a new frame, superseding every earlier ticket
    pub fn issue(&mut self) -> FrameTicket {
        self.issued += 1;
        FrameTicket(self.issued)
    }

    pub fn is_latest(&self, ticket: FrameTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Called when a frame's decode completes. Returns whether the frame may
    /// be presented; superseded frames are dropped.
    pub fn accept(&mut self, ticket: FrameTicket) -> bool {
        if !self.is_latest(ticket) {
            self.dropped += 1;
            log::trace!("Dropping stale preview frame {} (latest {})", ticket.0, self.issued);
            return false;
        }
        self.presented = Some(ticket.0);
        true
    }

    /// A frame has been issued but not yet presented
    pub fn is_pending(&self) -> bool {
        self.issued > 0 && self.presented != Some(self.issued)
    }

    /// Number of superseded frames dropped so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use futures::executor::block_on;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_in_order_frames_are_presented() {
        let mut frames = FrameScheduler::new();
        let first = frames.issue();
        assert!(frames.is_pending());
        assert!(frames.accept(first));
        let second = frames.issue();
        assert!(frames.accept(second));
        assert!(!frames.is_pending());
        assert_eq!(frames.dropped(), 0);
    }

    #[test]
    fn test_slow_older_decode_is_dropped() {
        let older = Snapshot::encode(&RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]))).unwrap();
        let newer = Snapshot::encode(&RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))).unwrap();

        let mut frames = FrameScheduler::new();
        let mut presented = None;

        let older_ticket = frames.issue();
        let newer_ticket = frames.issue();

        // The newer decode completes first
        let frame = block_on(newer.decode()).unwrap();
        if frames.accept(newer_ticket) {
            presented = Some(frame);
        }
        let frame = block_on(older.decode()).unwrap();
        if frames.accept(older_ticket) {
            presented = Some(frame);
        }

        assert_eq!(*presented.unwrap().get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(frames.dropped(), 1);
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_superseded_before_completion() {
        let mut frames = FrameScheduler::new();
        let ticket = frames.issue();
        frames.issue();
        assert!(!frames.is_latest(ticket));
        assert!(!frames.accept(ticket));
        assert!(frames.is_pending());
    }
}
