use crate::error::CanvasResult;
use crate::snapshot::{Snapshot, SnapshotId};
use crate::surface::Surface;

/// Full-surface undo/redo history.
///
/// Both stacks hold the most recent snapshot last. Undo and redo move a
/// snapshot from one stack to the other; nothing is ever copied across.
/// There is no depth limit.
#[derive(Debug, Default)]
pub struct History {
    /// Snapshots that can be undone
    undo_stack: Vec<Snapshot>,
    /// Snapshots that can be redone
    redo_stack: Vec<Snapshot>,
}

impl History {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current surface before an irreversible edit.
    /// Clears the redo stack.
    pub fn checkpoint<S: Surface>(&mut self, surface: &S) -> CanvasResult<SnapshotId> {
        let snapshot = surface.encode()?;
        let id = snapshot.id();
        self.undo_stack.push(snapshot);
        if !self.redo_stack.is_empty() {
            log::debug!("Checkpoint {id} discards {} redo entries", self.redo_stack.len());
            self.redo_stack.clear();
        }
        log::debug!("Checkpoint {id} (undo depth {})", self.undo_stack.len());
        Ok(id)
    }

    /// Step back one checkpoint. Returns `false` when there is nothing to undo.
    pub fn undo<S: Surface>(&mut self, surface: &mut S) -> CanvasResult<bool> {
        let restored = Self::step(&mut self.undo_stack, &mut self.redo_stack, surface)?;
        if restored {
            log::debug!("Undo (undo depth {}, redo depth {})", self.undo_stack.len(), self.redo_stack.len());
        }
        Ok(restored)
    }

    /// Step forward again after an undo. Returns `false` when there is nothing to redo.
    pub fn redo<S: Surface>(&mut self, surface: &mut S) -> CanvasResult<bool> {
        let restored = Self::step(&mut self.redo_stack, &mut self.undo_stack, surface)?;
        if restored {
            log::debug!("Redo (undo depth {}, redo depth {})", self.undo_stack.len(), self.redo_stack.len());
        }
        Ok(restored)
    }

    /// Restore the top of `from`, pushing the current surface onto `to`.
    /// On any failure both stacks and the surface are left as they were.
    fn step<S: Surface>(from: &mut Vec<Snapshot>, to: &mut Vec<Snapshot>, surface: &mut S) -> CanvasResult<bool> {
        let Some(target) = from.pop() else {
            return Ok(false);
        };
        let current = match surface.encode() {
            Ok(current) => current,
            Err(err) => {
                from.push(target);
                return Err(err);
            }
        };
        if let Err(err) = surface.restore(&target) {
            log::error!("Failed to restore snapshot {}: {err}", target.id());
            from.push(target);
            return Err(err);
        }
        to.push(current);
        Ok(true)
    }

    /// The checkpoint a preview frame is drawn on top of. Not popped.
    pub fn peek_undo(&self) -> Option<&Snapshot> {
        self.undo_stack.last()
    }

    /// Returns true if there are checkpoints that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are states that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[Snapshot] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Snapshot] {
        &self.redo_stack
    }
}
