//! Bounded calculation history with undo/redo
//!
//! The active list and a redo stack form the usual editor pair. Only entries
//! added since the last clear or load can be undone, so a freshly loaded
//! history reports nothing to undo.

use super::calculation::Calculation;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Calculation>,
    redo: Vec<Calculation>,
    /// Number of newest entries that `undo` may remove.
    undoable: usize,
    max_size: usize,
}

impl History {
    /// Create an empty history holding at most `max_size` entries (minimum 1).
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            redo: Vec::new(),
            undoable: 0,
            max_size: max_size.max(1),
        }
    }

    pub fn entries(&self) -> &[Calculation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.undoable > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Append a new calculation. Anything waiting to be redone is discarded.
    pub fn push(&mut self, calculation: Calculation) {
        self.redo.clear();
        self.entries.push(calculation);
        self.undoable += 1;
        self.trim();
    }

    pub fn undo(&mut self) -> bool {
        if self.undoable == 0 {
            return false;
        }
        match self.entries.pop() {
            Some(calculation) => {
                self.redo.push(calculation);
                self.undoable -= 1;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo.pop() {
            Some(calculation) => {
                self.entries.push(calculation);
                self.undoable += 1;
                self.trim();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.redo.clear();
        self.undoable = 0;
    }

    /// Swap in a loaded history. Undo and redo both start out empty.
    pub fn replace(&mut self, entries: Vec<Calculation>) {
        self.clear();
        self.entries = entries;
        self.trim();
    }

    fn trim(&mut self) {
        if self.entries.len() > self.max_size {
            let excess = self.entries.len() - self.max_size;
            self.entries.drain(..excess);
        }
        self.undoable = self.undoable.min(self.entries.len());
    }
}
