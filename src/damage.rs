//! Damage (invalidated rectangle) queue.

use log::trace;

use crate::geometry::{touches, union, Rect};

/// Rectangles waiting to be redrawn.
///
/// Insertion merges with the first queued rectangle that overlaps or shares
/// an edge with the new one (bounding-box union); otherwise the rectangle is
/// put at the front. Merging is first-fit only, so the queue may hold more
/// rectangles than a minimal cover.
#[derive(Debug, Clone, Default)]
pub struct DamageQueue {
    rects: Vec<Rect>,
}

impl DamageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `rect` for redraw. Empty rectangles are ignored.
    pub fn invalidate(&mut self, rect: &Rect) {
        if rect.is_empty() {
            return;
        }
        if let Some(existing) = self.rects.iter_mut().find(|r| touches(r, rect)) {
            *existing = union(existing, rect);
            trace!("damage merged into {:?}", existing);
            return;
        }
        trace!("damage queued {:?}", rect);
        self.rects.insert(0, *rect);
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Queued rectangles, most recently added first.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Remove and return every queued rectangle.
    pub fn take(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.rects)
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }
}
