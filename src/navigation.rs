use std::collections::VecDeque;

use crate::model::ViewId;

pub const DEFAULT_CAPACITY: usize = 32;

/// Focus history. The last entry is the focused view.
///
/// Re-focusing the current view is a no-op, so the history never holds two equal
/// entries in a row. When full, the oldest entry is dropped.
#[derive(Clone, Debug)]
pub struct NavigationStack {
    entries: VecDeque<ViewId>,
    capacity: usize,
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn focus(&mut self, view: ViewId) {
        if self.current() == Some(view) {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(view);
    }

    /// Return to the previously focused view. Inert on the root view.
    pub fn back(&mut self) -> Option<ViewId> {
        if self.entries.len() > 1 {
            self.entries.pop_back();
        }
        self.current()
    }

    pub fn current(&self) -> Option<ViewId> {
        self.entries.back().copied()
    }

    /// Most recently focused view matching `pred`, searching from the top.
    pub fn last_matching(&self, pred: impl Fn(ViewId) -> bool) -> Option<ViewId> {
        self.entries.iter().rev().copied().find(|v| pred(*v))
    }

    /// Drop `view` from the history, e.g. when its panel disappears.
    /// Entries that become adjacent duplicates are merged.
    pub fn forget(&mut self, view: ViewId) {
        let mut kept = VecDeque::with_capacity(self.capacity);
        for v in self.entries.drain(..) {
            if v != view && kept.back() != Some(&v) {
                kept.push_back(v);
            }
        }
        self.entries = kept;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.entries.iter().copied()
    }
}
