// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Level-ordered render buckets.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::types::ControlId;

/// Outcome of [`RenderBuckets::place`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    /// The control was not in any bucket.
    Inserted,
    /// The control moved from the bucket for the given level.
    Moved(u32),
    /// The control was already in the right bucket.
    Unchanged,
}

/// Controls eligible for drawing, grouped by level.
///
/// Each control sits in exactly one bucket, the one matching the level it was last
/// placed with. Within a bucket, controls keep the order they were placed in.
#[derive(Clone, Debug, Default)]
pub(crate) struct RenderBuckets {
    levels: BTreeMap<u32, Vec<ControlId>>,
    index: HashMap<ControlId, u32>,
}

impl RenderBuckets {
    /// Put `id` in the bucket for `level`, relocating it if it sits elsewhere.
    pub(crate) fn place(&mut self, id: ControlId, level: u32) -> Placement {
        let placement = match self.index.insert(id, level) {
            None => Placement::Inserted,
            Some(old) if old == level => return Placement::Unchanged,
            Some(old) => {
                self.detach(id, old);
                Placement::Moved(old)
            }
        };
        self.levels.entry(level).or_default().push(id);
        placement
    }

    /// Take `id` out of its bucket. Returns `false` if it was not bucketed.
    pub(crate) fn remove(&mut self, id: ControlId) -> bool {
        let Some(level) = self.index.remove(&id) else {
            return false;
        };
        self.detach(id, level);
        true
    }

    pub(crate) fn contains(&self, id: ControlId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn level_of(&self, id: ControlId) -> Option<u32> {
        self.index.get(&id).copied()
    }

    /// Paint order of `id`: its level, then its position within the bucket.
    pub(crate) fn order_of(&self, id: ControlId) -> Option<(u32, usize)> {
        let level = self.level_of(id)?;
        let pos = self.levels.get(&level)?.iter().position(|c| *c == id)?;
        Some((level, pos))
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    /// Every bucketed control, ascending by level.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, ControlId)> + '_ {
        self.levels
            .iter()
            .flat_map(|(level, ids)| ids.iter().map(move |id| (*level, *id)))
    }

    fn detach(&mut self, id: ControlId, level: u32) {
        if let Some(bucket) = self.levels.get_mut(&level) {
            bucket.retain(|c| *c != id);
            if bucket.is_empty() {
                self.levels.remove(&level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ControlId {
        ControlId::new(n, 1)
    }

    #[test]
    fn ascending_by_level_then_insertion() {
        let mut b = RenderBuckets::default();
        b.place(id(0), 2);
        b.place(id(1), 1);
        b.place(id(2), 2);
        let order: Vec<_> = b.iter().map(|(_, c)| c).collect();
        assert_eq!(order, [id(1), id(0), id(2)]);
        assert_eq!(b.order_of(id(2)), Some((2, 1)));
    }

    #[test]
    fn level_change_relocates() {
        let mut b = RenderBuckets::default();
        assert_eq!(b.place(id(0), 1), Placement::Inserted);
        assert_eq!(b.place(id(0), 1), Placement::Unchanged);
        assert_eq!(b.place(id(0), 3), Placement::Moved(1));
        assert_eq!(b.len(), 1);
        assert_eq!(b.iter().collect::<Vec<_>>(), [(3, id(0))]);
        assert_eq!(b.level_of(id(0)), Some(3));
    }

    #[test]
    fn remove() {
        let mut b = RenderBuckets::default();
        b.place(id(0), 1);
        assert!(b.remove(id(0)));
        assert!(!b.remove(id(0)));
        assert!(!b.contains(id(0)));
        assert_eq!(b.iter().count(), 0);
    }
}
