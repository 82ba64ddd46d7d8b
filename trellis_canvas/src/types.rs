// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the control tree: identifiers, flags, attachment and container kinds.

use serde::Deserialize;

/// Identifier for a control on a canvas (generational).
///
/// Identifiers stay valid until the control is destroyed; afterwards every canvas
/// operation treats them as unknown, even if the slot has been reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub(crate) u32, pub(crate) u32);

impl ControlId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-control state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ControlFlags: u8 {
        /// A resize is in progress; nested bounds changes skip the resize hook.
        const RESIZING           = 0b0000_0001;
        /// The control takes part in hit testing and input dispatch.
        const ENABLED            = 0b0000_0010;
        /// The control accepts input while enabled.
        const INPUT_ENABLED      = 0b0000_0100;
        /// The control is drawn (subject to its ancestors being visible).
        const VISIBLE            = 0b0000_1000;
        /// The control wants `on_child_bounds_change` when its children move.
        const CHILD_BOUNDS_AWARE = 0b0001_0000;
        /// The control asked for an extra layout pass in the next update.
        const FORCE_UPDATE       = 0b0010_0000;
    }
}

impl Default for ControlFlags {
    fn default() -> Self {
        Self::ENABLED | Self::INPUT_ENABLED | Self::VISIBLE
    }
}

/// Where a control is attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Link {
    /// Not attached; level 0.
    #[default]
    Detached,
    /// A top-level control of the canvas; level 1.
    Root,
    /// A child of another control; one level deeper than it.
    Child(ControlId),
}

/// How many children a control can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ContainerKind {
    /// No children.
    #[default]
    Leaf,
    /// At most one child; adding another replaces it.
    Single,
    /// An ordered list of children.
    List,
}

impl ContainerKind {
    /// Whether children can be attached at all.
    pub fn accepts_children(self) -> bool {
        !matches!(self, Self::Leaf)
    }
}

/// What a container does with children that extend past its content area.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Children may draw and be hit outside the container.
    #[default]
    Visible,
    /// Children are clipped to the content area.
    Hidden,
    /// The container grows to enclose its children.
    Expand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags() {
        let f = ControlFlags::default();
        assert!(f.contains(ControlFlags::ENABLED | ControlFlags::INPUT_ENABLED));
        assert!(f.contains(ControlFlags::VISIBLE));
        assert!(!f.contains(ControlFlags::RESIZING));
    }

    #[test]
    fn overflow_names() {
        let o: Overflow = serde_json::from_str("\"hidden\"").unwrap();
        assert_eq!(o, Overflow::Hidden);
        assert!(ContainerKind::List.accepts_children());
        assert!(!ContainerKind::Leaf.accepts_children());
    }
}
