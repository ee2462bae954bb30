//! Drag-and-drop placement and the drag session state machine.

use std::fmt;
use std::str::FromStr;

use proto_model::{ComponentId, IdSource};
use thiserror::Error;
use tracing::debug;

use crate::editor::TreeEditor;
use crate::error::{Result, TreeError};
use crate::forest::ComponentTree;

/// Where a dragged node lands relative to the hovered target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropPlacement {
    Before,
    After,
    Inside,
}

impl DropPlacement {
    /// Placement from the pointer's vertical offset within the target row.
    ///
    /// Targets that accept children use three bands: the top quarter is
    /// before, the bottom quarter is after and the middle half is inside.
    /// Leaves split in half.
    pub fn from_pointer(relative_y: f64, height: f64, accepts_children: bool) -> Self {
        let fraction = if height > 0.0 && relative_y.is_finite() {
            (relative_y / height).clamp(0.0, 1.0)
        } else {
            0.5
        };
        if accepts_children {
            if fraction < 0.25 {
                Self::Before
            } else if fraction > 0.75 {
                Self::After
            } else {
                Self::Inside
            }
        } else if fraction < 0.5 {
            Self::Before
        } else {
            Self::After
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Inside => "inside",
        }
    }
}

impl fmt::Display for DropPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown drop placement '{0}' (expected before, after or inside)")]
pub struct UnknownPlacement(String);

impl FromStr for DropPlacement {
    type Err = UnknownPlacement;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "inside" | "into" => Ok(Self::Inside),
            other => Err(UnknownPlacement(other.to_string())),
        }
    }
}

/// The current drop candidate of a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub target: ComponentId,
    pub placement: DropPlacement,
}

/// One drag gesture, from pick-up to drop or cancel.
///
/// Hover updates only record a candidate; the tree changes once, on
/// [`DragSession::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    dragged: ComponentId,
    candidate: Option<DropTarget>,
}

impl DragSession {
    pub fn start(dragged: ComponentId) -> Self {
        debug!(%dragged, "drag started");
        Self {
            dragged,
            candidate: None,
        }
    }

    pub fn dragged(&self) -> &ComponentId {
        &self.dragged
    }

    pub fn candidate(&self) -> Option<&DropTarget> {
        self.candidate.as_ref()
    }

    /// Record `target` as the drop candidate.
    ///
    /// Hovering the dragged node itself is ignored. Returns whether the
    /// candidate changed.
    pub fn hover(&mut self, target: ComponentId, placement: DropPlacement) -> bool {
        if target == self.dragged {
            return false;
        }
        let next = DropTarget { target, placement };
        if self.candidate.as_ref() == Some(&next) {
            return false;
        }
        self.candidate = Some(next);
        true
    }

    /// Like [`hover`](Self::hover), deriving the placement from the pointer.
    ///
    /// `Ok(false)` means the hover was ignored or changed nothing.
    ///
    /// # Errors
    ///
    /// Fails if `target` is not in the tree or its type is unregistered.
    pub fn hover_at<I: IdSource>(
        &mut self,
        editor: &TreeEditor<'_, I>,
        tree: &ComponentTree,
        target: &ComponentId,
        relative_y: f64,
        height: f64,
    ) -> Result<bool> {
        let node = tree
            .find(target)
            .ok_or_else(|| TreeError::NotFound(target.clone()))?;
        let definition = editor
            .registry()
            .lookup(&node.type_name)
            .ok_or_else(|| TreeError::UnknownType(node.type_name.clone()))?;
        let placement = DropPlacement::from_pointer(relative_y, height, definition.accepts_children);
        Ok(self.hover(target.clone(), placement))
    }

    /// The pointer left `target`; drop the candidate if it was that node.
    pub fn leave(&mut self, target: &ComponentId) {
        if self
            .candidate
            .as_ref()
            .is_some_and(|candidate| &candidate.target == target)
        {
            self.candidate = None;
        }
    }

    /// Abandon the drag. The tree was never touched.
    pub fn cancel(self) {
        debug!(dragged = %self.dragged, "drag cancelled");
    }

    /// Drop on the current candidate.
    ///
    /// Returns `Ok(false)` when there is no candidate. A rejected move
    /// leaves the tree unchanged.
    pub fn commit<I: IdSource>(self, editor: &TreeEditor<'_, I>, tree: &mut ComponentTree) -> Result<bool> {
        let Some(candidate) = self.candidate else {
            debug!(dragged = %self.dragged, "drag ended without a target");
            return Ok(false);
        };
        editor.move_node(tree, &self.dragged, &candidate.target, candidate.placement)?;
        Ok(true)
    }
}
