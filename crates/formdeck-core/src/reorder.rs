//! Drag-to-reorder bridge.
//!
//! The presentation layer only lets the user drag visible instances, so a
//! drag gesture is reported against the visible order. These helpers map it
//! back onto the full document order.

use crate::instance::{Instance, InstanceId};
use serde::{Deserialize, Serialize};

/// End of a drag gesture: the dragged instance and the one it was dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    pub active: InstanceId,
    /// `None` when the drop was cancelled or landed outside the list.
    pub over: Option<InstanceId>,
}

impl DragEnd {
    pub fn new(active: InstanceId, over: Option<InstanceId>) -> Self {
        Self { active, over }
    }
}

/// Position of a draggable (non-hidden) instance in the full list.
fn draggable_index(instances: &[Instance], id: &InstanceId) -> Option<usize> {
    instances
        .iter()
        .position(|inst| inst.id() == id)
        .filter(|&idx| !instances[idx].is_hidden)
}

/// Resolve a drag gesture to `(source, target)` indices in the full list.
///
/// Returns `None` for a cancelled drop, a drop onto itself, or ids that are
/// missing or hidden.
pub fn resolve_drag(instances: &[Instance], drag: &DragEnd) -> Option<(usize, usize)> {
    let over = drag.over.as_ref()?;
    if *over == drag.active {
        return None;
    }
    let source = draggable_index(instances, &drag.active)?;
    let target = draggable_index(instances, over)?;
    Some((source, target))
}

/// Map a position in the visible list to its position in the full list.
pub fn visible_to_full(instances: &[Instance], visible_index: usize) -> Option<usize> {
    instances
        .iter()
        .enumerate()
        .filter(|(_, inst)| !inst.is_hidden)
        .nth(visible_index)
        .map(|(idx, _)| idx)
}

/// Resolve a move between two visible positions to full-list indices.
pub fn resolve_visible_move(
    instances: &[Instance],
    from_visible: usize,
    to_visible: usize,
) -> Option<(usize, usize)> {
    if from_visible == to_visible {
        return None;
    }
    Some((
        visible_to_full(instances, from_visible)?,
        visible_to_full(instances, to_visible)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Props;

    fn list(hidden: &[bool]) -> Vec<Instance> {
        hidden
            .iter()
            .map(|&h| {
                let mut inst = Instance::new("questionInput", "Input", Props::new());
                inst.is_hidden = h;
                inst
            })
            .collect()
    }

    #[test]
    fn test_resolve_drag_skips_hidden_positions() {
        // [A, (B hidden), C, D]: dragging D onto C is full-list 3 -> 2
        let items = list(&[false, true, false, false]);
        let drag = DragEnd::new(items[3].id().clone(), Some(items[2].id().clone()));
        assert_eq!(resolve_drag(&items, &drag), Some((3, 2)));

        let drag = DragEnd::new(items[0].id().clone(), Some(items[3].id().clone()));
        assert_eq!(resolve_drag(&items, &drag), Some((0, 3)));
    }

    #[test]
    fn test_resolve_drag_noops() {
        let items = list(&[false, true, false]);
        let a = items[0].id().clone();

        assert_eq!(resolve_drag(&items, &DragEnd::new(a.clone(), None)), None);
        assert_eq!(resolve_drag(&items, &DragEnd::new(a.clone(), Some(a.clone()))), None);
        // Hidden instances are not drop targets
        let hidden = items[1].id().clone();
        assert_eq!(resolve_drag(&items, &DragEnd::new(a.clone(), Some(hidden))), None);
        // Unknown id
        let stranger = InstanceId::from("stranger");
        assert_eq!(resolve_drag(&items, &DragEnd::new(stranger, Some(a))), None);
    }

    #[test]
    fn test_visible_to_full() {
        let items = list(&[true, false, true, false]);
        assert_eq!(visible_to_full(&items, 0), Some(1));
        assert_eq!(visible_to_full(&items, 1), Some(3));
        assert_eq!(visible_to_full(&items, 2), None);
        assert_eq!(resolve_visible_move(&items, 1, 0), Some((3, 1)));
        assert_eq!(resolve_visible_move(&items, 1, 1), None);
    }
}
