//! Questionnaire document and its edit operations.
//!
//! A [`Document`] is the ordered list of placed widgets, the selection
//! pointer and a one-slot clipboard. Every operation is total: an id that
//! does not resolve is a silent no-op, since such calls usually come from a
//! stale UI handler racing a deletion.

use crate::instance::{Instance, InstanceId, Props};
use crate::reorder::{self, DragEnd};
use crate::widgets::WidgetRegistry;
use serde::{Deserialize, Serialize};

/// Direction for keyboard selection moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Previous,
    Next,
}

/// An edit applied to the document.
///
/// This is the unit the history records and the command surface emits.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// Create an instance of a widget type and insert it.
    Add { kind: String },
    DeleteSelected,
    SetVisibility { id: InstanceId, hidden: bool },
    ToggleLock { id: InstanceId },
    Rename { id: InstanceId, title: String },
    SetProps { id: InstanceId, props: Props },
    /// `None` clears the selection.
    Select { id: Option<InstanceId> },
    SelectAdjacent(Direction),
    CopySelected,
    Paste,
    Reorder { source: usize, target: usize },
    Drag(DragEnd),
    /// Full replace. A `None` clipboard keeps the current one.
    ReplaceAll {
        instances: Vec<Instance>,
        selected_id: Option<InstanceId>,
        clipboard: Option<Instance>,
    },
}

impl EditAction {
    /// Whether this action only moves the selection pointer.
    pub fn is_selection_only(&self) -> bool {
        matches!(self, Self::Select { .. } | Self::SelectAdjacent(_))
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::DeleteSelected => "delete",
            Self::SetVisibility { .. } => "set visibility",
            Self::ToggleLock { .. } => "toggle lock",
            Self::Rename { .. } => "rename",
            Self::SetProps { .. } => "set props",
            Self::Select { .. } => "select",
            Self::SelectAdjacent(_) => "select adjacent",
            Self::CopySelected => "copy",
            Self::Paste => "paste",
            Self::Reorder { .. } | Self::Drag(_) => "reorder",
            Self::ReplaceAll { .. } => "replace all",
        }
    }
}

/// Choose the new selection after `removed` leaves `ids`.
///
/// `ids` is the list before removal. Fewer than two survivors clears the
/// selection; removing the last element selects its predecessor; anything
/// else selects the successor.
fn next_selection(ids: &[&InstanceId], removed: &InstanceId) -> Option<InstanceId> {
    let index = ids.iter().position(|&id| id == removed)?;
    if ids.len() - 1 <= 1 {
        return None;
    }
    let next = if index + 1 == ids.len() {
        ids[index - 1]
    } else {
        ids[index + 1]
    };
    Some(next.clone())
}

/// The questionnaire being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Instances in render order.
    #[serde(rename = "componentList")]
    instances: Vec<Instance>,
    #[serde(rename = "selectedId")]
    selected_id: Option<InstanceId>,
    #[serde(rename = "copiedComponent")]
    clipboard: Option<Instance>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `instances`, with nothing selected.
    pub fn with_instances(instances: Vec<Instance>) -> Self {
        Self {
            instances,
            ..Self::default()
        }
    }

    /// Instances in order.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Instances that are not hidden, in order.
    pub fn visible_instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter().filter(|inst| !inst.is_hidden)
    }

    /// Get an instance by ID.
    pub fn get(&self, id: &InstanceId) -> Option<&Instance> {
        self.instances.iter().find(|inst| inst.id() == id)
    }

    fn get_mut(&mut self, id: &InstanceId) -> Option<&mut Instance> {
        let found = self.instances.iter_mut().find(|inst| inst.id() == id);
        if found.is_none() {
            log::trace!("No instance with id {}", id);
        }
        found
    }

    /// Position of an instance in the full list.
    pub fn index_of(&self, id: &InstanceId) -> Option<usize> {
        self.instances.iter().position(|inst| inst.id() == id)
    }

    /// The selection pointer.
    pub fn selected_id(&self) -> Option<&InstanceId> {
        self.selected_id.as_ref()
    }

    /// The selected instance.
    pub fn selected(&self) -> Option<&Instance> {
        self.selected_id.as_ref().and_then(|id| self.get(id))
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected_id.as_ref().and_then(|id| self.index_of(id))
    }

    /// The clipboard slot.
    pub fn clipboard(&self) -> Option<&Instance> {
        self.clipboard.as_ref()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Get the number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Insert an instance right after the selection, or at the end without one.
    ///
    /// The selection does not move.
    pub fn add_instance(&mut self, instance: Instance) -> InstanceId {
        let id = instance.id().clone();
        match self.selected_index() {
            Some(idx) => self.instances.insert(idx + 1, instance),
            None => self.instances.push(instance),
        }
        id
    }

    /// Remove the selected instance and move the selection to a neighbour.
    pub fn delete_selected(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };
        let ids: Vec<&InstanceId> = self.instances.iter().map(Instance::id).collect();
        let next = next_selection(&ids, ids[index]);
        self.selected_id = next;
        self.instances.remove(index);
    }

    /// Hide or show an instance.
    ///
    /// Hiding the selected instance moves the selection to a visible
    /// neighbour; showing an instance selects it.
    pub fn set_visibility(&mut self, id: &InstanceId, hidden: bool) {
        let Some(index) = self.index_of(id) else {
            log::trace!("No instance with id {}", id);
            return;
        };

        if hidden {
            if self.selected_id.as_ref() == Some(id) {
                let visible: Vec<&InstanceId> = self.visible_instances().map(Instance::id).collect();
                let next = next_selection(&visible, id);
                self.selected_id = next;
            }
        } else {
            self.selected_id = Some(id.clone());
        }
        self.instances[index].is_hidden = hidden;
    }

    /// Flip the lock flag of an instance.
    pub fn toggle_lock(&mut self, id: &InstanceId) {
        if let Some(inst) = self.get_mut(id) {
            inst.is_locked = !inst.is_locked;
        }
    }

    /// Rename an instance. Blank titles are ignored.
    pub fn rename(&mut self, id: &InstanceId, title: &str) {
        if title.trim().is_empty() {
            return;
        }
        if let Some(inst) = self.get_mut(id) {
            inst.title = title.to_string();
        }
    }

    /// Shallow-merge props into an instance.
    pub fn set_props(&mut self, id: &InstanceId, props: Props) {
        if let Some(inst) = self.get_mut(id) {
            inst.merge_props(props);
        }
    }

    /// Change the selection. `None` clears it; unknown ids are ignored.
    pub fn select(&mut self, id: Option<InstanceId>) {
        match id {
            None => self.selected_id = None,
            Some(id) if self.index_of(&id).is_some() => self.selected_id = Some(id),
            Some(id) => log::trace!("No instance with id {}", id),
        }
    }

    /// Move the selection one step in full-list order.
    pub fn select_adjacent(&mut self, direction: Direction) {
        let Some(index) = self.selected_index() else {
            return;
        };
        let target = match direction {
            Direction::Previous => index.checked_sub(1),
            Direction::Next => Some(index + 1).filter(|&i| i < self.instances.len()),
        };
        if let Some(target) = target {
            self.selected_id = Some(self.instances[target].id().clone());
        }
    }

    /// Copy the selected instance into the clipboard.
    pub fn copy_selected(&mut self) {
        if let Some(inst) = self.selected().cloned() {
            self.clipboard = Some(inst);
        }
    }

    /// Insert a copy of the clipboard with a fresh ID.
    ///
    /// The clipboard keeps its content, so pasting again yields another copy.
    pub fn paste(&mut self) -> Option<InstanceId> {
        let mut inst = self.clipboard.clone()?;
        inst.regenerate_id();
        Some(self.add_instance(inst))
    }

    /// Move the instance at `source` so it ends up at `target`.
    pub fn reorder(&mut self, source: usize, target: usize) {
        let len = self.instances.len();
        if source == target || source >= len || target >= len {
            return;
        }
        let inst = self.instances.remove(source);
        self.instances.insert(target, inst);
    }

    /// Apply a drag gesture made over the visible list.
    pub fn reorder_by_drag(&mut self, drag: &DragEnd) {
        if let Some((source, target)) = reorder::resolve_drag(&self.instances, drag) {
            self.reorder(source, target);
        }
    }

    /// Replace the whole instance list.
    ///
    /// A selection that does not resolve in the new list is dropped.
    pub fn replace_all(&mut self, instances: Vec<Instance>, selected_id: Option<InstanceId>) {
        self.instances = instances;
        self.selected_id = selected_id.filter(|id| self.index_of(id).is_some());
    }

    /// Replace the clipboard slot.
    pub fn set_clipboard(&mut self, clipboard: Option<Instance>) {
        self.clipboard = clipboard;
    }

    /// Apply an edit action.
    pub fn apply(&mut self, action: EditAction, registry: &WidgetRegistry) {
        match action {
            EditAction::Add { kind } => match registry.create_instance(&kind) {
                Some(inst) => {
                    self.add_instance(inst);
                }
                None => log::warn!("Cannot add unknown widget type '{}'", kind),
            },
            EditAction::DeleteSelected => self.delete_selected(),
            EditAction::SetVisibility { id, hidden } => self.set_visibility(&id, hidden),
            EditAction::ToggleLock { id } => self.toggle_lock(&id),
            EditAction::Rename { id, title } => self.rename(&id, &title),
            EditAction::SetProps { id, props } => self.set_props(&id, props),
            EditAction::Select { id } => self.select(id),
            EditAction::SelectAdjacent(direction) => self.select_adjacent(direction),
            EditAction::CopySelected => self.copy_selected(),
            EditAction::Paste => {
                self.paste();
            }
            EditAction::Reorder { source, target } => self.reorder(source, target),
            EditAction::Drag(drag) => self.reorder_by_drag(&drag),
            EditAction::ReplaceAll {
                instances,
                selected_id,
                clipboard,
            } => {
                self.replace_all(instances, selected_id);
                if clipboard.is_some() {
                    self.clipboard = clipboard;
                }
            }
        }
    }
}
