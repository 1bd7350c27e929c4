//! Keyboard shortcuts and the focus-aware command surface.
//!
//! A key chord only reaches the editor when keyboard focus is not inside an
//! editable control, so typing in a property field never deletes or pastes
//! widgets. The focus target is asked for on every keypress.

/// The element that currently owns keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Nothing in particular is focused.
    Body,
    /// A draggable list row: interactive but not a text control.
    SortableItem,
    TextInput,
    TextArea,
    ContentEditable,
    /// A button mid-interaction.
    Button,
    Other,
}

impl FocusTarget {
    /// Whether global shortcuts may run while this element has focus.
    pub fn accepts_shortcuts(self) -> bool {
        matches!(self, Self::Body | Self::SortableItem)
    }
}

/// Source of the current focus target.
pub trait FocusProbe {
    fn active_target(&self) -> FocusTarget;
}

impl FocusProbe for FocusTarget {
    fn active_target(&self) -> FocusTarget {
        *self
    }
}

/// A key press with its modifiers.
///
/// `key` follows `KeyboardEvent.key` naming (e.g. `"c"`, `"Delete"`,
/// `"ArrowUp"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyChord {
    /// A key without modifiers.
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        }
    }

    /// A key with the platform command modifier (Ctrl).
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    /// Parse a chord such as `"Ctrl+Shift+Z"`, `"Cmd+C"` or `"Delete"`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty())?;
        let mut chord = Self::plain(key);
        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "shift" => chord.shift = true,
                "alt" | "option" => chord.alt = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                _ => return None,
            }
        }
        Some(chord)
    }

    /// Ctrl on most platforms, Cmd on macOS.
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Editor commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    DeleteSelected,
    Copy,
    Paste,
    SelectPrevious,
    SelectNext,
    Undo,
    Redo,
}

/// Maps key chords to shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a chord to an action, or `None` if it has no binding.
    pub fn resolve(chord: &KeyChord) -> Option<ShortcutAction> {
        let key = chord.key.as_str();

        // No binding uses Alt
        if chord.alt {
            return None;
        }

        if chord.command() && chord.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if chord.command() {
            return match key {
                "c" | "C" => Some(ShortcutAction::Copy),
                "v" | "V" => Some(ShortcutAction::Paste),
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if chord.shift {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            "ArrowUp" => Some(ShortcutAction::SelectPrevious),
            "ArrowDown" => Some(ShortcutAction::SelectNext),
            _ => None,
        }
    }
}

/// Dispatches key chords, gated by the current focus target.
pub struct CommandSurface;

impl CommandSurface {
    /// Resolve a key press. Returns `None` if the chord is unbound or focus
    /// is inside an editable control.
    pub fn dispatch(chord: &KeyChord, focus: &dyn FocusProbe) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(chord)?;
        let target = focus.active_target();
        if !target.accepts_shortcuts() {
            log::trace!("Ignoring {:?} while {:?} has focus", action, target);
            return None;
        }
        Some(action)
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, ctrl: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+C").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Delete", false, false, "Delete selected widget"),
            Shortcut::new("Backspace", false, false, "Delete selected widget"),
            Shortcut::new("C", true, false, "Copy selected widget"),
            Shortcut::new("V", true, false, "Paste after selected widget"),
            Shortcut::new("ArrowUp", false, false, "Select previous widget"),
            Shortcut::new("ArrowDown", false, false, "Select next widget"),
            Shortcut::new("Z", true, false, "Undo"),
            Shortcut::new("Z", true, true, "Redo"),
            Shortcut::new("Y", true, false, "Redo"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_resolve_bindings() {
        let cases = [
            ("Delete", Some(ShortcutAction::DeleteSelected)),
            ("Backspace", Some(ShortcutAction::DeleteSelected)),
            ("Ctrl+c", Some(ShortcutAction::Copy)),
            ("Cmd+C", Some(ShortcutAction::Copy)),
            ("Ctrl+v", Some(ShortcutAction::Paste)),
            ("ArrowUp", Some(ShortcutAction::SelectPrevious)),
            ("ArrowDown", Some(ShortcutAction::SelectNext)),
            ("Ctrl+z", Some(ShortcutAction::Undo)),
            ("Ctrl+Shift+z", Some(ShortcutAction::Redo)),
            ("Cmd+y", Some(ShortcutAction::Redo)),
            ("c", None),
            ("Shift+Delete", None),
            ("Ctrl+q", None),
            ("Ctrl+Alt+c", None),
            ("Ctrl+Alt+z", None),
            ("Ctrl+Shift+Alt+z", None),
            ("Cmd+Option+v", None),
            ("Alt+Delete", None),
        ];
        for (text, expected) in cases {
            let chord = KeyChord::parse(text).unwrap();
            assert_eq!(ShortcutMap::resolve(&chord), expected, "{text}");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(KeyChord::parse("").is_none());
        assert!(KeyChord::parse("Ctrl+").is_none());
        assert!(KeyChord::parse("Hyper+c").is_none());
    }

    #[test]
    fn test_focus_guard() {
        let delete = KeyChord::plain("Delete");
        assert_eq!(
            CommandSurface::dispatch(&delete, &FocusTarget::Body),
            Some(ShortcutAction::DeleteSelected)
        );
        assert_eq!(
            CommandSurface::dispatch(&delete, &FocusTarget::SortableItem),
            Some(ShortcutAction::DeleteSelected)
        );
        for target in [
            FocusTarget::TextInput,
            FocusTarget::TextArea,
            FocusTarget::ContentEditable,
            FocusTarget::Button,
            FocusTarget::Other,
        ] {
            assert_eq!(CommandSurface::dispatch(&delete, &target), None, "{target:?}");
        }
    }

    /// Focus that moves between keypresses.
    struct ScriptedFocus {
        targets: Vec<FocusTarget>,
        next: Cell<usize>,
    }

    impl FocusProbe for ScriptedFocus {
        fn active_target(&self) -> FocusTarget {
            let i = self.next.get();
            self.next.set(i + 1);
            self.targets[i]
        }
    }

    #[test]
    fn test_focus_is_checked_on_every_keypress() {
        let focus = ScriptedFocus {
            targets: vec![FocusTarget::Body, FocusTarget::TextInput, FocusTarget::Body],
            next: Cell::new(0),
        };
        let copy = KeyChord::ctrl("c");
        assert_eq!(CommandSurface::dispatch(&copy, &focus), Some(ShortcutAction::Copy));
        assert_eq!(CommandSurface::dispatch(&copy, &focus), None);
        assert_eq!(CommandSurface::dispatch(&copy, &focus), Some(ShortcutAction::Copy));
        assert_eq!(focus.next.get(), 3);
    }

    #[test]
    fn test_unbound_key_does_not_query_focus() {
        let focus = ScriptedFocus {
            targets: vec![],
            next: Cell::new(0),
        };
        assert_eq!(CommandSurface::dispatch(&KeyChord::plain("a"), &focus), None);
    }

    #[test]
    fn test_shortcut_format() {
        let redo = Shortcut::new("Z", true, true, "Redo");
        assert_eq!(redo.format(), "Ctrl+Shift+Z");
        assert!(ShortcutRegistry::all().iter().any(|s| s.description == "Undo"));
    }
}
