//! Editor session: the registry, the edit history and persistence wiring.
//!
//! One session is one questionnaire open for editing. It is an owned value
//! handed to whatever drives the UI; nothing here is global.

use crate::shortcuts::{CommandSurface, FocusProbe, KeyChord, ShortcutAction};
use formdeck_core::storage::{AutoSaveManager, Storage, StorageResult};
use formdeck_core::transfer::{self, TransferResult};
use formdeck_core::widgets::StatCount;
use formdeck_core::{
    Direction, Document, EditAction, History, HistoryOptions, InstanceId, PageInfo, Questionnaire,
    WidgetRegistry,
};
use uuid::Uuid;

pub struct EditorSession<S: Storage> {
    registry: WidgetRegistry,
    history: History,
    questionnaire_id: String,
    page: PageInfo,
    autosave: Option<AutoSaveManager<S>>,
}

impl<S: Storage> EditorSession<S> {
    /// Start a session on a new, empty questionnaire.
    pub fn new(registry: WidgetRegistry, options: HistoryOptions) -> Self {
        Self {
            registry,
            history: History::with_options(Document::new(), options),
            questionnaire_id: Uuid::new_v4().to_string(),
            page: PageInfo::default(),
            autosave: None,
        }
    }

    /// Persist edits through `manager`.
    pub fn with_autosave(mut self, manager: AutoSaveManager<S>) -> Self {
        self.autosave = Some(manager);
        self
    }

    /// Open a saved questionnaire. The undo trail starts empty.
    pub fn open(&mut self, questionnaire: Questionnaire) {
        log::info!(
            "Opened questionnaire {} ({} components)",
            questionnaire.id,
            questionnaire.components.len()
        );
        self.history.reset(questionnaire.to_document());
        self.questionnaire_id = questionnaire.id;
        self.page = questionnaire.page;
    }

    /// Reopen the questionnaire saved most recently through the autosave
    /// store. Returns false if there is none.
    pub async fn open_last(&mut self) -> bool {
        let last = match &mut self.autosave {
            Some(autosave) => autosave.load_last().await,
            None => None,
        };
        match last {
            Some(questionnaire) => {
                self.open(questionnaire);
                true
            }
            None => false,
        }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        self.history.present()
    }

    pub fn page(&self) -> &PageInfo {
        &self.page
    }

    pub fn set_page(&mut self, page: PageInfo) {
        if page != self.page {
            self.page = page;
            self.mark_dirty();
        }
    }

    /// Snapshot of what the persistence collaborator stores.
    pub fn questionnaire(&self) -> Questionnaire {
        Questionnaire::from_document(self.questionnaire_id.clone(), self.page.clone(), self.document())
    }

    fn mark_dirty(&mut self) {
        if let Some(autosave) = &mut self.autosave {
            autosave.mark_dirty();
        }
    }

    /// Apply an edit. Returns true if the document changed.
    pub fn apply(&mut self, action: EditAction) -> bool {
        let before = self.document().instances().to_vec();
        let changed = self.history.apply(action, &self.registry);
        if changed && before.as_slice() != self.document().instances() {
            self.mark_dirty();
        }
        changed
    }

    pub fn undo(&mut self) -> bool {
        let before = self.document().instances().to_vec();
        let undone = self.history.undo();
        if undone && before.as_slice() != self.document().instances() {
            self.mark_dirty();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let before = self.document().instances().to_vec();
        let redone = self.history.redo();
        if redone && before.as_slice() != self.document().instances() {
            self.mark_dirty();
        }
        redone
    }

    /// Handle a key press from the presentation layer.
    /// Returns true if it changed the document.
    pub fn handle_key(&mut self, chord: &KeyChord, focus: &dyn FocusProbe) -> bool {
        match CommandSurface::dispatch(chord, focus) {
            Some(action) => self.run_shortcut(action),
            None => false,
        }
    }

    /// Run a keyboard command.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::DeleteSelected => self.apply(EditAction::DeleteSelected),
            ShortcutAction::Copy => self.apply(EditAction::CopySelected),
            ShortcutAction::Paste => self.apply(EditAction::Paste),
            ShortcutAction::SelectPrevious => {
                self.apply(EditAction::SelectAdjacent(Direction::Previous))
            }
            ShortcutAction::SelectNext => self.apply(EditAction::SelectAdjacent(Direction::Next)),
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
        }
    }

    /// Replace the document with an exported one. Rejected payloads leave
    /// the document untouched.
    pub fn import_json(&mut self, json: &str) -> TransferResult<()> {
        let payload = match transfer::parse_import(json) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Import rejected: {}", e);
                return Err(e);
            }
        };
        log::info!("Importing {} components", payload.instances.len());
        self.apply(payload.into_action());
        Ok(())
    }

    pub fn export_json(&self) -> TransferResult<String> {
        transfer::export_json(self.document())
    }

    /// File name for a download of the current document.
    pub fn export_file_name(&self) -> String {
        transfer::export_file_name(&self.page.title)
    }

    /// Plain-text preview of every visible widget, in order.
    ///
    /// Widgets whose type is no longer registered render nothing.
    pub fn render_preview(&self) -> Vec<String> {
        self.document()
            .visible_instances()
            .filter_map(|inst| self.registry.render(inst))
            .collect()
    }

    /// Summarize answers for one widget, if its type supports statistics.
    pub fn statistics(&self, id: &InstanceId, answers: &[String]) -> Option<Vec<StatCount>> {
        let inst = self.document().get(id)?;
        let stats = self.registry.lookup(&inst.kind)?.statistics()?;
        Some(stats.summarize(inst, answers))
    }

    /// Save if the quiet period after the last edit has passed.
    pub async fn autosave_if_due(&mut self) -> StorageResult<bool> {
        let questionnaire = self.questionnaire();
        match &mut self.autosave {
            Some(autosave) => autosave.maybe_save(&questionnaire).await,
            None => Ok(false),
        }
    }

    /// Save pending edits now.
    pub async fn flush(&mut self) -> StorageResult<bool> {
        let questionnaire = self.questionnaire();
        match &mut self.autosave {
            Some(autosave) if autosave.is_dirty() => {
                autosave.save(&questionnaire).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::FocusTarget;
    use formdeck_core::MemoryStorage;
    use std::sync::Arc;
    use std::time::Duration;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        pollster::block_on(f)
    }

    fn session() -> EditorSession<MemoryStorage> {
        EditorSession::new(WidgetRegistry::builtin(), HistoryOptions::default())
    }

    fn with_widgets(kinds: &[&str]) -> EditorSession<MemoryStorage> {
        let mut s = session();
        for kind in kinds {
            s.apply(EditAction::Add { kind: kind.to_string() });
        }
        s
    }

    #[test]
    fn test_keyboard_copy_paste_delete() {
        let mut s = with_widgets(&["questionTitle", "questionInput"]);
        let title = s.document().instances()[0].id().clone();
        s.apply(EditAction::Select { id: Some(title.clone()) });

        let body = FocusTarget::Body;
        assert!(s.handle_key(&KeyChord::ctrl("c"), &body));
        assert!(s.handle_key(&KeyChord::ctrl("v"), &body));
        assert_eq!(s.document().len(), 3);

        assert!(s.handle_key(&KeyChord::plain("ArrowDown"), &body));
        assert_ne!(s.document().selected_id(), Some(&title));
        assert!(s.handle_key(&KeyChord::plain("Delete"), &body));
        assert_eq!(s.document().len(), 2);

        assert!(s.handle_key(&KeyChord::ctrl("z"), &body));
        assert_eq!(s.document().len(), 3);
    }

    #[test]
    fn test_typing_in_text_field_is_not_hijacked() {
        let mut s = with_widgets(&["questionInput"]);
        let id = s.document().instances()[0].id().clone();
        s.apply(EditAction::Select { id: Some(id) });

        assert!(!s.handle_key(&KeyChord::plain("Backspace"), &FocusTarget::TextInput));
        assert_eq!(s.document().len(), 1);
    }

    #[test]
    fn test_import_rejection_keeps_document() {
        let mut s = with_widgets(&["questionInput"]);
        let before = s.document().clone();
        assert!(s.import_json(r#"{ "componentList": 3 }"#).is_err());
        assert_eq!(s.document(), &before);
    }

    #[test]
    fn test_import_export_between_sessions() {
        let a = with_widgets(&["questionInfo", "questionCheckbox"]);
        let mut b = session();
        b.import_json(&a.export_json().unwrap()).unwrap();
        assert_eq!(b.document(), a.document());
    }

    #[test]
    fn test_preview_skips_hidden_and_unknown() {
        let mut s = with_widgets(&["questionTitle", "questionParagraph"]);
        let paragraph = s.document().instances()[1].id().clone();
        s.apply(EditAction::SetVisibility { id: paragraph, hidden: true });

        let orphan = formdeck_core::Instance::new("questionRetired", "Old", Default::default());
        let mut instances = s.document().instances().to_vec();
        instances.push(orphan);
        s.apply(EditAction::ReplaceAll {
            instances,
            selected_id: None,
            clipboard: None,
        });

        assert_eq!(s.render_preview(), vec!["# Title".to_string()]);
    }

    #[test]
    fn test_statistics_only_for_choice_widgets() {
        let s = with_widgets(&["questionRadio", "questionInput"]);
        let radio = s.document().instances()[0].id();
        let input = s.document().instances()[1].id();
        let answers = vec!["item2".to_string()];

        let stats = s.statistics(radio, &answers).unwrap();
        assert_eq!(stats[1].count, 1);
        assert!(s.statistics(input, &answers).is_none());
        assert!(s.statistics(&InstanceId::from("missing"), &answers).is_none());
    }

    #[test]
    fn test_edits_trigger_autosave() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());
        manager.set_delay(Duration::ZERO);
        let mut s = session().with_autosave(manager);

        assert!(!block_on(s.autosave_if_due()).unwrap());
        s.apply(EditAction::Add { kind: "questionInput".into() });
        assert!(block_on(s.autosave_if_due()).unwrap());

        let saved = block_on(storage.load(&s.questionnaire().id)).unwrap();
        assert_eq!(saved.components, s.document().instances());
    }

    #[test]
    fn test_selection_alone_does_not_dirty() {
        let storage = Arc::new(MemoryStorage::new());
        let mut s = with_widgets(&["questionInput"]).with_autosave(AutoSaveManager::new(storage));
        let id = s.document().instances()[0].id().clone();

        s.apply(EditAction::Select { id: Some(id.clone()) });
        assert!(!block_on(s.flush()).unwrap());

        s.apply(EditAction::ToggleLock { id });
        assert!(block_on(s.flush()).unwrap());
    }

    #[test]
    fn test_undoing_selection_does_not_dirty() {
        let storage = Arc::new(MemoryStorage::new());
        let mut s = with_widgets(&["questionInput", "questionTitle"]);
        let id = s.document().instances()[0].id().clone();
        s.apply(EditAction::Select { id: Some(id) });
        s.apply(EditAction::SelectAdjacent(Direction::Next));
        let mut s = s.with_autosave(AutoSaveManager::new(storage));

        assert!(s.undo());
        assert!(s.redo());
        assert!(!block_on(s.flush()).unwrap());

        s.apply(EditAction::DeleteSelected);
        assert!(block_on(s.flush()).unwrap());
        assert!(s.undo());
        assert!(block_on(s.flush()).unwrap());
    }

    #[test]
    fn test_open_last_saved() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());
        manager.set_delay(Duration::ZERO);
        let mut first = session().with_autosave(manager);
        first.apply(EditAction::Add { kind: "questionRadio".into() });
        assert!(block_on(first.flush()).unwrap());

        let mut second = session().with_autosave(AutoSaveManager::new(storage));
        assert!(block_on(second.open_last()));
        assert_eq!(second.document().instances(), first.document().instances());
        assert_eq!(second.questionnaire().id, first.questionnaire().id);
        assert!(!second.history().can_undo());

        let mut empty = session().with_autosave(AutoSaveManager::new(Arc::new(MemoryStorage::new())));
        assert!(!block_on(empty.open_last()));
    }

    #[test]
    fn test_open_resets_history() {
        let mut s = with_widgets(&["questionInput"]);
        let mut q = Questionnaire::new();
        q.page.title = "Onboarding".to_string();
        s.open(q);

        assert!(s.document().is_empty());
        assert!(!s.history().can_undo());
        assert_eq!(s.export_file_name(), "Onboarding.json");
    }
}
