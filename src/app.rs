//! Main application state and UI coordination

use std::path::Path;

use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::edit::{Edit, PhotoSlot};
use crate::core::image::{ImageLoader, IMAGE_EXTENSIONS};
use crate::core::journal::{Journal, JournalConfig, PageType};
use crate::core::storage::{self, FileStore, JournalStore, KeyValueStore, EXPORT_FILE_NAME};
use crate::ui::builder::BuilderPanel;
use crate::ui::collage::{CollagePanel, CollageState};
use crate::ui::map_page::MapPagePanel;
use crate::ui::photo::PhotoCache;
use crate::ui::toolbar::ToolbarPanel;
use crate::ui::PageResponse;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Builder,
    Editor,
}

/// How pages are presented in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Edit,
    /// Read-only presentation
    Render,
}

/// Editor shortcuts pressed this frame
#[derive(Debug, Clone, Copy, Default)]
struct Shortcuts {
    toggle_mode: bool,
    previous_page: bool,
    next_page: bool,
}

/// Main application state
pub struct TravelJournalApp<S = FileStore> {
    /// The current journal snapshot (empty until built or restored)
    pub journal: Journal,
    /// Builder form contents
    pub draft: JournalConfig,
    /// Current screen
    pub screen: Screen,
    /// Current view mode
    pub view_mode: ViewMode,
    /// Index of the page being shown
    pub current_page: usize,
    /// Where the journal is saved
    pub store: JournalStore<S>,
    /// Application configuration
    pub config: AppConfig,
    /// Background photo reads, absent if the runtime failed to start
    pub images: Option<ImageLoader>,
    /// Decoded photo bytes
    pub photo_cache: PhotoCache,
    /// Collage drag state
    pub collage: CollageState,
    /// Message shown in a blocking dialog
    pub alert: Option<String>,
}

impl TravelJournalApp<FileStore> {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        // Load config or use defaults
        let config = AppConfig::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {:#}", e);
            AppConfig::default()
        });
        cc.egui_ctx.set_visuals(if config.is_dark() {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        let ctx = cc.egui_ctx.clone();
        let images = match ImageLoader::new() {
            Ok(loader) => Some(loader.with_notify(move || ctx.request_repaint())),
            Err(e) => {
                tracing::error!("Photo uploads disabled: {:#}", e);
                None
            }
        };

        let store = JournalStore::new(config.journal_store());
        tracing::info!("Journal store: {}", store.inner().dir().display());

        Self::with_store(store, config, images)
    }
}

impl<S: KeyValueStore> TravelJournalApp<S> {
    /// Assemble the application around a store, restoring any saved journal
    pub fn with_store(store: JournalStore<S>, config: AppConfig, images: Option<ImageLoader>) -> Self {
        let view_mode = if config.ui.start_in_render_mode {
            ViewMode::Render
        } else {
            ViewMode::Edit
        };

        let mut app = Self {
            journal: Journal::default(),
            draft: JournalConfig::default(),
            screen: Screen::Builder,
            view_mode,
            current_page: 0,
            store,
            config,
            images,
            photo_cache: PhotoCache::default(),
            collage: CollageState::default(),
            alert: None,
        };

        // A saved document without pages has nothing to edit
        if let Some(journal) = app.store.load().filter(|j| !j.is_empty()) {
            app.draft = journal.config.clone();
            app.journal = journal;
            app.screen = Screen::Editor;
        }
        app
    }

    /// Build a fresh journal from the builder form, replacing the current one
    pub fn build_journal(&mut self) {
        let journal = Journal::build_now(&self.draft);
        tracing::info!(
            "Built journal \"{}\" with {} pages",
            journal.config.title,
            journal.pages.len()
        );
        self.replace_journal(journal);
    }

    /// Swap in a whole new document and show its first page
    pub fn replace_journal(&mut self, journal: Journal) {
        self.journal = journal;
        self.current_page = 0;
        self.collage.reset();
        self.photo_cache.clear();
        self.show_editor();
        self.persist();
    }

    /// Apply a batch of edits, then save once
    pub fn apply_edits(&mut self, edits: Vec<Edit>) {
        let mut changed = false;
        for edit in &edits {
            match self.journal.apply(edit) {
                Ok(next) => {
                    self.journal = next;
                    changed = true;
                }
                Err(e) => tracing::warn!("Dropped edit {:?}: {}", edit, e),
            }
        }
        if changed {
            self.persist();
        }
    }

    /// Apply what a page layout produced this frame
    pub fn handle_page_response(&mut self, response: PageResponse) {
        self.apply_edits(response.edits);
        for slot in response.image_requests {
            self.pick_photo(slot);
        }
    }

    /// Save the current journal
    pub fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.journal) {
            tracing::error!("Failed to save journal: {:#}", e);
        }
    }

    pub fn show_builder(&mut self) {
        if !self.journal.is_empty() {
            self.draft = self.journal.config.clone();
        }
        self.collage.reset();
        self.screen = Screen::Builder;
    }

    pub fn show_editor(&mut self) {
        if !self.journal.is_empty() {
            self.screen = Screen::Editor;
        }
    }

    pub fn toggle_view_mode(&mut self) {
        self.collage.reset();
        self.view_mode = match self.view_mode {
            ViewMode::Edit => ViewMode::Render,
            ViewMode::Render => ViewMode::Edit,
        };
    }

    /// Move the page cursor, clamped to the journal
    pub fn go_to_page(&mut self, index: usize) {
        let last = self.journal.pages.len().saturating_sub(1);
        let index = index.min(last);
        if index != self.current_page {
            self.collage.reset();
            self.current_page = index;
        }
    }

    /// Apply photos whose file reads finished
    pub fn poll_images(&mut self) {
        let Some(images) = self.images.as_mut() else {
            return;
        };
        let edits: Vec<Edit> = images.poll().into_iter().map(|loaded| loaded.into_edit()).collect();
        if !edits.is_empty() {
            self.apply_edits(edits);
        }
    }

    /// Ask for an image file and start reading it into `slot`
    pub fn pick_photo(&mut self, slot: PhotoSlot) {
        let mut dialog = rfd::FileDialog::new().add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = &self.config.last_dialog_dir {
            dialog = dialog.set_directory(dir);
        }
        // Cancelling the dialog leaves the photo as it is
        let Some(path) = dialog.pick_file() else {
            return;
        };
        self.config.remember_dialog_path(&path);

        match &self.images {
            Some(images) => images.request(slot, path),
            None => tracing::error!("Cannot read {}: photo reader unavailable", path.display()),
        }
    }

    /// Write the journal to a JSON file chosen by the user
    pub fn export_journal(&mut self) {
        if self.journal.is_empty() {
            return;
        }
        let mut dialog = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(EXPORT_FILE_NAME);
        if let Some(dir) = &self.config.last_dialog_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };
        self.config.remember_dialog_path(&path);

        if let Err(e) = storage::export_to_file(&self.journal, &path) {
            tracing::error!("Failed to export journal: {:#}", e);
            self.alert = Some(format!("Could not export the journal: {}", e));
        }
    }

    /// Replace the journal with one read from a JSON file chosen by the user
    pub fn import_journal(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("JSON", &["json"]);
        if let Some(dir) = &self.config.last_dialog_dir {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        self.config.remember_dialog_path(&path);
        self.import_from_path(&path);
    }

    /// Replace the journal with the document at `path`, or raise an alert
    /// and keep the current one
    pub fn import_from_path(&mut self, path: &Path) {
        match storage::import_from_file(path) {
            Ok(journal) => self.replace_journal(journal),
            Err(e) => {
                tracing::warn!("Rejected import {}: {}", path.display(), e);
                self.alert = Some("Invalid JSON file".to_string());
            }
        }
    }

    /// Page layout for the current page
    fn current_page_type(&self) -> Option<PageType> {
        self.journal.page(self.current_page).map(|p| p.page_type)
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.screen != Screen::Editor || self.alert.is_some() {
            return;
        }
        let shortcuts = ctx.input(|i| {
            let command = i.modifiers.command;
            Shortcuts {
                toggle_mode: command && i.key_pressed(egui::Key::R),
                previous_page: command && i.key_pressed(egui::Key::ArrowLeft),
                next_page: command && i.key_pressed(egui::Key::ArrowRight),
            }
        });
        self.apply_shortcuts(shortcuts, ctx.wants_keyboard_input());
    }

    /// Act on pressed shortcuts. While a text field has focus the arrow
    /// keys belong to the cursor, so page changes are skipped.
    fn apply_shortcuts(&mut self, shortcuts: Shortcuts, typing: bool) {
        if shortcuts.toggle_mode {
            self.toggle_view_mode();
        }
        if typing {
            return;
        }
        if shortcuts.previous_page {
            self.go_to_page(self.current_page.saturating_sub(1));
        }
        if shortcuts.next_page {
            self.go_to_page(self.current_page + 1);
        }
    }

    /// Blocking message dialog
    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };

        let modal = egui::Modal::new(egui::Id::new("alert")).show(ctx, |ui| {
            ui.set_width(280.0);
            ui.heading("Travel Journal");
            ui.add_space(8.0);
            ui.label(message);
            ui.add_space(12.0);
            ui.vertical_centered(|ui| ui.button("OK").clicked()).inner
        });

        if modal.inner || modal.should_close() {
            self.alert = None;
        }
    }

    fn render_editor(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ToolbarPanel::show(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("page_scroll")
                .show(ui, |ui| match self.current_page_type() {
                    Some(PageType::Collage) => CollagePanel::show(ui, self),
                    Some(PageType::Map) => MapPagePanel::show(ui, self),
                    None => {
                        ui.label("This journal has no pages.");
                    }
                });
        });
    }
}

impl<S: KeyValueStore> eframe::App for TravelJournalApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_images();
        self.handle_shortcuts(ctx);

        match self.screen {
            Screen::Builder => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    BuilderPanel::show(ui, self);
                });
            }
            Screen::Editor => self.render_editor(ctx),
        }

        self.show_alert(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{MemoryStore, STORAGE_KEY};

    fn app() -> TravelJournalApp<MemoryStore> {
        TravelJournalApp::with_store(
            JournalStore::new(MemoryStore::default()),
            AppConfig::default(),
            None,
        )
    }

    #[test]
    fn test_starts_on_builder_without_save() {
        let app = app();
        assert_eq!(app.screen, Screen::Builder);
        assert!(app.journal.is_empty());
    }

    #[test]
    fn test_build_then_restore() {
        let mut first = app();
        first.draft.page_count = 4;
        first.build_journal();
        assert_eq!(first.screen, Screen::Editor);
        assert_eq!(first.journal.pages.len(), 4);

        first.apply_edits(vec![Edit::SetNarrative {
            page: 2,
            text: "Kilimanjaro".to_string(),
        }]);

        let store = JournalStore::new(first.store.inner().clone());
        let restored = TravelJournalApp::with_store(store, AppConfig::default(), None);
        assert_eq!(restored.screen, Screen::Editor);
        assert_eq!(restored.journal, first.journal);
        assert_eq!(restored.draft, first.journal.config);
    }

    #[test]
    fn test_stale_edit_is_dropped() {
        let mut app = app();
        app.build_journal();
        let before = app.journal.clone();
        app.apply_edits(vec![Edit::SetPhotoCaption {
            slot: PhotoSlot { page: 99, photo: 0 },
            caption: "late".to_string(),
        }]);
        assert_eq!(app.journal, before);
    }

    #[test]
    fn test_page_cursor_is_clamped() {
        let mut app = app();
        app.draft.page_count = 2;
        app.build_journal();
        app.go_to_page(7);
        assert_eq!(app.current_page, 1);
        app.go_to_page(0);
        assert_eq!(app.current_page, 0);
    }

    #[test]
    fn test_replace_resets_cursor() {
        let mut app = app();
        app.draft.page_count = 3;
        app.build_journal();
        app.go_to_page(2);

        let mut other = app.journal.clone();
        other.config.title = "Imported".to_string();
        app.show_builder();
        app.replace_journal(other);
        assert_eq!(app.current_page, 0);
        assert_eq!(app.screen, Screen::Editor);
        assert_eq!(app.store.load().unwrap().config.title, "Imported");
    }

    #[test]
    fn test_rejected_import_keeps_journal() {
        let mut app = app();
        app.draft.page_count = 3;
        app.build_journal();
        app.go_to_page(1);
        let before = app.journal.clone();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"pages": []}"#).unwrap();
        app.import_from_path(&path);

        assert_eq!(app.alert.as_deref(), Some("Invalid JSON file"));
        assert_eq!(app.journal, before);
        assert_eq!(app.current_page, 1);
        assert_eq!(app.screen, Screen::Editor);
        assert_eq!(app.store.load().unwrap(), before);
    }

    #[test]
    fn test_import_from_path_replaces_journal() {
        let mut app = app();
        app.build_journal();
        app.go_to_page(2);

        let mut other = app.journal.clone();
        other.config.title = "Patagonia".to_string();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        storage::export_to_file(&other, &path).unwrap();

        app.import_from_path(&path);
        assert!(app.alert.is_none());
        assert_eq!(app.journal, other);
        assert_eq!(app.current_page, 0);
    }

    #[test]
    fn test_stored_journal_without_pages_is_not_restored() {
        let mut inner = MemoryStore::default();
        let empty = serde_json::json!({
            "pages": [],
            "journalConfig": JournalConfig::default(),
        });
        inner.set(STORAGE_KEY, &empty.to_string()).unwrap();

        let app = TravelJournalApp::with_store(JournalStore::new(inner), AppConfig::default(), None);
        assert_eq!(app.screen, Screen::Builder);
        assert!(app.journal.is_empty());
    }

    #[test]
    fn test_page_shortcuts_skipped_while_typing() {
        let mut app = app();
        app.draft.page_count = 3;
        app.build_journal();
        let next = Shortcuts {
            next_page: true,
            ..Shortcuts::default()
        };

        app.apply_shortcuts(next, true);
        assert_eq!(app.current_page, 0);

        app.apply_shortcuts(next, false);
        assert_eq!(app.current_page, 1);

        let toggle = Shortcuts {
            toggle_mode: true,
            ..Shortcuts::default()
        };
        app.apply_shortcuts(toggle, true);
        assert_eq!(app.view_mode, ViewMode::Render);
    }

    #[test]
    fn test_builder_round_trip_keeps_journal() {
        let mut app = app();
        app.build_journal();
        let built = app.journal.clone();

        app.show_builder();
        app.draft.title = "Changed but not rebuilt".to_string();
        app.show_editor();
        assert_eq!(app.journal, built);
        assert_eq!(app.screen, Screen::Editor);
    }
}
