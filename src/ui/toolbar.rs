//! Editor toolbar: navigation, mode switch, page type and import/export

use eframe::egui::{self, RichText};

use super::palette;
use crate::app::{TravelJournalApp, ViewMode};
use crate::core::edit::Edit;
use crate::core::journal::PageType;
use crate::core::storage::KeyValueStore;

/// Toolbar shown above the page in the editor
pub struct ToolbarPanel;

impl ToolbarPanel {
    /// Show the toolbar
    pub fn show<S: KeyValueStore>(ui: &mut egui::Ui, app: &mut TravelJournalApp<S>) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("\u{2699} Back to Builder").clicked() {
                app.show_builder();
            }

            let toggle = match app.view_mode {
                ViewMode::Edit => "\u{1F441} Render Mode",
                ViewMode::Render => "\u{270F} Edit Mode",
            };
            if ui.button(toggle).on_hover_text("Ctrl+R").clicked() {
                app.toggle_view_mode();
            }

            ui.separator();
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(&app.journal.config.title)
                        .heading()
                        .color(palette::INK)
                        .strong(),
                );
                ui.label(
                    RichText::new(&app.journal.config.subtitle)
                        .small()
                        .color(palette::INK_SOFT),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Import").clicked() {
                    app.import_journal();
                }
                if ui.button("Export JSON").clicked() {
                    app.export_journal();
                }

                Self::show_page_type(ui, app);
                ui.separator();
                Self::show_navigation(ui, app);
            });
        });
        ui.add_space(4.0);
    }

    /// Previous/next buttons (laid out right to left)
    fn show_navigation<S: KeyValueStore>(ui: &mut egui::Ui, app: &mut TravelJournalApp<S>) {
        let count = app.journal.pages.len();
        let current = app.current_page;

        if ui
            .add_enabled(current + 1 < count, egui::Button::new("\u{25B6}"))
            .clicked()
        {
            app.go_to_page(current + 1);
        }
        ui.label(
            RichText::new(format!("Page {} / {}", current + 1, count))
                .color(palette::INK)
                .strong(),
        );
        if ui
            .add_enabled(current > 0, egui::Button::new("\u{25C0}"))
            .clicked()
        {
            app.go_to_page(current.saturating_sub(1));
        }
    }

    fn show_page_type<S: KeyValueStore>(ui: &mut egui::Ui, app: &mut TravelJournalApp<S>) {
        let page = app.current_page;
        let Some(current) = app.journal.page(page).map(|p| p.page_type) else {
            return;
        };

        let mut selected = current;
        egui::ComboBox::from_id_salt("page_type")
            .selected_text(selected.label())
            .show_ui(ui, |ui| {
                for page_type in PageType::ALL {
                    ui.selectable_value(&mut selected, page_type, page_type.label());
                }
            });

        if selected != current {
            app.apply_edits(vec![Edit::SetPageType {
                page,
                page_type: selected,
            }]);
        }
    }
}
