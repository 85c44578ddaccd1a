//! Builder screen: configure and create a journal

use eframe::egui::{self, RichText};

use super::palette;
use crate::app::TravelJournalApp;
use crate::core::journal::JournalConfig;
use crate::core::region::{self, REGIONS};
use crate::core::storage::KeyValueStore;

/// Journal builder form
pub struct BuilderPanel;

impl BuilderPanel {
    /// Show the builder form
    pub fn show<S: KeyValueStore>(ui: &mut egui::Ui, app: &mut TravelJournalApp<S>) {
        egui::ScrollArea::vertical()
            .id_salt("builder_scroll")
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    egui::Frame::new()
                        .fill(palette::PAPER)
                        .stroke(egui::Stroke::new(2.0, palette::INK_SOFT))
                        .corner_radius(12.0)
                        .inner_margin(egui::Margin::same(24))
                        .show(ui, |ui| {
                            ui.set_max_width(560.0);
                            Self::show_form(ui, app);
                        });
                });
            });
    }

    fn show_form<S: KeyValueStore>(ui: &mut egui::Ui, app: &mut TravelJournalApp<S>) {
        ui.vertical(|ui| {
            ui.heading(
                RichText::new("\u{2699} Build Your Travel Journal")
                    .color(palette::INK)
                    .strong(),
            );
            ui.label(
                RichText::new(
                    "Choose your title, region, number of pages, and photos per page. \
                     You can switch pages to a collage layout later.",
                )
                .color(palette::INK_SOFT)
                .small(),
            );
            ui.add_space(16.0);

            let draft = &mut app.draft;

            Self::field_label(ui, "Journal Title");
            ui.add(egui::TextEdit::singleline(&mut draft.title).desired_width(f32::INFINITY));
            ui.add_space(8.0);

            Self::field_label(ui, "Subtitle");
            ui.add(egui::TextEdit::singleline(&mut draft.subtitle).desired_width(f32::INFINITY));
            ui.add_space(8.0);

            Self::field_label(ui, "Region");
            egui::ComboBox::from_id_salt("builder_region")
                .width(ui.available_width())
                .selected_text(region::label_for(&draft.region).to_string())
                .show_ui(ui, |ui| {
                    for r in REGIONS {
                        ui.selectable_value(&mut draft.region, r.key.to_string(), r.label);
                    }
                });
            ui.add_space(8.0);

            Self::field_label(ui, &format!("Number of Pages: {}", draft.page_count));
            ui.add(
                egui::Slider::new(&mut draft.page_count, JournalConfig::PAGE_RANGE)
                    .show_value(false),
            );
            let plural = if draft.page_count > 1 { "s" } else { "" };
            ui.label(
                RichText::new(format!(
                    "Create {} page{} for your journey.",
                    draft.page_count, plural
                ))
                .small()
                .color(palette::INK_SOFT),
            );
            ui.add_space(8.0);

            Self::field_label(ui, &format!("Photos per Page: {}", draft.photos_per_page));
            ui.add(
                egui::Slider::new(&mut draft.photos_per_page, JournalConfig::PHOTO_RANGE)
                    .show_value(false),
            );
            ui.label(
                RichText::new(format!(
                    "Each page will have {} photo slots.",
                    draft.photos_per_page
                ))
                .small()
                .color(palette::INK_SOFT),
            );
            ui.add_space(20.0);

            let create = egui::Button::new(
                RichText::new("\u{2795} Create Journal")
                    .color(egui::Color32::WHITE)
                    .strong(),
            )
            .fill(palette::INK)
            .min_size(egui::vec2(ui.available_width(), 40.0));
            if ui.add(create).clicked() {
                app.build_journal();
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if !app.journal.is_empty() && ui.button("Back to Journal").clicked() {
                    app.show_editor();
                }
                if ui.button("Import JSON...").clicked() {
                    app.import_journal();
                }
            });
        });
    }

    fn field_label(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).color(palette::INK).strong());
    }
}
