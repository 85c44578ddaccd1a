//! Map + story page: route map, travel notes, location editor and photo grid

use eframe::egui::{self, Align2, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, StrokeKind, Vec2};

use super::photo::{self, PhotoCache};
use super::{palette, PageResponse};
use crate::app::{TravelJournalApp, ViewMode};
use crate::core::edit::{Edit, PhotoSlot};
use crate::core::journal::{Location, Page};
use crate::core::region;
use crate::core::storage::KeyValueStore;

const MAP_HEIGHT: f32 = 420.0;
const PHOTO_HEIGHT: f32 = 144.0;

/// Screen position of a waypoint given in percent of the map
fn waypoint(map: Rect, location: &Location) -> Pos2 {
    Pos2::new(
        map.left() + map.width() * location.x / 100.0,
        map.top() + map.height() * location.y / 100.0,
    )
}

/// Map page layout
pub struct MapPagePanel;

impl MapPagePanel {
    /// Show the map page for the current page
    pub fn show<S: KeyValueStore>(ui: &mut egui::Ui, app: &mut TravelJournalApp<S>) {
        let page_index = app.current_page;
        let Some(page) = app.journal.page(page_index).cloned() else {
            return;
        };
        let editable = app.view_mode == ViewMode::Edit;
        let region_key = app.journal.config.region.clone();
        let mut response = PageResponse::default();

        egui::Frame::new()
            .fill(palette::PAPER_DARK)
            .stroke(Stroke::new(8.0, palette::INK))
            .corner_radius(12.0)
            .inner_margin(egui::Margin::same(20))
            .show(ui, |ui| {
                ui.columns(2, |columns| {
                    Self::show_map(&mut columns[0], &page, &region_key);
                    columns[0].add_space(16.0);
                    Self::show_notes(&mut columns[0], &page, page_index, editable, &mut response);
                    if editable {
                        columns[0].add_space(16.0);
                        Self::show_location_editor(&mut columns[0], &page, page_index, &mut response);
                    }

                    Self::show_photos(
                        &mut columns[1],
                        &page,
                        page_index,
                        editable,
                        &mut app.photo_cache,
                        &mut response,
                    );
                });
            });

        app.handle_page_response(response);
    }

    /// Region map with the route overlay
    fn show_map(ui: &mut egui::Ui, page: &Page, region_key: &str) {
        let (map, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), MAP_HEIGHT), Sense::hover());
        let painter = ui.painter_at(map);
        painter.rect_filled(map, 8.0, egui::Color32::WHITE);

        match region::map_url_for(region_key) {
            Some(url) => {
                egui::Image::new(url)
                    .fit_to_exact_size(map.size())
                    .maintain_aspect_ratio(false)
                    .tint(egui::Color32::from_rgb(255, 242, 222))
                    .paint_at(ui, map);
            }
            None => {
                painter.text(
                    map.center(),
                    Align2::CENTER_CENTER,
                    "No map selected",
                    FontId::proportional(16.0),
                    palette::INK_SOFT,
                );
            }
        }

        Self::paint_route(&painter, map, &page.locations);
        Self::paint_compass(&painter, map);
        Self::paint_badge(&painter, map, &page.meta.year);
    }

    /// Dashed route between consecutive waypoints, then labelled dots
    fn paint_route(painter: &egui::Painter, map: Rect, locations: &[Location]) {
        let stroke = Stroke::new(3.0, palette::ROUTE);
        for pair in locations.windows(2) {
            let points = [waypoint(map, &pair[0]), waypoint(map, &pair[1])];
            painter.extend(Shape::dashed_line(&points, stroke, 8.0, 5.0));
        }

        for location in locations {
            let center = waypoint(map, location);
            painter.circle(center, 7.0, palette::WAYPOINT, Stroke::new(2.5, egui::Color32::WHITE));

            let label = painter.layout_no_wrap(
                location.name.clone(),
                FontId::proportional(11.0),
                palette::LABEL,
            );
            let label_center = center - Vec2::new(0.0, map.height() * 0.03 + 6.0);
            let backing = Rect::from_center_size(label_center, label.size() + Vec2::new(6.0, 2.0));
            painter.rect_filled(backing, 3.0, egui::Color32::from_white_alpha(200));
            painter.galley(backing.min + Vec2::new(3.0, 1.0), label, palette::LABEL);
        }
    }

    fn paint_compass(painter: &egui::Painter, map: Rect) {
        let radius = 32.0;
        let center = map.right_bottom() - Vec2::splat(16.0 + radius);
        painter.circle(center, radius, palette::PAPER, Stroke::new(2.0, palette::INK));

        let font = FontId::proportional(10.0);
        let inset = radius - 8.0;
        for (text, offset) in [
            ("N", Vec2::new(0.0, -inset)),
            ("S", Vec2::new(0.0, inset)),
            ("E", Vec2::new(inset, 0.0)),
            ("W", Vec2::new(-inset, 0.0)),
        ] {
            painter.text(center + offset, Align2::CENTER_CENTER, text, font.clone(), palette::INK);
        }
        painter.text(
            center,
            Align2::CENTER_CENTER,
            "\u{1F9ED}",
            FontId::proportional(18.0),
            palette::INK,
        );
    }

    /// "Route Map" badge with the page year
    fn paint_badge(painter: &egui::Painter, map: Rect, year: &str) {
        let badge = Rect::from_min_size(map.min + Vec2::splat(12.0), Vec2::new(96.0, 38.0));
        painter.rect_filled(badge, 4.0, palette::PAPER);
        painter.rect_stroke(badge, 4.0, Stroke::new(1.0, palette::INK_SOFT), StrokeKind::Inside);
        painter.rect_filled(
            Rect::from_min_size(badge.min, Vec2::new(4.0, badge.height())),
            0.0,
            palette::INK,
        );
        painter.text(
            badge.min + Vec2::new(12.0, 6.0),
            Align2::LEFT_TOP,
            "ROUTE MAP",
            FontId::proportional(11.0),
            palette::INK,
        );
        painter.text(
            badge.min + Vec2::new(12.0, 21.0),
            Align2::LEFT_TOP,
            year,
            FontId::proportional(11.0),
            palette::INK,
        );
    }

    fn show_notes(
        ui: &mut egui::Ui,
        page: &Page,
        page_index: usize,
        editable: bool,
        response: &mut PageResponse,
    ) {
        Self::section(ui, |ui| {
            ui.label(
                RichText::new("\u{270F} Travel Notes")
                    .color(palette::INK)
                    .size(18.0)
                    .strong(),
            );
            ui.add_space(6.0);

            if editable {
                let mut text = page.narrative.clone();
                let edit = egui::TextEdit::multiline(&mut text)
                    .hint_text("Write your story...")
                    .desired_rows(8)
                    .desired_width(f32::INFINITY);
                if ui.add(edit).changed() {
                    response.edit(Edit::SetNarrative {
                        page: page_index,
                        text,
                    });
                }
            } else {
                ui.label(RichText::new(&page.narrative).color(palette::LABEL));
            }
        });
    }

    fn show_location_editor(
        ui: &mut egui::Ui,
        page: &Page,
        page_index: usize,
        response: &mut PageResponse,
    ) {
        Self::section(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("\u{1F4CD} Edit Locations").color(palette::INK).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("+ Add").clicked() {
                        response.edit(Edit::AddLocation { page: page_index });
                    }
                });
            });
            ui.add_space(4.0);

            for (i, location) in page.locations.iter().enumerate() {
                ui.horizontal(|ui| {
                    let mut name = location.name.clone();
                    let field = egui::TextEdit::singleline(&mut name)
                        .id_salt(("location_name", page_index, i))
                        .desired_width(ui.available_width() - 32.0);
                    if ui.add(field).changed() {
                        response.edit(Edit::SetLocationName {
                            page: page_index,
                            location: i,
                            name,
                        });
                    }
                    if ui.small_button("\u{2715}").on_hover_text("Remove").clicked() {
                        response.edit(Edit::RemoveLocation {
                            page: page_index,
                            location: i,
                        });
                    }
                });
            }
        });
    }

    fn show_photos(
        ui: &mut egui::Ui,
        page: &Page,
        page_index: usize,
        editable: bool,
        cache: &mut PhotoCache,
        response: &mut PageResponse,
    ) {
        ui.label(
            RichText::new("\u{1F4F8} Page Photos")
                .color(palette::INK)
                .size(16.0)
                .strong(),
        );
        ui.add_space(6.0);

        let spacing = 16.0;
        let cell_width = ((ui.available_width() - spacing) / 2.0).max(80.0);
        let font = FontId::monospace(11.0);

        egui::Grid::new(("map_photos", page_index))
            .num_columns(2)
            .spacing(Vec2::splat(spacing))
            .show(ui, |ui| {
                for (i, photo) in page.photos.iter().enumerate() {
                    let slot = PhotoSlot {
                        page: page_index,
                        photo: i,
                    };
                    ui.vertical(|ui| {
                        ui.set_width(cell_width);
                        let size = Vec2::new(cell_width, PHOTO_HEIGHT);
                        if photo::show_photo(ui, cache, photo, size, false, editable).clicked() {
                            response.request_image(slot);
                        }
                        if let Some(caption) =
                            photo::show_caption(ui, slot, photo, editable, font.clone())
                        {
                            response.edit(Edit::SetPhotoCaption { slot, caption });
                        }
                    });
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    }

    /// White card used for the notes and location editor
    fn section(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::new()
            .fill(palette::PAPER)
            .stroke(Stroke::new(1.0, palette::PLACEHOLDER))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::same(14))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                add_contents(ui);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waypoint_is_percent_of_map() {
        let map = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(400.0, 200.0));
        let point = waypoint(map, &Location::new("Nairobi", 25.0, 50.0));
        assert_eq!(point, Pos2::new(200.0, 150.0));
    }
}
