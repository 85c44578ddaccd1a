//! Collage page: free-form scrapbook of draggable, layered photo cards

use eframe::egui::{self, Align2, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};

use super::photo::{self, PhotoCache};
use super::{palette, PageResponse};
use crate::app::{TravelJournalApp, ViewMode};
use crate::core::edit::{Edit, PhotoSlot, ZDirection};
use crate::core::journal::{Page, Photo};
use crate::core::storage::KeyValueStore;

const BORDER: f32 = 8.0;
const CARD_PADDING: f32 = 12.0;
const CAPTION_HEIGHT: f32 = 26.0;
const LINE_SPACING: f32 = 28.0;

/// Drag in progress. Only the final position is written to the journal.
#[derive(Debug, Default)]
pub struct CollageState {
    drag: Option<(PhotoSlot, Vec2)>,
}

impl CollageState {
    fn offset_for(&self, slot: PhotoSlot) -> Vec2 {
        match self.drag {
            Some((dragging, offset)) if dragging == slot => offset,
            _ => Vec2::ZERO,
        }
    }

    fn drag_by(&mut self, slot: PhotoSlot, delta: Vec2) {
        match &mut self.drag {
            Some((dragging, offset)) if *dragging == slot => *offset += delta,
            _ => self.drag = Some((slot, delta)),
        }
    }

    /// Finish a drag, returning the accumulated offset for `slot`
    fn finish(&mut self, slot: PhotoSlot) -> Option<Vec2> {
        match self.drag.take() {
            Some((dragging, offset)) if dragging == slot => Some(offset),
            other => {
                self.drag = other;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.drag = None;
    }
}

/// Card size for a photo: border, image area and caption
fn card_size(photo: &Photo) -> Vec2 {
    let (width, image_height) = photo.size.dimensions();
    Vec2::new(width, image_height + CAPTION_HEIGHT + CARD_PADDING * 2.0)
}

/// Keep a card's top-left corner inside the canvas
fn clamp_to_canvas(pos: Vec2, card: Vec2, canvas: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (canvas.x - card.x).max(0.0)),
        pos.y.clamp(0.0, (canvas.y - card.y).max(0.0)),
    )
}

/// Photo indices in painting order: lowest layer first, ties by slot
fn paint_order(page: &Page) -> Vec<usize> {
    let mut order: Vec<usize> = (0..page.photos.len()).collect();
    order.sort_by_key(|&i| page.photos[i].z_index);
    order
}

/// Collage page layout
pub struct CollagePanel;

impl CollagePanel {
    /// Show the collage for the current page
    pub fn show<S: KeyValueStore>(ui: &mut egui::Ui, app: &mut TravelJournalApp<S>) {
        let page_index = app.current_page;
        let Some(page) = app.journal.page(page_index).cloned() else {
            return;
        };
        let editable = app.view_mode == ViewMode::Edit;
        let height = app.config.ui.collage_height;

        let (canvas, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::hover());
        Self::paint_paper(ui, canvas);

        let inner = canvas.shrink(BORDER);
        let mut response = PageResponse::default();
        for i in paint_order(&page) {
            let slot = PhotoSlot {
                page: page_index,
                photo: i,
            };
            Self::show_card(
                ui,
                &page.photos[i],
                slot,
                inner,
                editable,
                &mut app.collage,
                &mut app.photo_cache,
                &mut response,
            );
        }

        Self::paint_header(ui, canvas, editable);
        app.handle_page_response(response);
    }

    #[allow(clippy::too_many_arguments)]
    fn show_card(
        ui: &mut egui::Ui,
        photo: &Photo,
        slot: PhotoSlot,
        canvas: Rect,
        editable: bool,
        state: &mut CollageState,
        cache: &mut PhotoCache,
        response: &mut PageResponse,
    ) {
        let size = card_size(photo);
        let stored = Vec2::new(photo.x, photo.y);
        let pos = clamp_to_canvas(stored + state.offset_for(slot), size, canvas.size());
        let card = Rect::from_min_size(canvas.min + pos, size);

        let id = ui.id().with(("collage_card", slot.page, slot.photo));
        let sense = if editable { Sense::drag() } else { Sense::hover() };
        let drag = ui.interact(card, id, sense);

        if editable {
            if drag.dragged() {
                state.drag_by(slot, drag.drag_delta());
            }
            if drag.drag_stopped() {
                if let Some(offset) = state.finish(slot) {
                    let end = clamp_to_canvas(stored + offset, size, canvas.size());
                    response.edit(Edit::SetPhotoPosition {
                        slot,
                        x: end.x,
                        y: end.y,
                    });
                }
            }
            if drag.hovered() {
                ui.ctx().set_cursor_icon(if drag.dragged() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::Grab
                });
            }
        }

        let painter = ui.painter();
        painter.rect_filled(card.translate(Vec2::new(0.0, 6.0)), 2.0, palette::SHADOW);
        painter.rect_filled(card, 2.0, egui::Color32::WHITE);
        painter.rect_stroke(card, 2.0, Stroke::new(BORDER, palette::CARD_EDGE), StrokeKind::Inside);

        let content = card.shrink(CARD_PADDING);
        ui.scope_builder(egui::UiBuilder::new().max_rect(content), |ui| {
            let (_, image_height) = photo.size.dimensions();
            let image_size = Vec2::new(content.width(), image_height);
            if photo::show_photo(ui, cache, photo, image_size, true, editable).clicked() {
                response.request_image(slot);
            }
            let font = FontId::new(12.0, egui::FontFamily::Proportional);
            if let Some(caption) = photo::show_caption(ui, slot, photo, editable, font) {
                response.edit(Edit::SetPhotoCaption { slot, caption });
            }
        });

        if editable {
            Self::show_layer_buttons(ui, card, slot, response);
        }
    }

    /// Bring-forward / send-backward buttons hanging off the card corner
    fn show_layer_buttons(ui: &mut egui::Ui, card: Rect, slot: PhotoSlot, response: &mut PageResponse) {
        let button = Vec2::splat(22.0);
        let up = Rect::from_min_size(card.right_top() + Vec2::new(-button.x / 2.0, -button.y / 2.0), button);
        let down = up.translate(Vec2::new(0.0, button.y + 2.0));

        if ui
            .put(up, egui::Button::new("\u{2191}").small())
            .on_hover_text("Bring forward")
            .clicked()
        {
            response.edit(Edit::BumpZIndex {
                slot,
                direction: ZDirection::Up,
            });
        }
        if ui
            .put(down, egui::Button::new("\u{2193}").small())
            .on_hover_text("Send backward")
            .clicked()
        {
            response.edit(Edit::BumpZIndex {
                slot,
                direction: ZDirection::Down,
            });
        }
    }

    /// Lined paper background, frame and decorations
    fn paint_paper(ui: &egui::Ui, canvas: Rect) {
        let painter = ui.painter_at(canvas);
        painter.rect_filled(canvas, 12.0, palette::PAPER);

        let mut y = canvas.top() + LINE_SPACING;
        while y < canvas.bottom() {
            painter.hline(canvas.x_range(), y, Stroke::new(1.0, palette::RULE));
            y += LINE_SPACING;
        }

        painter.text(
            canvas.left_bottom() + Vec2::new(28.0, -24.0),
            Align2::LEFT_BOTTOM,
            "TRAVEL",
            FontId::proportional(36.0),
            palette::INK.gamma_multiply(0.75),
        );
        painter.text(
            canvas.right_bottom() + Vec2::new(-36.0, -16.0),
            Align2::RIGHT_BOTTOM,
            "\u{2708}",
            FontId::proportional(60.0),
            palette::INK_SOFT.gamma_multiply(0.6),
        );
        painter.rect_stroke(canvas, 12.0, Stroke::new(BORDER, palette::INK), StrokeKind::Inside);
    }

    /// Title card in the top-left corner, drawn over the photos
    fn paint_header(ui: &egui::Ui, canvas: Rect, editable: bool) {
        let painter = ui.painter_at(canvas);
        let hint = if editable {
            "Drag photos \u{00B7} Use arrows to layer"
        } else {
            "Render mode \u{2013} editing disabled"
        };

        let origin = canvas.min + Vec2::new(BORDER + 12.0, BORDER + 12.0);
        let title = painter.layout_no_wrap(
            "COLLAGE LAYOUT".to_string(),
            FontId::proportional(13.0),
            palette::INK,
        );
        let subtitle = painter.layout_no_wrap(hint.to_string(), FontId::proportional(11.0), palette::INK_SOFT);
        let width = title.size().x.max(subtitle.size().x) + 24.0;
        let height = title.size().y + subtitle.size().y + 14.0;
        let card = Rect::from_min_size(origin, Vec2::new(width, height));

        painter.rect_filled(card, 4.0, egui::Color32::from_white_alpha(230));
        painter.rect_filled(
            Rect::from_min_size(card.min, Vec2::new(4.0, card.height())),
            0.0,
            palette::INK,
        );
        let text_left = Pos2::new(card.left() + 14.0, card.top() + 6.0);
        let subtitle_top = text_left + Vec2::new(0.0, title.size().y + 2.0);
        painter.galley(text_left, title, palette::INK);
        painter.galley(subtitle_top, subtitle, palette::INK_SOFT);
    }
}
