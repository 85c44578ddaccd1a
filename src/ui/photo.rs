//! Photo slot rendering shared by both page layouts

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use eframe::egui::{self, load::Bytes, Align2, FontId, ImageSource, Sense, Ui, Vec2};

use super::palette;
use crate::core::edit::PhotoSlot;
use crate::core::image::decode_data_url;
use crate::core::journal::{ImageData, Photo};

/// Decoded photo bytes keyed by a hash of their data URL.
///
/// egui caches textures by URI, so each distinct image gets a stable
/// `bytes://` URI and is only base64-decoded once.
#[derive(Default)]
pub struct PhotoCache {
    entries: HashMap<u64, Option<(String, Bytes)>>,
}

impl PhotoCache {
    /// Image source for a stored photo, `None` if the data is not a
    /// decodable data URL
    pub fn source(&mut self, data: &ImageData) -> Option<ImageSource<'static>> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let key = hasher.finish();

        let entry = self.entries.entry(key).or_insert_with(|| {
            let decoded = decode_data_url(data.as_str());
            if decoded.is_none() {
                tracing::warn!("Photo data is not a base64 data URL, showing placeholder");
            }
            decoded.map(|(mime, bytes)| {
                let ext = mime.rsplit('/').next().unwrap_or("bin");
                (format!("bytes://photo-{:016x}.{}", key, ext), Bytes::from(bytes))
            })
        });

        entry.as_ref().map(|(uri, bytes)| ImageSource::Bytes {
            uri: uri.clone().into(),
            bytes: bytes.clone(),
        })
    }

    /// Drop every cached image
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Draw a photo (or its empty placeholder) at an exact size.
///
/// Returns a clickable response in edit mode so the caller can open the
/// photo picker.
pub fn show_photo(
    ui: &mut Ui,
    cache: &mut PhotoCache,
    photo: &Photo,
    size: Vec2,
    tilt: bool,
    editable: bool,
) -> egui::Response {
    let sense = if editable { Sense::click() } else { Sense::hover() };
    let (rect, response) = ui.allocate_exact_size(size, sense);
    ui.painter().rect_filled(rect, 4.0, palette::PLACEHOLDER);

    match photo.url.as_ref().and_then(|data| cache.source(data)) {
        Some(source) => {
            let mut image = egui::Image::new(source)
                .fit_to_exact_size(size)
                .maintain_aspect_ratio(false);
            if tilt {
                image = image.rotate((photo.rotation as f32).to_radians(), Vec2::splat(0.5));
            }
            image.paint_at(ui, rect);
        }
        None => {
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                "\u{1F4F7}",
                FontId::proportional(28.0),
                palette::INK_SOFT,
            );
        }
    }

    if editable {
        response
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .on_hover_text("Click to choose a photo")
    } else {
        response
    }
}

/// Widget id of a photo's caption field, independent of paint order
pub fn caption_id(slot: PhotoSlot) -> egui::Id {
    egui::Id::new(("photo_caption", slot.page, slot.photo))
}

/// Caption under a photo: editable field or plain text
pub fn show_caption(
    ui: &mut Ui,
    slot: PhotoSlot,
    photo: &Photo,
    editable: bool,
    font: FontId,
) -> Option<String> {
    if editable {
        let mut caption = photo.caption.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut caption)
                .id(caption_id(slot))
                .font(font)
                .text_color(palette::INK)
                .horizontal_align(egui::Align::Center)
                .desired_width(f32::INFINITY),
        );
        response.changed().then_some(caption)
    } else {
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(&photo.caption).font(font).color(palette::INK));
        });
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image::encode_data_url;

    #[test]
    fn test_cache_reuses_uri() {
        let mut cache = PhotoCache::default();
        let data = encode_data_url(&[1, 2, 3], "image/png");

        let first = cache.source(&data).unwrap();
        let second = cache.source(&data).unwrap();
        assert_eq!(first.uri(), second.uri());
        assert!(first.uri().unwrap().ends_with(".png"));
    }

    #[test]
    fn test_cache_rejects_non_data_urls() {
        let mut cache = PhotoCache::default();
        assert!(cache.source(&ImageData::new("https://example.com/x.jpg")).is_none());
    }

    #[test]
    fn test_caption_focus_survives_reordering() {
        let ctx = egui::Context::default();
        let photo = Photo {
            id: 1,
            url: None,
            caption: "Serengeti".to_string(),
            size: Default::default(),
            rotation: 0,
            x: 0.0,
            y: 0.0,
            z_index: 1,
        };
        let a = PhotoSlot { page: 1, photo: 0 };
        let b = PhotoSlot { page: 1, photo: 1 };

        let run = |order: [PhotoSlot; 2]| {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    for slot in order {
                        show_caption(ui, slot, &photo, true, FontId::proportional(12.0));
                    }
                });
            });
        };

        ctx.memory_mut(|m| m.request_focus(caption_id(a)));
        run([a, b]);
        assert!(ctx.memory(|m| m.has_focus(caption_id(a))));

        // a bring-forward paints the cards in the opposite order
        run([b, a]);
        assert!(ctx.memory(|m| m.has_focus(caption_id(a))));
        assert_ne!(caption_id(a), caption_id(b));
    }
}
