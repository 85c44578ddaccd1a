//! UI components for the travel journal

pub mod builder;
pub mod collage;
pub mod map_page;
pub mod photo;
pub mod toolbar;

use eframe::egui::Color32;

use crate::core::edit::{Edit, PhotoSlot};

/// Journal palette
pub mod palette {
    use super::Color32;

    pub const INK: Color32 = Color32::from_rgb(120, 53, 15);
    pub const INK_SOFT: Color32 = Color32::from_rgb(180, 83, 9);
    pub const PAPER: Color32 = Color32::from_rgb(255, 251, 235);
    pub const PAPER_DARK: Color32 = Color32::from_rgb(254, 243, 199);
    pub const RULE: Color32 = Color32::from_rgb(224, 231, 255);
    pub const CARD_EDGE: Color32 = Color32::from_rgb(254, 252, 232);
    pub const PLACEHOLDER: Color32 = Color32::from_rgb(253, 230, 138);
    pub const ROUTE: Color32 = Color32::from_rgb(185, 28, 28);
    pub const WAYPOINT: Color32 = Color32::from_rgb(220, 38, 38);
    pub const LABEL: Color32 = Color32::from_rgb(69, 26, 3);
    pub const SHADOW: Color32 = Color32::from_black_alpha(70);
}

/// What a page layout asked for during one frame
#[derive(Debug, Default)]
pub struct PageResponse {
    /// Mutations to apply to the journal
    pub edits: Vec<Edit>,
    /// Photo slots the user wants to pick an image for
    pub image_requests: Vec<PhotoSlot>,
}

impl PageResponse {
    pub fn edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn request_image(&mut self, slot: PhotoSlot) {
        self.image_requests.push(slot);
    }
}
