//! Page, photo and location mutations.
//!
//! Every mutation addresses its target by index into the current snapshot
//! and produces a new journal that differs from the input in exactly one
//! field. Indices taken from an older snapshot (for example by an image read
//! that finished after the journal was rebuilt) are rejected with an
//! [`EditError`] and leave the journal as it was.

use thiserror::Error;

use super::journal::{ImageData, Journal, Location, Page, PageType, Photo, NEW_LOCATION_NAME};

/// Direction of a layering change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZDirection {
    Up,
    Down,
}

/// Address of a photo slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoSlot {
    pub page: usize,
    pub photo: usize,
}

/// A single mutation of the journal, as emitted by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    SetPhotoImage {
        slot: PhotoSlot,
        image: Option<ImageData>,
    },
    SetPhotoCaption {
        slot: PhotoSlot,
        caption: String,
    },
    /// Final position reported when a drag ends
    SetPhotoPosition { slot: PhotoSlot, x: f32, y: f32 },
    BumpZIndex {
        slot: PhotoSlot,
        direction: ZDirection,
    },
    SetNarrative { page: usize, text: String },
    SetLocationName {
        page: usize,
        location: usize,
        name: String,
    },
    AddLocation { page: usize },
    RemoveLocation { page: usize, location: usize },
    SetPageType { page: usize, page_type: PageType },
}

/// Rejected mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("page {page} is out of range ({len} pages)")]
    PageOutOfRange { page: usize, len: usize },
    #[error("photo {photo} is out of range on page {page} ({len} photos)")]
    PhotoOutOfRange { page: usize, photo: usize, len: usize },
    #[error("location {location} is out of range on page {page} ({len} locations)")]
    LocationOutOfRange {
        page: usize,
        location: usize,
        len: usize,
    },
}

impl Journal {
    /// Apply an edit, returning the new snapshot
    pub fn apply(&self, edit: &Edit) -> Result<Journal, EditError> {
        match edit {
            Edit::SetPhotoImage { slot, image } => self.set_photo_image(*slot, image.clone()),
            Edit::SetPhotoCaption { slot, caption } => self.set_photo_caption(*slot, caption),
            Edit::SetPhotoPosition { slot, x, y } => self.set_photo_position(*slot, *x, *y),
            Edit::BumpZIndex { slot, direction } => self.bump_z_index(*slot, *direction),
            Edit::SetNarrative { page, text } => self.set_narrative(*page, text),
            Edit::SetLocationName {
                page,
                location,
                name,
            } => self.set_location_name(*page, *location, name),
            Edit::AddLocation { page } => self.add_location(*page),
            Edit::RemoveLocation { page, location } => self.remove_location(*page, *location),
            Edit::SetPageType { page, page_type } => self.set_page_type(*page, *page_type),
        }
    }

    /// Replace a photo's image. `None` means no file was chosen and is a no-op.
    pub fn set_photo_image(
        &self,
        slot: PhotoSlot,
        image: Option<ImageData>,
    ) -> Result<Journal, EditError> {
        match image {
            Some(image) => self.with_photo(slot, |photo| photo.url = Some(image)),
            None => {
                self.check_photo(slot)?;
                Ok(self.clone())
            }
        }
    }

    pub fn set_photo_caption(&self, slot: PhotoSlot, caption: &str) -> Result<Journal, EditError> {
        self.with_photo(slot, |photo| photo.caption = caption.to_string())
    }

    pub fn set_photo_position(&self, slot: PhotoSlot, x: f32, y: f32) -> Result<Journal, EditError> {
        self.with_photo(slot, |photo| {
            photo.x = x;
            photo.y = y;
        })
    }

    /// Move a photo one layer up or down. Never goes below 1.
    pub fn bump_z_index(&self, slot: PhotoSlot, direction: ZDirection) -> Result<Journal, EditError> {
        self.with_photo(slot, |photo| {
            let current = photo.z_index.max(1);
            photo.z_index = match direction {
                ZDirection::Up => current.saturating_add(1),
                ZDirection::Down => (current - 1).max(1),
            };
        })
    }

    pub fn set_narrative(&self, page: usize, text: &str) -> Result<Journal, EditError> {
        self.with_page(page, |p| p.narrative = text.to_string())
    }

    pub fn set_location_name(
        &self,
        page: usize,
        location: usize,
        name: &str,
    ) -> Result<Journal, EditError> {
        self.check_location(page, location)?;
        self.with_page(page, |p| p.locations[location].name = name.to_string())
    }

    /// Append a placeholder location in the middle of the map
    pub fn add_location(&self, page: usize) -> Result<Journal, EditError> {
        self.with_page(page, |p| {
            p.locations.push(Location::new(NEW_LOCATION_NAME, 50.0, 50.0))
        })
    }

    /// Remove a location. A page may end up with no locations at all.
    pub fn remove_location(&self, page: usize, location: usize) -> Result<Journal, EditError> {
        self.check_location(page, location)?;
        self.with_page(page, |p| {
            p.locations.remove(location);
        })
    }

    pub fn set_page_type(&self, page: usize, page_type: PageType) -> Result<Journal, EditError> {
        self.with_page(page, |p| p.page_type = page_type)
    }

    fn check_page(&self, page: usize) -> Result<&Page, EditError> {
        self.pages.get(page).ok_or(EditError::PageOutOfRange {
            page,
            len: self.pages.len(),
        })
    }

    fn check_photo(&self, slot: PhotoSlot) -> Result<&Photo, EditError> {
        let page = self.check_page(slot.page)?;
        page.photos.get(slot.photo).ok_or(EditError::PhotoOutOfRange {
            page: slot.page,
            photo: slot.photo,
            len: page.photos.len(),
        })
    }

    fn check_location(&self, page: usize, location: usize) -> Result<(), EditError> {
        let p = self.check_page(page)?;
        if location < p.locations.len() {
            Ok(())
        } else {
            Err(EditError::LocationOutOfRange {
                page,
                location,
                len: p.locations.len(),
            })
        }
    }

    /// Copy the snapshot and change one page
    fn with_page(&self, page: usize, f: impl FnOnce(&mut Page)) -> Result<Journal, EditError> {
        self.check_page(page)?;
        let mut next = self.clone();
        f(&mut next.pages[page]);
        Ok(next)
    }

    /// Copy the snapshot and change one photo
    fn with_photo(&self, slot: PhotoSlot, f: impl FnOnce(&mut Photo)) -> Result<Journal, EditError> {
        self.check_photo(slot)?;
        let mut next = self.clone();
        f(&mut next.pages[slot.page].photos[slot.photo]);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::journal::JournalConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn journal() -> Journal {
        let config = JournalConfig {
            page_count: 2,
            photos_per_page: 3,
            region: "europe".to_string(),
            title: "T".to_string(),
            subtitle: "S".to_string(),
        };
        Journal::build(&config, &mut StdRng::seed_from_u64(9), 2024)
    }

    fn slot(page: usize, photo: usize) -> PhotoSlot {
        PhotoSlot { page, photo }
    }

    #[test]
    fn test_caption_changes_only_target() {
        let before = journal();
        let after = before.set_photo_caption(slot(0, 1), "Sunset").unwrap();
        assert_eq!(after.pages[0].photos[1].caption, "Sunset");

        let mut expected = before.clone();
        expected.pages[0].photos[1].caption = "Sunset".to_string();
        assert_eq!(after, expected);
        assert_eq!(
            serde_json::to_string(&after.pages[1]).unwrap(),
            serde_json::to_string(&before.pages[1]).unwrap()
        );
        // Input snapshot is untouched
        assert_eq!(before.pages[0].photos[1].caption, "Photo 2");
    }

    #[test]
    fn test_z_index_floor() {
        let mut j = journal();
        for _ in 0..10 {
            j = j.bump_z_index(slot(1, 2), ZDirection::Down).unwrap();
        }
        assert_eq!(j.pages[1].photos[2].z_index, 1);

        let j = j.bump_z_index(slot(1, 2), ZDirection::Up).unwrap();
        assert_eq!(j.pages[1].photos[2].z_index, 2);
    }

    #[test]
    fn test_z_index_zero_treated_as_one() {
        let mut j = journal();
        j.pages[0].photos[0].z_index = 0;
        let up = j.bump_z_index(slot(0, 0), ZDirection::Up).unwrap();
        assert_eq!(up.pages[0].photos[0].z_index, 2);
        let down = j.bump_z_index(slot(0, 0), ZDirection::Down).unwrap();
        assert_eq!(down.pages[0].photos[0].z_index, 1);
    }

    #[test]
    fn test_remove_last_location() {
        let mut j = journal();
        for _ in 0..3 {
            j = j.remove_location(0, 0).unwrap();
        }
        assert!(j.pages[0].locations.is_empty());
        assert_eq!(
            j.remove_location(0, 0),
            Err(EditError::LocationOutOfRange {
                page: 0,
                location: 0,
                len: 0
            })
        );
        // Re-adding works from empty
        let j = j.add_location(0).unwrap();
        assert_eq!(j.pages[0].locations, vec![Location::new("New Location", 50.0, 50.0)]);
    }

    #[test]
    fn test_remove_location_keeps_order() {
        let j = journal().remove_location(1, 1).unwrap();
        let names: Vec<&str> = j.pages[1].locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Location 4", "Location 6"]);
    }

    #[test]
    fn test_set_photo_image() {
        let j = journal();
        let image = ImageData::new("data:image/png;base64,AAAA");
        let with_image = j.set_photo_image(slot(1, 0), Some(image.clone())).unwrap();
        assert_eq!(with_image.pages[1].photos[0].url, Some(image));

        let unchanged = with_image.set_photo_image(slot(1, 0), None).unwrap();
        assert_eq!(unchanged, with_image);
    }

    #[test]
    fn test_position_narrative_and_page_type() {
        let j = journal()
            .apply(&Edit::SetPhotoPosition {
                slot: slot(1, 2),
                x: 12.5,
                y: 300.0,
            })
            .unwrap()
            .apply(&Edit::SetNarrative {
                page: 0,
                text: "Day one".to_string(),
            })
            .unwrap()
            .apply(&Edit::SetPageType {
                page: 1,
                page_type: PageType::Map,
            })
            .unwrap()
            .apply(&Edit::SetLocationName {
                page: 1,
                location: 2,
                name: "Lisbon".to_string(),
            })
            .unwrap();

        let photo = &j.pages[1].photos[2];
        assert_eq!((photo.x, photo.y), (12.5, 300.0));
        assert_eq!(j.pages[0].narrative, "Day one");
        assert_eq!(j.pages[1].page_type, PageType::Map);
        assert_eq!(j.pages[1].locations[2].name, "Lisbon");
        assert_eq!(j.pages[1].photos.len(), 3);
        assert_eq!(j.pages[1].locations.len(), 3);
    }

    #[test]
    fn test_out_of_range_indices() {
        let j = journal();
        assert_eq!(
            j.set_narrative(5, "x"),
            Err(EditError::PageOutOfRange { page: 5, len: 2 })
        );
        assert_eq!(
            j.set_photo_caption(slot(0, 3), "x"),
            Err(EditError::PhotoOutOfRange {
                page: 0,
                photo: 3,
                len: 3
            })
        );
        assert!(j.set_photo_image(slot(9, 0), None).is_err());
    }
}
