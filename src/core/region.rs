//! Static table of journal regions and their map imagery

/// A region a journal can be set in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Key stored in `JournalConfig::region`
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Remote map image shown on map pages
    pub map_url: &'static str,
}

/// All selectable regions, in display order
pub const REGIONS: &[Region] = &[
    Region {
        key: "east-africa",
        label: "East Africa",
        map_url: "https://www.natureworldwidetravel.com/images/maps/East-Africa.gif",
    },
    Region {
        key: "south-america",
        label: "South America",
        map_url: "https://www.worldatlas.com/r/w1200/upload/1c/0f/1a/shutterstock-712326873.jpg",
    },
    Region {
        key: "europe",
        label: "Europe",
        map_url: "https://www.worldatlas.com/r/w1200/upload/bb/c3/32/shutterstock-1057838449.jpg",
    },
    Region {
        key: "southeast-asia",
        label: "Southeast Asia",
        map_url: "https://www.worldatlas.com/r/w1200/upload/6f/8c/63/shutterstock-1560159711.jpg",
    },
    Region {
        key: "north-america",
        label: "North America",
        map_url: "https://www.worldatlas.com/r/w1200/upload/79/89/28/shutterstock-1001143318.jpg",
    },
    Region {
        key: "oceania",
        label: "Oceania",
        map_url: "https://www.worldatlas.com/r/w1200/upload/c2/24/74/shutterstock-1152363495.jpg",
    },
];

/// Look up a region by key
pub fn find(key: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.key == key)
}

/// Display label for a region key, falling back to the key itself
pub fn label_for(key: &str) -> &str {
    find(key).map(|r| r.label).unwrap_or(key)
}

/// Map image URL for a region key
pub fn map_url_for(key: &str) -> Option<&'static str> {
    find(key).map(|r| r.map_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_region() {
        assert_eq!(label_for("europe"), "Europe");
        assert!(map_url_for("oceania").unwrap().starts_with("https://"));
    }

    #[test]
    fn test_unknown_region_falls_back() {
        assert_eq!(label_for("atlantis"), "atlantis");
        assert_eq!(map_url_for("atlantis"), None);
    }
}
