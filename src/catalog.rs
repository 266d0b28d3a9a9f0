//! Fixed catalog of selectable floor-plan images.
//!
//! Whether a map needs an area sub-selection is carried as a catalog
//! attribute instead of being inferred from the map's name.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A selectable floor-plan image. Read-only catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapImage {
    pub id: String,
    pub name: String,
    /// Maps covering several wings require an [`AreaCode`] before a
    /// reference point can be named.
    pub needs_area_selection: bool,
}

impl MapImage {
    fn new(id: &str, name: &str, needs_area_selection: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            needs_area_selection,
        }
    }
}

/// Wing identifier for maps that span more than one survey area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AreaCode {
    A,
    B,
    C,
}

impl AreaCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaCode::A => "a",
            AreaCode::B => "b",
            AreaCode::C => "c",
        }
    }
}

/// The deployed floor plans. Static; points reference entries by `id`.
pub fn available_map_images() -> Vec<MapImage> {
    vec![
        MapImage::new("se1", "SE Building 1F", true),
        MapImage::new("se2", "SE Building 2F", true),
        MapImage::new("se3", "SE Building 3F", true),
        MapImage::new("sea4", "SE Building 4F (A wing)", false),
        MapImage::new("seb4", "SE Building 4F (B wing)", false),
    ]
}

/// Looks up a catalog entry by id.
pub fn find_map_image(id: &str) -> Option<MapImage> {
    available_map_images().into_iter().find(|m| m.id == id)
}

/// Default name for a new reference point: the map id with the area code
/// spliced in after the building prefix, e.g. `se1` + area `a` -> `sea1`.
/// Maps without area selection use their id as-is.
pub fn default_point_name(map: &MapImage, area: Option<AreaCode>) -> Result<String> {
    if !map.needs_area_selection {
        return Ok(map.id.clone());
    }

    let Some(area) = area else {
        bail!("map '{}' requires an area selection", map.id);
    };

    let (prefix, rest) = map.id.split_at(2.min(map.id.len()));
    Ok(format!("{prefix}{}{rest}", area.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_maps_splice_the_code_into_the_name() {
        let map = find_map_image("se1").unwrap();
        assert_eq!(default_point_name(&map, Some(AreaCode::A)).unwrap(), "sea1");
        assert_eq!(default_point_name(&map, Some(AreaCode::C)).unwrap(), "sec1");
    }

    #[test]
    fn area_maps_reject_a_missing_code() {
        let map = find_map_image("se2").unwrap();
        assert!(default_point_name(&map, None).is_err());
    }

    #[test]
    fn single_area_maps_use_their_id() {
        let map = find_map_image("sea4").unwrap();
        assert_eq!(default_point_name(&map, None).unwrap(), "sea4");
        // A supplied area code is ignored rather than rejected.
        assert_eq!(default_point_name(&map, Some(AreaCode::B)).unwrap(), "sea4");
    }

    #[test]
    fn catalog_ids_are_unique() {
        let maps = available_map_images();
        for (i, m) in maps.iter().enumerate() {
            assert!(maps.iter().skip(i + 1).all(|other| other.id != m.id));
        }
    }
}
