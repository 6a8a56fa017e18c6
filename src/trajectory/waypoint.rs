use chrono::NaiveDateTime;

use crate::foundation::core::GeoPosition;

/// Hemisphere reference attached to an unsigned EXIF-style coordinate component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Hemisphere {
    /// Northern latitude.
    #[serde(rename = "N")]
    North,
    /// Southern latitude.
    #[serde(rename = "S")]
    South,
    /// Eastern longitude.
    #[serde(rename = "E")]
    East,
    /// Western longitude.
    #[serde(rename = "W")]
    West,
}

impl Hemisphere {
    /// Sign applied to the unsigned degrees.
    pub fn sign(self) -> f64 {
        match self {
            Self::North | Self::East => 1.0,
            Self::South | Self::West => -1.0,
        }
    }

    /// Single-letter label used in captions.
    pub fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }

    fn is_latitude_ref(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Raw photo coordinate: unsigned degrees plus hemisphere references.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawCoordinate {
    /// Unsigned latitude degrees.
    pub latitude: f64,
    /// `N` or `S`.
    pub latitude_ref: Hemisphere,
    /// Unsigned longitude degrees.
    pub longitude: f64,
    /// `E` or `W`.
    pub longitude_ref: Hemisphere,
}

impl RawCoordinate {
    /// Resolve into a signed position; `None` when references are swapped or degrees are out of
    /// range.
    pub fn to_position(self) -> Option<GeoPosition> {
        if !self.latitude_ref.is_latitude_ref() || self.longitude_ref.is_latitude_ref() {
            return None;
        }
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return None;
        }
        let pos = GeoPosition::new(
            self.longitude.abs() * self.longitude_ref.sign(),
            self.latitude.abs() * self.latitude_ref.sign(),
        );
        pos.is_valid().then_some(pos)
    }
}

/// Geo-tagged photo as supplied by the photo/EXIF collaborator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoItem {
    /// Stable identity of the photo.
    pub id: String,
    /// Thumbnail resource drawn in the caption card.
    pub thumbnail_url: String,
    /// Original-resolution resource (carried through, not drawn).
    #[serde(default)]
    pub original_url: String,
    /// Capture timestamp; items without one never become waypoints.
    #[serde(default)]
    pub taken_at: Option<NaiveDateTime>,
    /// Optional title.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional free-form caption.
    #[serde(default)]
    pub caption: Option<String>,
    /// GPS coordinate with hemisphere references.
    #[serde(default)]
    pub coordinate: Option<RawCoordinate>,
}

/// Ordered stop along the trajectory.
///
/// Immutable once built; a replay session keeps the same sequence until it is rebuilt.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Waypoint {
    /// Identity (the originating photo id).
    pub id: String,
    /// Signed position.
    pub position: GeoPosition,
    /// Capture timestamp.
    pub timestamp: NaiveDateTime,
    /// 0-based position in the time-sorted sequence.
    pub sequence_index: usize,
    /// Originating photo.
    pub photo: WaypointPhoto,
}

/// Photo metadata carried by a waypoint for caption rendering.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WaypointPhoto {
    /// Thumbnail resource.
    pub thumbnail_url: String,
    /// Original-resolution resource.
    pub original_url: String,
    /// Optional title.
    pub title: Option<String>,
    /// Optional caption.
    pub caption: Option<String>,
    /// Raw coordinate with hemisphere references.
    pub coordinate: RawCoordinate,
}
