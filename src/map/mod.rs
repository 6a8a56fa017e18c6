//! The map collaborator seen from the replay engine, plus a minimal route renderer.

pub(crate) mod track_map;

use crate::foundation::core::{Canvas, GeoPosition};
use crate::foundation::error::TripReelResult;
use crate::render::surface::Surface;

/// Narrow view of an interactive map: its current raster and camera commands.
///
/// The recorder only ever reads the surface returned by [`MapView::snapshot_surface`].
pub trait MapView {
    /// Fixed pixel dimensions of the map's surface.
    fn dimensions(&self) -> Canvas;

    /// Current rendered map, premultiplied RGBA8 at [`MapView::dimensions`].
    fn snapshot_surface(&mut self) -> TripReelResult<&Surface>;

    /// Animate the camera to `target` over `duration_ms`.
    fn fly_to(&mut self, target: GeoPosition, duration_ms: f64);

    /// Advance camera animations to host time `now_ms`.
    fn advance_to(&mut self, _now_ms: f64) {}

    /// Move the replay marker.
    fn set_marker(&mut self, _position: GeoPosition) {}
}
