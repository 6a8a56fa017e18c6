use crate::trajectory::waypoint::{PhotoItem, Waypoint, WaypointPhoto};

/// Convert an unordered photo collection into a time-sorted waypoint sequence.
///
/// Items lacking a timestamp or a usable coordinate are dropped. Sorting is stable, so photos
/// sharing a timestamp keep their input order. `sequence_index` is assigned after sorting.
pub fn build_waypoints(items: &[PhotoItem]) -> Vec<Waypoint> {
    let mut kept: Vec<Waypoint> = items
        .iter()
        .filter_map(|item| {
            let Some(timestamp) = item.taken_at else {
                tracing::debug!(id = %item.id, "dropping photo without timestamp");
                return None;
            };
            let Some(coordinate) = item.coordinate else {
                tracing::debug!(id = %item.id, "dropping photo without coordinate");
                return None;
            };
            let Some(position) = coordinate.to_position() else {
                tracing::debug!(id = %item.id, "dropping photo with unusable coordinate");
                return None;
            };
            Some(Waypoint {
                id: item.id.clone(),
                position,
                timestamp,
                sequence_index: 0,
                photo: WaypointPhoto {
                    thumbnail_url: item.thumbnail_url.clone(),
                    original_url: item.original_url.clone(),
                    title: item.title.clone(),
                    caption: item.caption.clone(),
                    coordinate,
                },
            })
        })
        .collect();

    kept.sort_by_key(|w| w.timestamp);
    for (i, w) in kept.iter_mut().enumerate() {
        w.sequence_index = i;
    }
    kept
}

#[cfg(test)]
#[path = "../../tests/unit/trajectory/builder.rs"]
mod tests;
