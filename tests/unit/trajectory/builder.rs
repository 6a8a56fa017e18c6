use chrono::NaiveDate;

use super::*;
use crate::trajectory::waypoint::{Hemisphere, RawCoordinate};

fn item(id: &str, hour: Option<u32>, coord: Option<RawCoordinate>) -> PhotoItem {
    PhotoItem {
        id: id.to_owned(),
        thumbnail_url: format!("{id}.jpg"),
        original_url: String::new(),
        taken_at: hour.map(|h| {
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        }),
        title: None,
        caption: None,
        coordinate: coord,
    }
}

fn tokyo() -> RawCoordinate {
    RawCoordinate {
        latitude: 35.6895,
        latitude_ref: Hemisphere::North,
        longitude: 139.6917,
        longitude_ref: Hemisphere::East,
    }
}

#[test]
fn sorts_by_timestamp_and_reindexes() {
    let items = vec![
        item("c", Some(15), Some(tokyo())),
        item("a", Some(9), Some(tokyo())),
        item("b", Some(12), Some(tokyo())),
    ];
    let wps = build_waypoints(&items);
    let ids: Vec<&str> = wps.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    for (i, w) in wps.iter().enumerate() {
        assert_eq!(w.sequence_index, i);
    }
}

#[test]
fn drops_items_without_timestamp_or_coordinate() {
    let items = vec![
        item("no_time", None, Some(tokyo())),
        item("no_coord", Some(10), None),
        item("ok", Some(11), Some(tokyo())),
    ];
    let wps = build_waypoints(&items);
    assert_eq!(wps.len(), 1);
    assert_eq!(wps[0].id, "ok");
}

#[test]
fn equal_timestamps_keep_input_order() {
    let items = vec![
        item("first", Some(10), Some(tokyo())),
        item("second", Some(10), Some(tokyo())),
    ];
    let wps = build_waypoints(&items);
    assert_eq!(wps[0].id, "first");
    assert_eq!(wps[1].id, "second");
}

#[test]
fn hemisphere_refs_sign_the_position() {
    let coord = RawCoordinate {
        latitude: 33.8688,
        latitude_ref: Hemisphere::South,
        longitude: 151.2093,
        longitude_ref: Hemisphere::East,
    };
    let wps = build_waypoints(&[item("sydney", Some(8), Some(coord))]);
    assert!(wps[0].position.lat < 0.0);
    assert!(wps[0].position.lon > 0.0);
}

#[test]
fn swapped_refs_are_rejected() {
    let coord = RawCoordinate {
        latitude: 10.0,
        latitude_ref: Hemisphere::East,
        longitude: 10.0,
        longitude_ref: Hemisphere::North,
    };
    assert!(build_waypoints(&[item("bad", Some(8), Some(coord))]).is_empty());
}
