//! Waypoint model and the pure photo-to-trajectory conversion.

pub(crate) mod builder;
pub(crate) mod format;
pub(crate) mod waypoint;
