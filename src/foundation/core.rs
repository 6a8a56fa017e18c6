use crate::foundation::error::{TripReelError, TripReelResult};

/// Geographic position as a `(longitude, latitude)` pair in signed decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPosition {
    /// Longitude in `[-180, 180]`, east positive.
    pub lon: f64,
    /// Latitude in `[-90, 90]`, north positive.
    pub lat: f64,
}

impl GeoPosition {
    /// Create a position from longitude and latitude.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Linear interpolation towards `other`; `t` is clamped into `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            lon: self.lon + (other.lon - self.lon) * t,
            lat: self.lat + (other.lat - self.lat) * t,
        }
    }

    /// Return `true` when both components are finite and inside their valid ranges.
    pub fn is_valid(self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// Pixel dimensions of a drawable surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create validated dimensions that fit a CPU pixmap (`u16` per axis, non-zero).
    pub fn new(width: u32, height: u32) -> TripReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(TripReelError::validation("canvas width/height must be non-zero"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(TripReelError::validation(format!(
                "canvas {width}x{height} exceeds the {max}x{max} pixmap limit",
                max = u16::MAX
            )));
        }
        Ok(Self { width, height })
    }

    /// Scale factor relative to a 720p reference height, used to size overlays.
    pub fn ui_scale(self) -> f64 {
        (f64::from(self.height) / 720.0).max(0.25)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return the same color with its alpha scaled by `factor` in `[0, 1]`.
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            a: ((f32::from(self.a) * f).round() as i32).clamp(0, 255) as u8,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
