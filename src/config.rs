use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{TripReelError, TripReelResult};

/// Intro card, watermark, and their resources.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandingConfig {
    /// Intro headline.
    pub title: String,
    /// Intro subtitle.
    pub tagline: String,
    /// Watermark pill label.
    pub watermark: String,
    /// TTF/OTF used for all overlay text; text is omitted when unset.
    pub font_path: Option<PathBuf>,
    /// SVG replacing the built-in intro logo.
    pub logo_svg_path: Option<PathBuf>,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            title: "TripReel".to_owned(),
            tagline: "Every photo, one journey".to_owned(),
            watermark: "Made with TripReel".to_owned(),
            font_path: None,
            logo_svg_path: None,
        }
    }
}

/// Map surface size; recordings share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Top-level replay configuration, loadable from JSON. Every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Overlay branding.
    pub branding: BrandingConfig,
    /// Map/recording dimensions.
    pub map: MapConfig,
    /// Where saved videos go; the current directory when unset.
    pub output_dir: Option<PathBuf>,
}

impl ReplayConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> TripReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| {
            TripReelError::serde(format!("parse config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject dimensions the pixmap or a yuv420p encoder cannot handle.
    pub fn validate(&self) -> TripReelResult<()> {
        let canvas = Canvas::new(self.map.width, self.map.height)?;
        if !canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2) {
            return Err(TripReelError::validation(format!(
                "map size {}x{} must be even for video encoding",
                canvas.width, canvas.height
            )));
        }
        Ok(())
    }

    /// Map dimensions as a canvas.
    pub fn canvas(&self) -> TripReelResult<Canvas> {
        Canvas::new(self.map.width, self.map.height)
    }

    /// Output directory, defaulting to `.`.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
