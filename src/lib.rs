//! TripReel replays a trip's geo-tagged photos as an animated route and records the replay as
//! a branded video.
//!
//! The public API is replay-oriented:
//!
//! - Convert [`PhotoItem`]s into an ordered [`Waypoint`] sequence with [`build_waypoints`]
//! - Drive a [`TripReplay`] over a [`MapView`] and a [`FrameScheduler`]
//! - Export the replay through a [`RecorderController`] backed by an [`EncoderBackend`]
//!   ([`FfmpegBackend`] in production, [`InMemoryBackend`] in tests)
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod encode;
mod foundation;
mod map;
mod playback;
mod record;
mod render;
mod replay;
mod schedule;
mod trajectory;


pub use crate::foundation::core::{Canvas, GeoPosition, Rgba8};
pub use crate::foundation::error::{TripReelError, TripReelResult};
pub use crate::foundation::timing;

pub use crate::trajectory::builder::build_waypoints;
pub use crate::trajectory::format::{
    TITLE_MAX_CHARS, display_title, format_capture_date, format_coordinate, truncate_title,
};
pub use crate::trajectory::waypoint::{
    Hemisphere, PhotoItem, RawCoordinate, Waypoint, WaypointPhoto,
};

pub use crate::playback::clock::{MIN_REPLAY_WAYPOINTS, PlaybackClock};
pub use crate::playback::driver::AnimationDriver;
pub use crate::playback::state::{
    Effects, PlaybackEffect, PlaybackSnapshot, PlaybackStatus, TimelineEntry,
};
pub use crate::schedule::{FrameClock, FrameRequestId, FrameScheduler, ManualScheduler};

pub use crate::assets::cache::{FsFetcher, ImageCache, ImageFetcher, ImageState, LoadMode};
pub use crate::assets::decode::{CachedImage, decode_image, parse_svg};
pub use crate::assets::svg_raster::rasterize_svg;

pub use crate::render::composer::{BrandingText, FrameComposer, Overlay};
pub use crate::render::intro::intro_alpha;
pub use crate::render::surface::{FrameRGBA, Surface};

pub use crate::encode::codec::{CODEC_CANDIDATES, CodecProfile, codec_by_mime, negotiate_codec};
pub use crate::encode::encoder::{
    EncoderBackend, EncoderConfig, EncoderEvent, EncoderLog, InMemoryBackend, InMemoryEncoder,
    VideoEncoder,
};
pub use crate::encode::ffmpeg::{FfmpegBackend, FfmpegEncoder};

pub use crate::map::MapView;
pub use crate::map::track_map::TrackMap;

pub use crate::record::capture::CaptureClock;
pub use crate::record::controller::{RecorderController, RecordingStatus, video_file_name};
pub use crate::record::session::{FrameInputs, RecordedVideo, RecordingSession, SessionPhase};

pub use crate::config::{BrandingConfig, MapConfig, ReplayConfig};
pub use crate::replay::TripReplay;
