//! Photo thumbnail loading: decoding, SVG rasterization, and the shared image cache.

pub(crate) mod cache;
pub(crate) mod decode;
pub(crate) mod svg_raster;
