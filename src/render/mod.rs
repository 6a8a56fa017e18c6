//! CPU compositing of recorded frames: the pixel surface, overlay drawing, and text.

pub(crate) mod caption;
pub(crate) mod composer;
pub(crate) mod intro;
pub(crate) mod shapes;
pub(crate) mod surface;
pub(crate) mod text;
pub(crate) mod watermark;
