//! Recording: the composite draw loop, encoder session lifecycle, and the UI-facing controller.

pub(crate) mod capture;
pub(crate) mod controller;
pub(crate) mod session;
