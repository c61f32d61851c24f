//! Presentation layer: the icon view and its sizing vocabulary

pub mod icon_view;
pub mod size;

pub use icon_view::{IconInputs, IconView, RenderedIcon};
pub use size::{IconSize, ParseSizeError};
