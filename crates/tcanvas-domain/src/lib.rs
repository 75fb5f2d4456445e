#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod brush;
pub mod color;
pub mod point;
pub mod texel;

pub use brush::{Brush, BrushError};
pub use color::{Color, ColorError, Layer, Palette};
pub use point::{Cell, Point};
pub use texel::{Attribute, Attributes, Texel};
