//! Global options and environment-derived settings.

pub mod settings;

pub use settings::*;
