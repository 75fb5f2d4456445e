#![deny(clippy::all, warnings)]

mod core;

pub use tcanvas_domain::{
    Attribute, Attributes, Brush, BrushError, Cell, Color, ColorError, Layer, Palette, Point,
    Texel,
};

pub use crate::core::canvas::{Canvas, CanvasError, RenderMode, MAX_DIMENSION, MAX_TEXELS};
pub use crate::core::config::{ColorConfig, Config, GlobalOptions, SizeConfig, TerminalProbe};
pub use crate::core::demo::{demo_canvas, texel_showcase};
pub use crate::core::geometry::Geometry2D;
pub use crate::core::runtime::{
    execute, failure_outcome, format_status_message, to_json_response, BlankRequest, CanvasCommand,
    DrawRequest,
};
pub use crate::core::scene::{CanvasSpec, Scene, SceneError, Shape, MAX_COORDINATE};
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};
pub use crate::core::transform::{Affine, Transform};
