use std::io;
use std::path::Path;

use serde_json::json;

use crate::core::canvas::CanvasError;
use crate::core::scene::SceneError;
use crate::ExecutionOutcome;

pub(crate) fn scene_error_outcome(path: &Path, err: &SceneError) -> ExecutionOutcome {
    let hint = match err {
        SceneError::Read { source, .. } if source.kind() == io::ErrorKind::InvalidData => {
            "scene files must be UTF-8 encoded TOML"
        }
        SceneError::Read { .. } => "check the path; scenes are TOML files",
        SceneError::Parse(_) => {
            "shapes need a `kind` of point, text, line, triangle, polygon or rectangle"
        }
        SceneError::Brush { .. } => "`char` must be exactly one character",
        SceneError::UnknownKey { .. } => {
            "shapes take char, fg, bg, the attribute flags and their own geometry keys"
        }
        SceneError::OutOfRange { .. } => {
            "keep every coordinate finite and within ±65536 once the transform is applied"
        }
    };
    ExecutionOutcome::user_error(
        err.to_string(),
        json!({
            "hint": hint,
            "scene": path.display().to_string(),
        }),
    )
}

pub(crate) fn bad_colour_outcome(raw: &str, reason: &str) -> ExecutionOutcome {
    ExecutionOutcome::user_error(
        format!("invalid background colour `{raw}`: {reason}"),
        json!({
            "hint": "use a palette code (0kKrRgGyYbBmMcCwW), #rrggbb or r,g,b",
        }),
    )
}

pub(crate) fn oversized_canvas_outcome(err: &CanvasError) -> ExecutionOutcome {
    ExecutionOutcome::user_error(
        err.to_string(),
        json!({
            "hint": "pass smaller --columns/--rows or shrink the scene's [canvas] table",
        }),
    )
}
