//! Command dispatch and response shaping.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use serde_json::{json, Value};
use tcanvas_domain::Color;
use tracing::{debug, info};

use crate::core::canvas::{Canvas, CanvasError, RenderMode};
use crate::core::config::{Config, GlobalOptions, SizeConfig};
use crate::core::demo::{demo_canvas, texel_showcase};
use crate::core::scene::{Scene, SceneError};
use crate::core::tooling::{bad_colour_outcome, oversized_canvas_outcome, scene_error_outcome};
use crate::core::tooling::outcome::ExecutionOutcome;

pub const TCANVAS_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasCommand {
    /// Every colour form and text effect, one labelled texel per line.
    Texels,
    /// The built-in 20×10 composition.
    Demo,
    Draw(DrawRequest),
    Blank(BlankRequest),
}

impl CanvasCommand {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CanvasCommand::Texels => "texels",
            CanvasCommand::Demo => "demo",
            CanvasCommand::Draw(_) => "draw",
            CanvasCommand::Blank(_) => "blank",
        }
    }
}

/// Renders a scene file. Explicit sizes and background win over the scene's
/// own `[canvas]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRequest {
    pub scene: PathBuf,
    pub columns: Option<usize>,
    pub rows: Option<usize>,
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlankRequest {
    pub columns: Option<usize>,
    pub rows: Option<usize>,
    pub background: Option<String>,
}

/// Runs one command against the current environment.
///
/// # Errors
/// Returns an error for failures that are not the caller's fault, such as a
/// scene path that cannot be read. Mistakes in the input come back as
/// [`crate::CommandStatus::UserError`] outcomes instead; [`failure_outcome`]
/// turns the error into a reportable outcome.
pub fn execute(global: &GlobalOptions, command: &CanvasCommand) -> anyhow::Result<ExecutionOutcome> {
    let config = Config::from_env();
    execute_with(global, &config, command)
}

pub(crate) fn execute_with(
    global: &GlobalOptions,
    config: &Config,
    command: &CanvasCommand,
) -> anyhow::Result<ExecutionOutcome> {
    let mode = if config.color().enabled && !global.no_color {
        RenderMode::Ansi
    } else {
        RenderMode::Plain
    };
    debug!(command = command.name(), ?mode, "dispatching");

    match command {
        CanvasCommand::Texels => Ok(texels_outcome(mode)),
        CanvasCommand::Demo => Ok(canvas_outcome(&demo_canvas(), mode)),
        CanvasCommand::Draw(request) => draw(request, config.size(), mode),
        CanvasCommand::Blank(request) => {
            let background = match parse_background(request.background.as_deref()) {
                Ok(color) => color,
                Err(outcome) => return Ok(outcome),
            };
            let (columns, rows) = config.size().resolve();
            let canvas = match sized_canvas(
                request.columns.unwrap_or(columns),
                request.rows.unwrap_or(rows),
            ) {
                Ok(canvas) => canvas,
                Err(err) => return Ok(oversized_canvas_outcome(&err)),
            };
            let canvas = canvas.with_background(background.unwrap_or_default());
            Ok(canvas_outcome(&canvas, mode))
        }
    }
}

fn draw(
    request: &DrawRequest,
    size: &SizeConfig,
    mode: RenderMode,
) -> anyhow::Result<ExecutionOutcome> {
    let background = match parse_background(request.background.as_deref()) {
        Ok(color) => color,
        Err(outcome) => return Ok(outcome),
    };
    let scene = match Scene::load(&request.scene) {
        Ok(scene) => scene,
        Err(SceneError::Read { path, source })
            if !matches!(
                source.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::InvalidData
            ) =>
        {
            return Err(source).with_context(|| format!("reading {}", path.display()));
        }
        Err(err) => return Ok(scene_error_outcome(&request.scene, &err)),
    };

    let (columns, rows) = scene.canvas_size(size);
    let background = background
        .or(scene.canvas.background)
        .unwrap_or_default();
    let canvas = match sized_canvas(
        request.columns.unwrap_or(columns),
        request.rows.unwrap_or(rows),
    ) {
        Ok(canvas) => canvas,
        Err(err) => {
            let mut outcome = oversized_canvas_outcome(&err);
            outcome.details["scene"] = Value::String(request.scene.display().to_string());
            return Ok(outcome);
        }
    };
    let mut canvas = canvas.with_background(background);
    scene.draw(&mut canvas);
    info!(
        scene = %request.scene.display(),
        shapes = scene.shapes().count(),
        "drew scene"
    );

    let mut outcome = canvas_outcome(&canvas, mode);
    if let Value::Object(map) = &mut outcome.details {
        map.insert(
            "scene".to_string(),
            Value::String(request.scene.display().to_string()),
        );
    }
    Ok(outcome)
}

fn sized_canvas(columns: usize, rows: usize) -> Result<Canvas, CanvasError> {
    Canvas::try_new(columns, rows).inspect_err(|err| debug!(%err, "refused canvas size"))
}

fn parse_background(raw: Option<&str>) -> Result<Option<Color>, ExecutionOutcome> {
    raw.map(|raw| {
        raw.parse::<Color>()
            .map_err(|err| bad_colour_outcome(raw, &err.to_string()))
    })
    .transpose()
}

fn canvas_outcome(canvas: &Canvas, mode: RenderMode) -> ExecutionOutcome {
    let (columns, rows) = canvas.size();
    ExecutionOutcome::success(
        format!("rendered {columns}x{rows} canvas"),
        json!({
            "columns": columns,
            "rows": rows,
            "background": canvas.background().to_string(),
            "color": mode == RenderMode::Ansi,
            "lines": canvas.lines_plain(),
            "rendered": canvas.render_with(mode),
        }),
    )
}

fn texels_outcome(mode: RenderMode) -> ExecutionOutcome {
    let showcase = texel_showcase();
    let mut entries = Vec::with_capacity(showcase.len());
    let mut rendered = Vec::with_capacity(showcase.len());
    let mut lines = Vec::with_capacity(showcase.len());
    for (label, texel) in &showcase {
        let caption = format!("{:<9}", format!("{label}:"));
        let cell = match mode {
            RenderMode::Ansi => texel.render(),
            RenderMode::Plain => texel.glyph().to_string(),
        };
        rendered.push(format!("{caption}{cell}"));
        lines.push(format!("{caption}{}", texel.glyph()));
        entries.push(json!({ "label": label, "sgr": texel.render() }));
    }
    ExecutionOutcome::success(
        format!("rendered {} texels", showcase.len()),
        json!({
            "color": mode == RenderMode::Ansi,
            "texels": entries,
            "lines": lines,
            "rendered": rendered.join("\n"),
        }),
    )
}

/// Reports an error from [`execute`] as a [`crate::CommandStatus::Failure`].
#[must_use]
pub fn failure_outcome(err: &anyhow::Error) -> ExecutionOutcome {
    let issues: Vec<String> = err.chain().map(ToString::to_string).collect();
    ExecutionOutcome::failure(
        format!("{err:#}"),
        json!({
            "error": err.to_string(),
            "issues": issues,
        }),
    )
}

/// `{status, message, details}` envelope for `--json`.
#[must_use]
pub fn to_json_response(command: &CanvasCommand, outcome: &ExecutionOutcome) -> Value {
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": outcome.status.as_str(),
        "message": format_status_message(command, &outcome.message),
        "details": details,
        "version": TCANVAS_VERSION,
    })
}

#[must_use]
pub fn format_status_message(command: &CanvasCommand, message: &str) -> String {
    let prefix = format!("tcanvas {}", command.name());
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::core::config::{EnvSnapshot, TerminalProbe};
    use crate::core::tooling::outcome::CommandStatus;

    use super::*;

    struct NoTerminal;

    impl TerminalProbe for NoTerminal {
        fn size(&self) -> Option<(usize, usize)> {
            None
        }
    }

    fn config(pairs: &[(&str, &str)]) -> Config {
        Config::from_snapshot(&EnvSnapshot::testing(pairs), &NoTerminal)
    }

    fn plain() -> GlobalOptions {
        GlobalOptions {
            no_color: true,
            ..GlobalOptions::default()
        }
    }

    #[test]
    fn demo_renders_plain_lines() {
        let outcome = execute_with(&plain(), &config(&[]), &CanvasCommand::Demo).unwrap();
        assert!(outcome.status.is_ok());
        assert_eq!(outcome.details["columns"], 20);
        assert_eq!(outcome.details["rows"], 10);
        assert_eq!(outcome.details["color"], false);
        let rendered = outcome.details["rendered"].as_str().unwrap();
        assert!(!rendered.contains('\x1b'));
        assert_eq!(rendered.lines().count(), 10);
    }

    #[test]
    fn colour_follows_environment() {
        let outcome = execute_with(
            &GlobalOptions::default(),
            &config(&[]),
            &CanvasCommand::Texels,
        )
        .unwrap();
        assert!(outcome.details["rendered"]
            .as_str()
            .unwrap()
            .contains("\x1b[39;49;7mI\x1b[0m"));

        let outcome = execute_with(
            &GlobalOptions::default(),
            &config(&[("NO_COLOR", "1")]),
            &CanvasCommand::Texels,
        )
        .unwrap();
        assert_eq!(outcome.details["lines"][0], "Empty:    ");
        assert!(!outcome.details["rendered"].as_str().unwrap().contains('\x1b'));
    }

    #[test]
    fn blank_uses_configured_size() {
        let command = CanvasCommand::Blank(BlankRequest::default());
        let outcome = execute_with(&plain(), &config(&[("COLUMNS", "7"), ("LINES", "2")]), &command)
            .unwrap();
        assert_eq!(outcome.details["lines"], json!(["       ", "       "]));
    }

    #[test]
    fn bad_background_is_a_user_error() {
        let command = CanvasCommand::Blank(BlankRequest {
            background: Some("nope".to_string()),
            ..BlankRequest::default()
        });
        let outcome = execute_with(&plain(), &config(&[]), &command).unwrap();
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert!(outcome.hint().is_some());
    }

    #[test]
    fn draw_applies_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[canvas]\ncolumns = 3\nrows = 1\nbackground = \"b\"\n\n[[shapes]]\nkind = \"line\"\nfrom = [0, 0]\nto = [9, 0]\nchar = \"-\""
        )
        .unwrap();
        let command = CanvasCommand::Draw(DrawRequest {
            scene: file.path().to_path_buf(),
            columns: Some(5),
            rows: None,
            background: Some("r".to_string()),
        });
        let outcome = execute_with(&plain(), &config(&[]), &command).unwrap();
        assert_eq!(outcome.details["lines"], json!(["-----"]));
        assert_eq!(outcome.details["background"], "r");
    }

    #[test]
    fn missing_scene_is_a_user_error() {
        let command = CanvasCommand::Draw(DrawRequest {
            scene: PathBuf::from("/definitely/not/here.toml"),
            columns: None,
            rows: None,
            background: None,
        });
        let outcome = execute_with(&plain(), &config(&[]), &command).unwrap();
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert_eq!(outcome.details["scene"], "/definitely/not/here.toml");
    }

    fn draw_request(scene: &std::path::Path) -> CanvasCommand {
        CanvasCommand::Draw(DrawRequest {
            scene: scene.to_path_buf(),
            columns: None,
            rows: None,
            background: None,
        })
    }

    #[test]
    fn oversized_scene_canvas_is_a_user_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[canvas]\ncolumns = 4294967296\nrows = 4294967296").unwrap();
        let outcome = execute_with(&plain(), &config(&[]), &draw_request(file.path())).unwrap();
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert!(outcome.message.contains("too large"), "{}", outcome.message);
        assert!(outcome.hint().is_some());
    }

    #[test]
    fn oversized_environment_size_is_a_user_error() {
        let command = CanvasCommand::Blank(BlankRequest::default());
        let outcome = execute_with(
            &plain(),
            &config(&[("TCANVAS_COLUMNS", "100000"), ("TCANVAS_ROWS", "3")]),
            &command,
        )
        .unwrap();
        assert_eq!(outcome.status, CommandStatus::UserError);
    }

    #[test]
    fn non_utf8_scene_is_a_user_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'\n']).unwrap();
        let outcome = execute_with(&plain(), &config(&[]), &draw_request(file.path())).unwrap();
        assert_eq!(outcome.status, CommandStatus::UserError);
        assert_eq!(outcome.hint(), Some("scene files must be UTF-8 encoded TOML"));
    }

    #[test]
    fn unreadable_scene_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute_with(&plain(), &config(&[]), &draw_request(dir.path())).unwrap_err();
        let outcome = failure_outcome(&err);
        assert_eq!(outcome.status, CommandStatus::Failure);
        assert!(outcome.message.starts_with("reading "), "{}", outcome.message);
        assert_eq!(
            to_json_response(&draw_request(dir.path()), &outcome)["status"],
            "failure"
        );
    }

    #[test]
    fn json_envelope_shape() {
        let outcome = ExecutionOutcome::success("rendered 1x1 canvas", Value::Null);
        let payload = to_json_response(&CanvasCommand::Demo, &outcome);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["message"], "tcanvas demo: rendered 1x1 canvas");
        assert_eq!(payload["details"], json!({}));
    }
}
