//! TOML scene files: a canvas description plus an ordered list of shapes.
//!
//! ```toml
//! [canvas]
//! columns = 20
//! rows = 10
//! background = "K"
//!
//! [[shapes]]
//! kind = "line"
//! from = [-1, 5]
//! to = [10, -2]
//! bg = "r"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tcanvas_domain::{Attribute, Brush, BrushError, Color, Point};
use toml_edit::{DocumentMut, Item};
use tracing::debug;

use crate::core::canvas::Canvas;
use crate::core::config::SizeConfig;
use crate::core::geometry::Geometry2D;
use crate::core::transform::{Affine, Transform, TransformSpec};

/// Furthest a shape may reach from the origin once transformed, in cells.
/// Keeps fills and far-off lines bounded.
pub const MAX_COORDINATE: f64 = 65_536.0;

const BRUSH_KEYS: &[&str] = &[
    "char", "fg", "bg", "bold", "faint", "italic", "underline", "blink", "inverse", "cross",
    "overline",
];

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read scene {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid scene: {0}")]
    Parse(#[from] toml_edit::de::Error),
    #[error("shape #{index}: {source}")]
    Brush {
        index: usize,
        #[source]
        source: BrushError,
    },
    #[error("shape #{index}: unknown key `{key}` for a {kind}")]
    UnknownKey {
        index: usize,
        kind: &'static str,
        key: String,
    },
    #[error(
        "shape #{index} reaches ({x}, {y}); coordinates must be finite and within ±{limit}",
        limit = MAX_COORDINATE
    )]
    OutOfRange { index: usize, x: f64, y: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasSpec {
    pub columns: Option<usize>,
    pub rows: Option<usize>,
    pub background: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Point {
        at: Point,
    },
    Text {
        at: Point,
        text: String,
    },
    Line {
        from: Point,
        to: Point,
    },
    Triangle {
        vertices: [Point; 3],
        #[serde(default = "filled")]
        fill: bool,
    },
    Polygon {
        vertices: Vec<Point>,
        #[serde(default = "filled")]
        fill: bool,
    },
    Rectangle {
        from: Point,
        to: Point,
        #[serde(default = "filled")]
        fill: bool,
    },
}

fn filled() -> bool {
    true
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point { .. } => "point",
            Shape::Text { .. } => "text",
            Shape::Line { .. } => "line",
            Shape::Triangle { .. } => "triangle",
            Shape::Polygon { .. } => "polygon",
            Shape::Rectangle { .. } => "rectangle",
        }
    }

    fn keys(&self) -> &'static [&'static str] {
        match self {
            Shape::Point { .. } => &["at"],
            Shape::Text { .. } => &["at", "text"],
            Shape::Line { .. } => &["from", "to"],
            Shape::Triangle { .. } | Shape::Polygon { .. } => &["vertices", "fill"],
            Shape::Rectangle { .. } => &["from", "to", "fill"],
        }
    }

    /// Points whose images bound everything the shape paints under an
    /// affine transform.
    fn corners(&self) -> Vec<Point> {
        match self {
            Shape::Point { at } | Shape::Text { at, .. } => vec![*at],
            Shape::Line { from, to } => vec![*from, *to],
            Shape::Triangle { vertices, .. } => vertices.to_vec(),
            Shape::Polygon { vertices, .. } => vertices.clone(),
            Shape::Rectangle { from, to, .. } => vec![
                *from,
                Point::new(from.x, to.y),
                *to,
                Point::new(to.x, from.y),
            ],
        }
    }

    pub fn draw(&self, canvas: &mut Canvas, transform: Option<&dyn Transform>, brush: &Brush) {
        match self {
            Shape::Point { at } => canvas.set(*at, transform, brush),
            Shape::Text { at, text } => canvas.text(*at, text, transform, brush),
            Shape::Line { from, to } => canvas.line(*from, *to, transform, brush),
            Shape::Triangle {
                vertices: [a, b, c],
                fill,
            } => canvas.triangle(*a, *b, *c, transform, *fill, brush),
            Shape::Polygon { vertices, fill } => canvas.polygon(vertices, transform, *fill, brush),
            Shape::Rectangle { from, to, fill } => {
                canvas.rectangle(*from, *to, transform, *fill, brush);
            }
        }
    }
}

/// Brush fields as written next to a shape.
#[derive(Debug, Clone, Default, Deserialize)]
struct BrushSpec {
    #[serde(rename = "char")]
    character: Option<String>,
    fg: Option<Color>,
    bg: Option<Color>,
    bold: Option<bool>,
    faint: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
    blink: Option<bool>,
    inverse: Option<bool>,
    cross: Option<bool>,
    overline: Option<bool>,
}

impl BrushSpec {
    fn to_brush(&self) -> Result<Brush, BrushError> {
        let mut brush = Brush::new();
        if let Some(character) = &self.character {
            brush = brush.character_str(character)?;
        }
        if let Some(fg) = self.fg {
            brush = brush.fg(fg);
        }
        if let Some(bg) = self.bg {
            brush = brush.bg(bg);
        }
        let toggles = [
            (Attribute::Bold, self.bold),
            (Attribute::Faint, self.faint),
            (Attribute::Italic, self.italic),
            (Attribute::Underline, self.underline),
            (Attribute::Blink, self.blink),
            (Attribute::Inverse, self.inverse),
            (Attribute::Cross, self.cross),
            (Attribute::Overline, self.overline),
        ];
        for (attribute, toggle) in toggles {
            if let Some(on) = toggle {
                brush = brush.attribute(attribute, on);
            }
        }
        Ok(brush)
    }
}

#[derive(Deserialize)]
struct RawShape {
    #[serde(flatten)]
    shape: Shape,
    #[serde(flatten)]
    brush: BrushSpec,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    #[serde(default)]
    canvas: CanvasSpec,
    #[serde(default)]
    transform: Option<TransformSpec>,
    #[serde(default)]
    shapes: Vec<RawShape>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub canvas: CanvasSpec,
    transform: Option<Affine>,
    strokes: Vec<(Shape, Brush)>,
}

impl Scene {
    pub fn from_toml_str(text: &str) -> Result<Self, SceneError> {
        let file: SceneFile = toml_edit::de::from_str(text)?;
        let doc: DocumentMut = text.parse().map_err(toml_edit::de::Error::from)?;
        let written = shape_keys(&doc);
        let transform = file.transform.as_ref().map(Affine::from);

        let mut strokes = Vec::with_capacity(file.shapes.len());
        for (index, raw) in file.shapes.into_iter().enumerate() {
            let shape = raw.shape;
            let keys = written.get(index).map_or(&[][..], Vec::as_slice);
            if let Some(key) = keys.iter().find(|key| {
                key.as_str() != "kind"
                    && !shape.keys().contains(&key.as_str())
                    && !BRUSH_KEYS.contains(&key.as_str())
            }) {
                return Err(SceneError::UnknownKey {
                    index,
                    kind: shape.kind(),
                    key: key.clone(),
                });
            }
            for corner in shape.corners() {
                let reached = transform.as_ref().map_or(corner, |t| t.apply(corner));
                let inside = |v: f64| v.is_finite() && v.abs() <= MAX_COORDINATE;
                if !(inside(reached.x) && inside(reached.y)) {
                    return Err(SceneError::OutOfRange {
                        index,
                        x: reached.x,
                        y: reached.y,
                    });
                }
            }
            let brush = raw
                .brush
                .to_brush()
                .map_err(|source| SceneError::Brush { index, source })?;
            strokes.push((shape, brush));
        }
        Ok(Self {
            canvas: file.canvas,
            transform,
            strokes,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_toml_str(&text)?;
        debug!(
            path = %path.display(),
            shapes = scene.strokes.len(),
            "loaded scene"
        );
        Ok(scene)
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.strokes.iter().map(|(shape, _)| shape)
    }

    /// Size declared by the scene, with gaps filled from `fallback`.
    #[must_use]
    pub fn canvas_size(&self, fallback: &SizeConfig) -> (usize, usize) {
        let (columns, rows) = fallback.resolve();
        (
            self.canvas.columns.unwrap_or(columns),
            self.canvas.rows.unwrap_or(rows),
        )
    }

    /// Draws every shape in file order; later shapes paint over earlier ones.
    pub fn draw(&self, canvas: &mut Canvas) {
        let transform = self.transform.as_ref().map(|t| t as &dyn Transform);
        for (shape, brush) in &self.strokes {
            shape.draw(canvas, transform, brush);
        }
    }
}

/// Keys written in each `[[shapes]]` entry, in file order.
fn shape_keys(doc: &DocumentMut) -> Vec<Vec<String>> {
    match doc.get("shapes") {
        Some(Item::ArrayOfTables(tables)) => tables
            .iter()
            .map(|table| table.iter().map(|(key, _)| key.to_string()).collect())
            .collect(),
        Some(Item::Value(toml_edit::Value::Array(array))) => array
            .iter()
            .map(|value| {
                value.as_inline_table().map_or_else(Vec::new, |table| {
                    table.iter().map(|(key, _)| key.to_string()).collect()
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}
