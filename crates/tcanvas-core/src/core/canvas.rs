use std::io::{self, Write};
use std::ops::RangeInclusive;

use tcanvas_domain::{Brush, Cell, Color, Point, Texel};
use tracing::trace;

use crate::core::config::Config;
use crate::core::geometry::Geometry2D;
use crate::core::transform::Transform;

/// Widest or tallest canvas accepted by [`Canvas::try_new`].
pub const MAX_DIMENSION: usize = 65_535;
/// Most texels a single canvas may hold.
pub const MAX_TEXELS: usize = 1 << 22;

/// How far past the edges a clipped walk keeps going, in cells. A transform
/// can bend the walk away from the straight path between its snapped ends.
const CLIP_MARGIN: f64 = 2.0;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error(
        "a {columns}x{rows} canvas is too large (at most {max_side} per side and {max_texels} texels)",
        max_side = MAX_DIMENSION,
        max_texels = MAX_TEXELS
    )]
    TooLarge { columns: usize, rows: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Every texel wrapped in its SGR sequence.
    Ansi,
    /// Characters only.
    Plain,
}

/// A grid of texels, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    columns: usize,
    rows: usize,
    background: Color,
    buffer: Vec<Texel>,
}

impl Canvas {
    /// A blank canvas. Sizes past [`MAX_DIMENSION`] or [`MAX_TEXELS`] are
    /// clamped; [`Canvas::try_new`] rejects them instead.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        let columns = columns.min(MAX_DIMENSION);
        let rows = rows.min(MAX_DIMENSION).min(MAX_TEXELS / columns.max(1));
        let mut canvas = Self {
            columns,
            rows,
            background: Color::Default,
            buffer: Vec::new(),
        };
        canvas.clear();
        canvas
    }

    /// # Errors
    /// Returns [`CanvasError::TooLarge`] when either side exceeds
    /// [`MAX_DIMENSION`] or the grid would hold more than [`MAX_TEXELS`].
    pub fn try_new(columns: usize, rows: usize) -> Result<Self, CanvasError> {
        let fits = columns <= MAX_DIMENSION
            && rows <= MAX_DIMENSION
            && columns
                .checked_mul(rows)
                .is_some_and(|texels| texels <= MAX_TEXELS);
        if fits {
            Ok(Self::new(columns, rows))
        } else {
            Err(CanvasError::TooLarge { columns, rows })
        }
    }

    /// A canvas filling the terminal, as far as the configuration can tell.
    #[must_use]
    pub fn for_terminal(config: &Config) -> Self {
        let (columns, rows) = config.size().resolve();
        Self::new(columns, rows)
    }

    /// Sets the colour blank texels are painted with and clears the canvas.
    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self.clear();
        self
    }

    /// `(columns, rows)`.
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn clear(&mut self) {
        let blank = Texel::blank().bg(self.background);
        self.buffer = vec![blank; self.columns * self.rows];
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let column = usize::try_from(cell.column).ok()?;
        let row = usize::try_from(cell.row).ok()?;
        (column < self.columns && row < self.rows).then(|| row * self.columns + column)
    }

    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<&Texel> {
        self.index(cell).map(|idx| &self.buffer[idx])
    }

    /// Paints one cell. Returns `false` when the cell lies off the canvas.
    pub fn set_cell(&mut self, cell: Cell, brush: &Brush) -> bool {
        match self.index(cell) {
            Some(idx) => {
                brush.apply(&mut self.buffer[idx]);
                true
            }
            None => {
                trace!(column = cell.column, row = cell.row, "clipped write");
                false
            }
        }
    }

    /// Writes `text` starting at `pos`. A newline continues on the next row
    /// at the starting column.
    pub fn text(
        &mut self,
        pos: impl Into<Point>,
        text: &str,
        transform: Option<&dyn Transform>,
        brush: &Brush,
    ) {
        let pos = pos.into();
        let pos = transform.map_or(pos, |t| t.apply(pos));
        if !pos.is_finite() {
            return;
        }
        let start = pos.round();
        let mut cell = start;
        let mut stroke = brush.clone();
        for character in text.chars() {
            if character == '\n' {
                cell = Cell::new(start.column, cell.row + 1);
                continue;
            }
            stroke.character = Some(character);
            self.set_cell(cell, &stroke);
            cell.column += 1;
        }
    }

    fn rows(&self) -> impl Iterator<Item = &[Texel]> {
        // chunks() rejects a zero chunk size
        self.buffer.chunks(self.columns.max(1))
    }

    #[must_use]
    pub fn render_with(&self, mode: RenderMode) -> String {
        let lines: Vec<String> = match mode {
            RenderMode::Ansi => self
                .rows()
                .map(|row| row.iter().map(Texel::render).collect())
                .collect(),
            RenderMode::Plain => self.lines_plain(),
        };
        lines.join("\n")
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.render_with(RenderMode::Ansi)
    }

    #[must_use]
    pub fn render_plain(&self) -> String {
        self.render_with(RenderMode::Plain)
    }

    #[must_use]
    pub fn lines_plain(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(Texel::glyph).collect())
            .collect()
    }

    pub fn show(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.render())
    }
}

impl Geometry2D for Canvas {
    fn set(&mut self, pos: Point, transform: Option<&dyn Transform>, brush: &Brush) {
        let pos = transform.map_or(pos, |t| t.apply(pos));
        if !pos.is_finite() {
            trace!(x = pos.x, y = pos.y, "skipped non-finite position");
            return;
        }
        self.set_cell(pos.round(), brush);
    }

    fn visible_steps(&self, from: Cell, to: Cell, steps: u64) -> Option<RangeInclusive<u64>> {
        clip_walk(from, to, steps, self.columns, self.rows)
    }
}

/// Liang-Barsky clip of the walk `from..=to` against the canvas grown by
/// [`CLIP_MARGIN`], expressed as DDA indices.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn clip_walk(
    from: Cell,
    to: Cell,
    steps: u64,
    columns: usize,
    rows: usize,
) -> Option<RangeInclusive<u64>> {
    let (x0, y0) = (from.column as f64, from.row as f64);
    let dc = i128::from(to.column) - i128::from(from.column);
    let dr = i128::from(to.row) - i128::from(from.row);
    let right = columns as f64 - 1.0 + CLIP_MARGIN;
    let bottom = rows as f64 - 1.0 + CLIP_MARGIN;

    // Each entry (p, q) keeps the part of the walk where t * p <= q.
    let edges = [
        (-dc, x0 + CLIP_MARGIN),
        (dc, right - x0),
        (-dr, y0 + CLIP_MARGIN),
        (dr, bottom - y0),
    ];
    let (mut enter, mut leave) = (0.0_f64, 1.0_f64);
    for (p, q) in edges {
        if p == 0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p as f64;
        if p < 0 {
            enter = enter.max(t);
        } else {
            leave = leave.min(t);
        }
    }
    if enter > leave {
        return None;
    }

    let n = steps as f64;
    let first = (enter * n).floor() as u64;
    let last = ((leave * n).ceil() as u64).min(steps);
    Some(first.min(last)..=last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcanvas_domain::Palette;

    #[test]
    fn new_canvas_is_blank_with_background() {
        let canvas = Canvas::new(3, 2).with_background(Palette::BrightBlack.into());
        assert_eq!(canvas.size(), (3, 2));
        let texel = canvas.get(Cell::new(2, 1)).unwrap();
        assert_eq!(texel.character, None);
        assert_eq!(texel.bg, Color::Palette(Palette::BrightBlack));
        assert!(canvas.get(Cell::new(3, 0)).is_none());
        assert!(canvas.get(Cell::new(0, -1)).is_none());
    }

    #[test]
    fn oversized_canvases_are_rejected() {
        let err = Canvas::try_new(4_294_967_296, 4_294_967_296).unwrap_err();
        assert!(matches!(err, CanvasError::TooLarge { .. }));
        assert!(Canvas::try_new(MAX_DIMENSION + 1, 1).is_err());
        assert!(Canvas::try_new(2048, 2049).is_err());
        assert_eq!(Canvas::try_new(100, 40).unwrap().size(), (100, 40));
    }

    #[test]
    fn new_clamps_to_the_limits() {
        assert_eq!(Canvas::new(usize::MAX, 1).size(), (MAX_DIMENSION, 1));
        assert_eq!(Canvas::new(1, usize::MAX).size(), (1, MAX_DIMENSION));
    }

    #[test]
    fn far_line_only_walks_the_canvas() {
        let mut canvas = Canvas::new(4, 1);
        canvas.line((0, 0), (1e12, 0.0), None, &Brush::new().character('x'));
        assert_eq!(canvas.lines_plain(), vec!["xxxx"]);

        let mut canvas = Canvas::new(4, 1);
        canvas.line((-1e12, 0.0), (1e12, 0.0), None, &Brush::new().character('-'));
        assert_eq!(canvas.lines_plain(), vec!["----"]);
    }

    #[test]
    fn extreme_coordinates_do_not_panic() {
        let mut canvas = Canvas::new(4, 1);
        canvas.line((-1e300, 0.0), (1e300, 0.0), None, &Brush::new().character('x'));
        canvas.line((0.0, 0.0), (f64::INFINITY, 0.0), None, &Brush::new().character('x'));
        assert_eq!(canvas.size(), (4, 1));
    }

    #[test]
    fn non_finite_positions_paint_nothing() {
        let mut canvas = Canvas::new(2, 1);
        canvas.set(Point::new(f64::NAN, 0.0), None, &Brush::new().character('x'));
        canvas.text((f64::NEG_INFINITY, 0.0), "ab", None, &Brush::new());
        assert_eq!(canvas.lines_plain(), vec!["  "]);
    }

    #[test]
    fn line_crossing_the_canvas_keeps_its_cells() {
        let mut canvas = Canvas::new(5, 5);
        canvas.line((-20, -20), (20, 20), None, &Brush::new().character('\\'));
        assert_eq!(
            canvas.lines_plain(),
            vec!["\\    ", " \\   ", "  \\  ", "   \\ ", "    \\"]
        );
    }

    #[test]
    fn terminal_canvas_takes_configured_size() {
        struct Tty;
        impl crate::core::config::TerminalProbe for Tty {
            fn size(&self) -> Option<(usize, usize)> {
                Some((100, 30))
            }
        }
        let snapshot = crate::core::config::EnvSnapshot::testing(&[("LINES", "5")]);
        let config = Config::from_snapshot(&snapshot, &Tty);
        assert_eq!(Canvas::for_terminal(&config).size(), (100, 5));
    }

    #[test]
    fn writes_outside_are_clipped() {
        let mut canvas = Canvas::new(2, 2);
        assert!(!canvas.set_cell(Cell::new(-1, 0), &Brush::new().character('x')));
        assert!(!canvas.set_cell(Cell::new(0, 2), &Brush::new().character('x')));
        assert!(canvas.set_cell(Cell::new(1, 1), &Brush::new().character('x')));
        assert_eq!(canvas.lines_plain(), vec!["  ".to_string(), " x".to_string()]);
    }

    #[test]
    fn text_wraps_on_newline_and_clips() {
        let mut canvas = Canvas::new(6, 3);
        canvas.text((3, 0), "abcd\nef", None, &Brush::new());
        assert_eq!(canvas.lines_plain(), vec!["   abc", "   ef ", "      "]);
    }

    #[test]
    fn text_keeps_brush_colours() {
        let mut canvas = Canvas::new(2, 1);
        canvas.text((0, 0), "hi", None, &Brush::new().fg(Palette::Red.into()));
        let texel = canvas.get(Cell::new(1, 0)).unwrap();
        assert_eq!(texel.character, Some('i'));
        assert_eq!(texel.fg, Color::Palette(Palette::Red));
    }

    #[test]
    fn clear_resets_everything() {
        let mut canvas = Canvas::new(2, 1).with_background(Palette::Blue.into());
        canvas.set((0.0, 0.0).into(), None, &Brush::new().character('*').bg(Palette::Red.into()));
        canvas.clear();
        let texel = canvas.get(Cell::new(0, 0)).unwrap();
        assert_eq!(*texel, Texel::blank().bg(Palette::Blue.into()));
    }

    #[test]
    fn renders_rows_joined_by_newline() {
        let mut canvas = Canvas::new(2, 2);
        canvas.set((0, 0).into(), None, &Brush::new().character('*'));
        let blank = Texel::blank().render();
        let star = Texel::new('*').render();
        assert_eq!(canvas.render(), format!("{star}{blank}\n{blank}{blank}"));
        assert_eq!(canvas.render_plain(), "* \n  ");
    }

    #[test]
    fn show_writes_render_and_newline() {
        let canvas = Canvas::new(1, 1);
        let mut out = Vec::new();
        canvas.show(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", canvas.render()));
    }

    #[test]
    fn zero_sized_canvas_renders_nothing() {
        let mut canvas = Canvas::new(0, 0);
        canvas.line((0, 0), (5, 5), None, &Brush::new().character('x'));
        assert_eq!(canvas.render(), "");
        assert!(canvas.lines_plain().is_empty());
    }

    #[test]
    fn line_recolours_without_replacing_characters() {
        let mut canvas = Canvas::new(4, 1);
        canvas.text((0, 0), "abcd", None, &Brush::new());
        canvas.line((0, 0), (3, 0), None, &Brush::new().bg(Palette::Red.into()));
        assert_eq!(canvas.lines_plain(), vec!["abcd"]);
        assert_eq!(
            canvas.get(Cell::new(2, 0)).unwrap().bg,
            Color::Palette(Palette::Red)
        );
    }
}
