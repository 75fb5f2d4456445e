//! Built-in showcases for eyeballing a terminal's SGR support.

use tcanvas_domain::{Attribute, Brush, Color, Palette, Point, Texel};

use crate::core::canvas::Canvas;
use crate::core::geometry::Geometry2D;

/// One labelled texel per colour form and text effect.
#[must_use]
pub fn texel_showcase() -> Vec<(&'static str, Texel)> {
    let red = Color::Palette(Palette::Red);
    // Components in 0.0..=1.0 always convert.
    let magenta = Color::from_unit_rgb(1.0, 0.0, 1.0).unwrap_or_default();
    vec![
        ("Empty", Texel::blank()),
        ("Default", Texel::new('D')),
        ("Inverse", Texel::new('I').with(Attribute::Inverse)),
        (
            "Colours",
            Texel::new('C').fg(red).bg(Palette::BrightBlack.into()),
        ),
        (
            "RGB",
            Texel::new('R')
                .fg(Color::rgb(0, 255, 0))
                .bg(magenta),
        ),
        ("Bold", Texel::new('B').with(Attribute::Bold)),
        ("Faint", Texel::new('F').with(Attribute::Faint)),
        ("Italic", Texel::new('I').with(Attribute::Italic)),
        ("Under", Texel::new('U').with(Attribute::Underline)),
        ("Cross", Texel::new('S').with(Attribute::Cross)),
        ("Blink", Texel::new('B').with(Attribute::Blink)),
        ("Over", Texel::new('O').with(Attribute::Overline)),
        (
            "Blink c.",
            Texel::new('B')
                .with(Attribute::Blink)
                .fg(Palette::Blue.into())
                .bg(Palette::Yellow.into()),
        ),
    ]
}

/// A 20×10 composition exercising text, clipping and every primitive.
#[must_use]
pub fn demo_canvas() -> Canvas {
    let black = Color::Palette(Palette::Black);
    let mut canvas = Canvas::new(20, 10).with_background(Palette::BrightBlack.into());

    canvas.text((13, 0), "=======\nTCanvas\n=======", None, &Brush::new());
    canvas.set(Point::new(0.0, 0.0), None, &Brush::new().character('*'));
    canvas.set(Point::new(19.0, 9.0), None, &Brush::new().character('#'));

    canvas.line((-1, 5), (10, -2), None, &Brush::new().bg(Palette::Red.into()));
    canvas.line(
        (2, -1),
        (6, 4),
        None,
        &Brush::new()
            .fg(Palette::BrightWhite.into())
            .blink(true)
            .character('x'),
    );

    canvas.triangle(
        (2.6, 4.6),
        (6.4, 8.4),
        (15, 7),
        None,
        true,
        &Brush::new().bg(Palette::Cyan.into()).fg(black),
    );
    canvas.triangle(
        (3, 5),
        (6, 8),
        (15, 7),
        None,
        false,
        &Brush::new().character('t'),
    );

    let pentagon: Vec<Point> = [(10, 5), (18, 6), (19, 8), (18, 9), (12, 6)]
        .into_iter()
        .map(Point::from)
        .collect();
    canvas.polygon(
        &pentagon,
        None,
        true,
        &Brush::new().bg(Palette::Yellow.into()).fg(black),
    );
    canvas.polygon(&pentagon, None, false, &Brush::new().character('p'));

    canvas.rectangle((17, 3), (19, 5), None, true, &Brush::new().character('r'));
    canvas
}
