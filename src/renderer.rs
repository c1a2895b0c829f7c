//! # Watchface Rendering
//!
//! This module draws the compositor's layer tree either onto any monochrome
//! embedded-graphics draw target or as ASCII for terminal output.
//!
//! Every layer is clipped to its own frame, so a line slot sliding past the
//! screen edge is cut off exactly where a real display would cut it.
//!
//! [`draw_braille`] renders the full-resolution face into a [`Canvas`] and
//! prints it as Braille, two by four pixels per character.

use crate::compositor::{Compositor, LayerView};
use crate::host::Font;
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_6X10, FONT_6X13_BOLD, FONT_9X18, FONT_9X18_BOLD},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PointsIter, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use std::convert::Infallible;

/// Pixels per ASCII column
const ASCII_COLUMN_PX: i32 = 6;
/// Pixels per ASCII row
const ASCII_ROW_PX: i32 = 8;

/// Code point of the empty Braille cell
const BRAILLE_BASE: u32 = 0x2800;
/// Dot bit for each pixel of a Braille cell, indexed `[column][row]`
const BRAILLE_DOTS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Bold => &FONT_9X18_BOLD,
        Font::Light => &FONT_9X18,
        Font::Small => &FONT_6X10,
        Font::SmallBold => &FONT_6X13_BOLD,
    }
}

/// Horizontal anchor of a layer's text for its alignment.
fn anchor(layer: &LayerView<'_>) -> Point {
    let frame = layer.frame;
    let x = match layer.style.alignment {
        Alignment::Left => frame.top_left.x,
        Alignment::Center => frame.top_left.x + frame.size.width as i32 / 2,
        Alignment::Right => frame.top_left.x + frame.size.width as i32,
    };
    Point::new(x, frame.top_left.y)
}

/// Draw every live layer onto `display`.
///
/// Light text on a dark background, or the reverse when `invert` is set.
pub fn draw_face<D>(compositor: &Compositor, display: &mut D, invert: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let (background, foreground) = if invert {
        (BinaryColor::On, BinaryColor::Off)
    } else {
        (BinaryColor::Off, BinaryColor::On)
    };
    display.clear(background)?;

    for layer in compositor.layers() {
        if layer.text.is_empty() {
            continue;
        }

        let character_style = MonoTextStyle::new(mono_font(layer.style.font), foreground);
        let text_style = TextStyleBuilder::new()
            .alignment(layer.style.alignment)
            .baseline(Baseline::Top)
            .build();

        let mut clipped = display.clipped(&layer.frame);
        Text::with_text_style(layer.text, anchor(&layer), character_style, text_style)
            .draw(&mut clipped)?;
    }

    Ok(())
}

/// Render the layer tree as ASCII art, one character per 6x8 pixel cell.
pub fn draw_ascii(compositor: &Compositor) -> String {
    let bounds = compositor.bounds();
    let columns = (bounds.width as i32 / ASCII_COLUMN_PX).max(1) as usize;
    let rows = (bounds.height as i32 / ASCII_ROW_PX).max(1) as usize;
    let mut grid = vec![vec![' '; columns]; rows];

    for layer in compositor.layers() {
        let frame = layer.frame;
        let row = frame.top_left.y / ASCII_ROW_PX;
        if row < 0 || row as usize >= rows {
            continue;
        }

        let frame_start = frame.top_left.x.div_euclid(ASCII_COLUMN_PX);
        let frame_end = (frame.top_left.x + frame.size.width as i32).div_euclid(ASCII_COLUMN_PX);
        let len = layer.text.chars().count() as i32;
        let start = match layer.style.alignment {
            Alignment::Left => frame_start,
            Alignment::Center => frame_start + (frame_end - frame_start - len) / 2,
            Alignment::Right => frame_end - len,
        };

        for (offset, ch) in layer.text.chars().enumerate() {
            let column = start + offset as i32;
            // Clip to both the layer frame and the screen
            if column < frame_start.max(0) || column >= frame_end.min(columns as i32) {
                continue;
            }
            grid[row as usize][column as usize] = ch;
        }
    }

    let border = format!("+{}+", "-".repeat(columns));
    let mut out = String::with_capacity((columns + 3) * (rows + 2));
    out.push_str(&border);
    out.push('\n');
    for row in grid {
        out.push('|');
        out.extend(row);
        out.push_str("|\n");
    }
    out.push_str(&border);
    out.push('\n');
    out
}

/// Render the face pixel for pixel and print it as Braille text.
///
/// Honours `invert` the same way [`draw_face`] does.
pub fn draw_braille(compositor: &Compositor, invert: bool) -> String {
    let mut canvas = Canvas::new(compositor.bounds());
    if let Err(never) = draw_face(compositor, &mut canvas, invert) {
        match never {}
    }
    canvas.to_braille()
}

/// In-memory monochrome framebuffer.
///
/// Pixels drawn outside the canvas are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: Size,
    pixels: Vec<BinaryColor>,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![BinaryColor::Off; (size.width * size.height) as usize],
        }
    }

    fn index(&self, point: Point) -> Option<usize> {
        let (x, y) = (point.x, point.y);
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        self.index(point).map(|i| self.pixels[i])
    }

    /// Lit pixels as Braille characters, one text row per four pixel rows.
    pub fn to_braille(&self) -> String {
        let columns = (self.size.width as usize).div_ceil(2);
        let rows = (self.size.height as usize).div_ceil(4);
        let mut out = String::with_capacity(rows * (columns * 3 + 1));

        for row in 0..rows {
            for column in 0..columns {
                let mut bits = 0u8;
                for (dx, dots) in BRAILLE_DOTS.iter().enumerate() {
                    for (dy, dot) in dots.iter().enumerate() {
                        let point = Point::new((column * 2 + dx) as i32, (row * 4 + dy) as i32);
                        if self.pixel(point) == Some(BinaryColor::On) {
                            bits |= dot;
                        }
                    }
                }
                out.push(char::from_u32(BRAILLE_BASE + u32::from(bits)).unwrap_or(' '));
            }
            out.push('\n');
        }
        out
    }

    /// Number of pixels of `color` inside `area`.
    pub fn count_in(&self, area: &Rectangle, color: BinaryColor) -> usize {
        area.points()
            .filter(|&p| self.pixel(p) == Some(color))
            .count()
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}
