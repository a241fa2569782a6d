use crate::texture::*;
use image::{ImageBuffer, Rgba};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub align: Align,
}

impl Column {
    pub fn left(title: &str) -> Self {
        Self { title: title.to_string(), align: Align::Left }
    }

    pub fn right(title: &str) -> Self {
        Self { title: title.to_string(), align: Align::Right }
    }
}

/// Sink for human-readable result tables, e.g. a test log.
pub trait TableReporter {
    fn report(&mut self, columns: &[Column], rows: &[Vec<String>]);
}

/// Renders tables as aligned plain text, one after another.
#[derive(Debug, Default, Clone)]
pub struct PlainTextTable {
    output: String,
}

impl PlainTextTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }

    fn push_line(&mut self, cells: impl Iterator<Item = String>) {
        let line = cells.collect::<Vec<_>>().join("  ");
        self.output.push_str(line.trim_end());
        self.output.push('\n');
    }
}

impl TableReporter for PlainTextTable {
    fn report(&mut self, columns: &[Column], rows: &[Vec<String>]) {
        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rows.iter().filter_map(|row| row.get(i)).map(|cell| cell.chars().count()).fold(column.title.len(), usize::max)
            })
            .collect();
        let pad = |text: &str, width: usize, align: Align| match align {
            Align::Left => format!("{text:<width$}"),
            Align::Right => format!("{text:>width$}"),
        };

        self.push_line(columns.iter().zip(&widths).map(|(c, &w)| pad(&c.title, w, c.align)));
        self.push_line(widths.iter().map(|&w| "-".repeat(w)));
        for row in rows {
            let cells = columns.iter().zip(&widths).enumerate().map(|(i, (c, &w))| {
                pad(row.get(i).map_or("", String::as_str), w, c.align)
            });
            self.push_line(cells);
        }
    }
}

/// Writes one level (one layer of it) as an 8-bit RGBA PNG, channels clamped to `[0, 1]`.
pub fn save_level_png<P: AsRef<Path>>(texture: &Texture, level: u32, layer: u32, path: P) -> image::ImageResult<()> {
    let mip = texture.level(level);
    let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(mip.width, mip.height, |x, y| {
        Rgba(texture.texel(TexelLocation::new(level, x, y, layer)).to_array().map(to_u8))
    });
    img.save(path)
}
