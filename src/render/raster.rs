//! Depth-buffered character rasterizer.
//!
//! Every subsystem that draws (bodies, dust, starfield, portal, lasers)
//! writes through [`DepthBuffer::plot`], which keeps the nearest write per
//! cell. Draw order therefore never affects the composited result.

use bevy::color::{Mix, Srgba};

/// A single composited character cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Srgba,
}

/// Destination for flushed cells and text overlays (the UI text layer).
pub trait TextLayer {
    fn put(&mut self, x: usize, y: usize, glyph: char, color: Srgba);
}

/// Per-frame depth buffer: parallel arrays of depth, glyph and colour.
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depth: Vec<f64>,
    glyph: Vec<char>,
    color: Vec<Srgba>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            depth: vec![f64::INFINITY; len],
            glyph: vec![' '; len],
            color: vec![Srgba::BLACK; len],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.depth.fill(f64::INFINITY);
        self.glyph.fill(' ');
        self.color.fill(Srgba::BLACK);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Write a cell if it is on the grid and strictly nearer than what is
    /// already there. Returns whether the write happened.
    pub fn plot(&mut self, x: i64, y: i64, depth: f64, glyph: char, color: Srgba) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.glyph[idx] = glyph;
            self.color[idx] = color;
            true
        } else {
            false
        }
    }

    /// Stored depth at a cell; +∞ for empty or off-grid cells.
    pub fn depth_at(&self, x: i64, y: i64) -> f64 {
        self.index(x, y).map_or(f64::INFINITY, |idx| self.depth[idx])
    }

    /// Composited cell, if anything was written there.
    pub fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        let idx = self.index(x, y)?;
        self.depth[idx].is_finite().then(|| Cell {
            glyph: self.glyph[idx],
            color: self.color[idx],
        })
    }

    /// Blend every written cell towards black (used while paused).
    pub fn dim(&mut self, amount: f32) {
        for (color, depth) in self.color.iter_mut().zip(&self.depth) {
            if depth.is_finite() {
                *color = color.mix(&Srgba::BLACK, amount);
            }
        }
    }

    /// Copy every written cell to the text layer.
    pub fn flush(&self, layer: &mut impl TextLayer) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                if self.depth[idx].is_finite() {
                    layer.put(x, y, self.glyph[idx], self.color[idx]);
                }
            }
        }
    }
}

/// Owned character grid: the concrete text layer handed to the UI.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<Cell>>,
}

impl GlyphGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    /// Write a string starting at `(x, y)`, clipped to the grid.
    pub fn put_str(&mut self, x: i64, y: i64, text: &str, color: Srgba) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let cx = x + i as i64;
            if cx < 0 {
                continue;
            }
            if cx >= self.width as i64 {
                break;
            }
            self.put(cx as usize, y as usize, ch, color);
        }
    }

    /// A row as plain text, empty cells as spaces.
    pub fn row_string(&self, y: usize) -> String {
        (0..self.width)
            .map(|x| self.get(x, y).map_or(' ', |c| c.glyph))
            .collect()
    }

    /// Iterate rows as runs of same-coloured cells, for UI backends that
    /// draw text spans.
    pub fn row_runs(&self, y: usize) -> Vec<(usize, String, Srgba)> {
        let mut runs: Vec<(usize, String, Srgba)> = Vec::new();
        for x in 0..self.width {
            let Some(cell) = self.get(x, y) else {
                continue;
            };
            match runs.last_mut() {
                Some((start, text, color))
                    if *color == cell.color && *start + text.chars().count() == x =>
                {
                    text.push(cell.glyph);
                }
                _ => runs.push((x, cell.glyph.to_string(), cell.color)),
            }
        }
        runs
    }
}

impl TextLayer for GlyphGrid {
    fn put(&mut self, x: usize, y: usize, glyph: char, color: Srgba) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = Some(Cell { glyph, color });
        }
    }
}
