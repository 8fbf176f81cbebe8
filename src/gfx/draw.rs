use super::math::Rect;
use unicode_width::UnicodeWidthChar;

// Second cell of a double-width glyph; skipped on flush.
const CONTINUATION: char = '\0';

/// A character-cell canvas. Rows are rebuilt every frame with `begin`,
/// filled with `text`, and emitted as one string by `flush`.
#[derive(Debug, Clone)]
pub struct DrawContext {
    cells: Vec<char>,
    viewport: [usize; 2],
}

impl DrawContext {
    pub fn new() -> Self {
        Self {
            cells: Vec::with_capacity(1024),
            viewport: [0, 0],
        }
    }

    pub fn begin(&mut self, viewport: [usize; 2]) {
        self.viewport = viewport;
        self.cells.clear();
        self.cells.resize(viewport[0] * viewport[1], ' ');
    }

    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport[0] as f64, self.viewport[1] as f64)
    }

    /// Writes `label` starting at column `x` (rounded) on `row`, clipping
    /// anything that falls outside the canvas. Wide glyphs take two cells.
    pub fn text(&mut self, x: f64, row: usize, label: &str) {
        let [columns, rows] = self.viewport;
        if row >= rows || !x.is_finite() {
            return;
        }
        let columns = columns as i64;
        let mut col = x.round() as i64;
        for ch in label.chars() {
            let width = ch.width().unwrap_or(0) as i64;
            if width == 0 {
                continue;
            }
            if col >= columns {
                break;
            }
            if col >= 0 && col + width <= columns {
                self.put(row, col as usize, ch, width as usize);
            } else {
                // A glyph cut by an edge shows as blanks.
                for c in col.max(0)..(col + width).min(columns) {
                    self.put(row, c as usize, ' ', 1);
                }
            }
            col += width;
        }
    }

    fn put(&mut self, row: usize, col: usize, ch: char, width: usize) {
        let columns = self.viewport[0];
        let line = &mut self.cells[row * columns..(row + 1) * columns];
        let end = col + width;
        // Never leave half of an overwritten wide glyph behind.
        if line[col] == CONTINUATION && col > 0 {
            line[col - 1] = ' ';
        }
        if end < columns && line[end] == CONTINUATION {
            line[end] = ' ';
        }
        line[col] = ch;
        for cell in &mut line[col + 1..end] {
            *cell = CONTINUATION;
        }
    }

    pub fn flush(&mut self) -> String {
        let [columns, _] = self.viewport;
        if columns == 0 {
            return String::new();
        }
        self.cells
            .chunks(columns)
            .map(|line| line.iter().filter(|c| **c != CONTINUATION).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for DrawContext {
    fn default() -> Self {
        Self::new()
    }
}
