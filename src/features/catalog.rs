use crate::gfx::draw::DrawContext;
use crate::track::{ElementMetrics, TrackSurface};
use std::cell::RefCell;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

struct RowLayout {
    items: Vec<String>,
    gap: f64,
    cell_px: f64,
    x_percent: Vec<f64>,
}

impl RowLayout {
    fn widths(&self) -> impl Iterator<Item = f64> + '_ {
        self.items
            .iter()
            .map(|item| item.width() as f64 * self.cell_px)
    }
}

/// A row of text labels laid out left to right with a fixed gap.
///
/// Widths are measured in pixels, `cell_px` per terminal cell, so wide
/// glyphs count twice. The marquee
/// owns one clone as its surface while the renderer keeps another.
#[derive(Clone)]
pub struct CatalogRow {
    layout: Rc<RefCell<RowLayout>>,
}

impl CatalogRow {
    pub fn new(items: Vec<String>, gap_cells: u32, cell_px: f64) -> Self {
        let count = items.len();
        Self {
            layout: Rc::new(RefCell::new(RowLayout {
                items,
                gap: gap_cells as f64 * cell_px,
                cell_px,
                x_percent: vec![0.0; count],
            })),
        }
    }

    pub fn gap_px(&self) -> f64 {
        self.layout.borrow().gap
    }

    pub fn len(&self) -> usize {
        self.layout.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Paints every label at its laid-out position plus its current transform.
    pub fn draw(&self, draw: &mut DrawContext, row: usize) {
        let layout = self.layout.borrow();
        if layout.cell_px <= 0.0 {
            return;
        }
        let mut offset = 0.0;
        for ((item, width), x_percent) in layout
            .items
            .iter()
            .zip(layout.widths())
            .zip(&layout.x_percent)
        {
            let px = offset + x_percent / 100.0 * width;
            draw.text(px / layout.cell_px, row, item);
            offset += width + layout.gap;
        }
    }
}

impl TrackSurface for CatalogRow {
    fn measure(&self) -> Vec<ElementMetrics> {
        let layout = self.layout.borrow();
        let mut offset = 0.0;
        layout
            .widths()
            .zip(&layout.x_percent)
            .map(|(width, x_percent)| {
                let metrics = ElementMetrics {
                    x_percent: *x_percent,
                    ..ElementMetrics::new(offset, width)
                };
                offset += width + layout.gap;
                metrics
            })
            .collect()
    }

    fn set_x_percent(&mut self, index: usize, x_percent: f64) {
        if let Some(slot) = self.layout.borrow_mut().x_percent.get_mut(index) {
            *slot = x_percent;
        }
    }
}

impl std::fmt::Debug for CatalogRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let layout = self.layout.borrow();
        f.debug_struct("CatalogRow")
            .field("items", &layout.items)
            .field("gap", &layout.gap)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> CatalogRow {
        CatalogRow::new(vec!["ab".into(), "cde".into()], 2, 10.0)
    }

    #[test]
    fn measures_labels_in_pixels() {
        let metrics = row().measure();
        assert_eq!(metrics[0], ElementMetrics::new(0.0, 20.0));
        assert_eq!(metrics[1], ElementMetrics::new(40.0, 30.0));
    }

    #[test]
    fn wide_labels_measure_by_display_width() {
        let row = CatalogRow::new(vec!["日本".into(), "a".into()], 1, 10.0);
        let metrics = row.measure();
        assert_eq!(metrics[0].width, 40.0);
        assert_eq!(metrics[1].offset_left, 50.0);

        let mut draw = DrawContext::new();
        draw.begin([7, 1]);
        row.draw(&mut draw, 0);
        assert_eq!(draw.flush(), "日本 a ");
    }

    #[test]
    fn transforms_shift_the_painted_label() {
        let mut row = row();
        row.set_x_percent(1, -50.0);
        row.set_x_percent(9, 50.0);

        let mut draw = DrawContext::new();
        draw.begin([8, 1]);
        row.draw(&mut draw, 0);
        assert_eq!(draw.flush(), "ab cde  ");
        assert_eq!(row.measure()[1].x_percent, -50.0);
    }
}
