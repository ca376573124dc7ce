//! Column-grid placement for the canvas and the preview.
//!
//! Elements flow left to right in document order. An element whose span does
//! not fit in what is left of the current row starts a new row; spans wider
//! than the grid are clamped to the full width.

use eframe::egui;

/// One placed element: its document index, starting column and width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub index: usize,
    pub column: u8,
    pub span: u8,
}

pub fn place(spans: impl IntoIterator<Item = u8>, columns: u8) -> Vec<Vec<Cell>> {
    let columns = columns.max(1);
    let mut rows: Vec<Vec<Cell>> = Vec::new();
    let mut used = columns; // forces a fresh row for the first element

    for (index, span) in spans.into_iter().enumerate() {
        let span = span.clamp(1, columns);
        if used + span > columns {
            rows.push(Vec::new());
            used = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(Cell {
                index,
                column: used,
                span,
            });
        }
        used += span;
    }
    rows
}

/// Screen rect of `cell` in a row starting at `row_top`.
pub fn cell_rect(
    area: egui::Rect,
    columns: u8,
    gap: f32,
    cell: Cell,
    row_top: f32,
    height: f32,
) -> egui::Rect {
    let columns = columns.max(1) as f32;
    let column_width = ((area.width() - gap * (columns - 1.0)) / columns).max(0.0);
    let left = area.left() + cell.column as f32 * (column_width + gap);
    let width = cell.span as f32 * column_width + (cell.span as f32 - 1.0) * gap;
    egui::Rect::from_min_size(egui::pos2(left, row_top), egui::vec2(width, height))
}

/// Lays out one child ui per element and lets `add_cell` fill it. Returns
/// the screen rect each element ended up with, indexed like `spans`.
pub fn show_rows(
    ui: &mut egui::Ui,
    spans: &[u8],
    columns: u8,
    gap: f32,
    mut add_cell: impl FnMut(&mut egui::Ui, usize),
) -> Vec<egui::Rect> {
    let area = ui.available_rect_before_wrap();
    let mut rects = vec![egui::Rect::NOTHING; spans.len()];

    for row in place(spans.iter().copied(), columns) {
        let top = ui.cursor().top();
        let mut bottom = top;
        for cell in row {
            let max_rect = cell_rect(area, columns, gap, cell, top, f32::INFINITY);
            let mut child = ui.child_ui(max_rect, egui::Layout::top_down(egui::Align::LEFT));
            child.set_width(max_rect.width());
            add_cell(&mut child, cell.index);
            let used = child.min_rect();
            rects[cell.index] =
                egui::Rect::from_min_size(used.min, egui::vec2(max_rect.width(), used.height()));
            bottom = bottom.max(used.bottom());
        }
        let row_rect =
            egui::Rect::from_min_max(egui::pos2(area.left(), top), egui::pos2(area.right(), bottom));
        ui.allocate_rect(row_rect, egui::Sense::hover());
        ui.add_space(gap);
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(rows: &[Vec<Cell>]) -> Vec<Vec<(usize, u8, u8)>> {
        rows.iter()
            .map(|r| r.iter().map(|c| (c.index, c.column, c.span)).collect())
            .collect()
    }

    #[test]
    fn single_column_stacks_everything() {
        let rows = place([1, 2, 4], 1);
        assert_eq!(
            shape(&rows),
            vec![vec![(0, 0, 1)], vec![(1, 0, 1)], vec![(2, 0, 1)]]
        );
    }

    #[test]
    fn elements_share_rows_until_full() {
        let rows = place([1, 1, 1, 2, 2], 3);
        assert_eq!(
            shape(&rows),
            vec![
                vec![(0, 0, 1), (1, 1, 1), (2, 2, 1)],
                vec![(3, 0, 2)],
                vec![(4, 0, 2)],
            ]
        );
    }

    #[test]
    fn wide_elements_wrap_and_clamp() {
        let rows = place([1, 4, 1], 2);
        assert_eq!(
            shape(&rows),
            vec![vec![(0, 0, 1)], vec![(1, 0, 2)], vec![(2, 0, 1)]]
        );
        assert!(place(std::iter::empty(), 4).is_empty());
    }

    #[test]
    fn cell_rects_respect_gaps() {
        let area = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(320.0, 500.0));
        let cell = Cell {
            index: 0,
            column: 1,
            span: 2,
        };
        let r = cell_rect(area, 3, 10.0, cell, 40.0, 60.0);
        // column width = (320 - 20) / 3 = 100
        assert_eq!(r.left(), 110.0);
        assert_eq!(r.width(), 210.0);
        assert_eq!(r.top(), 40.0);
        assert_eq!(r.height(), 60.0);
    }

    #[test]
    fn show_rows_reports_a_rect_per_element() {
        let ctx = egui::Context::default();
        let mut rects = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                rects = show_rows(ui, &[1, 1, 2], 2, 8.0, |ui, _| {
                    ui.label("field");
                });
            });
        });
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].top(), rects[1].top());
        assert!(rects[1].left() > rects[0].right());
        assert!(rects[2].top() > rects[0].bottom());
        assert!(rects[2].width() > rects[0].width());
    }
}
