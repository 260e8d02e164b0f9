use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
};

/// Radius of the clear circle around the pointer.
pub const SPOTLIGHT_RADIUS_PX: f64 = 250.0;
/// Terminal cells are about twice as tall as they are wide.
pub const CELL_ASPECT: f64 = 2.0;

/// Pixel position of the middle of a cell.
pub fn cell_center_px(column: u16, row: u16, cell_width_px: f64) -> (f64, f64) {
    (
        (column as f64 + 0.5) * cell_width_px,
        (row as f64 + 0.5) * cell_width_px * CELL_ASPECT,
    )
}

/// Pixel size of `area`.
pub fn area_px(area: Rect, cell_width_px: f64) -> (f64, f64) {
    (
        area.width as f64 * cell_width_px,
        area.height as f64 * cell_width_px * CELL_ASPECT,
    )
}

/// Paint the clear backdrop under every cell of `area` inside the spotlight.
/// Cells outside keep the blurred backdrop they were drawn with.
pub fn render_spotlight(
    buf: &mut Buffer,
    area: Rect,
    center_px: (f64, f64),
    cell_width_px: f64,
    clear: Color,
) {
    let style = Style::default().bg(clear);
    for row in area.top()..area.bottom() {
        for column in area.left()..area.right() {
            let (x, y) = cell_center_px(column, row, cell_width_px);
            let distance = (x - center_px.0).hypot(y - center_px.1);
            if distance <= SPOTLIGHT_RADIUS_PX {
                if let Some(cell) = buf.cell_mut((column, row)) {
                    cell.set_style(style);
                }
            }
        }
    }
}
