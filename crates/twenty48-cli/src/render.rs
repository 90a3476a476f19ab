use twenty48_grid::{Board, Cell};

const COLUMN_WIDTH: usize = 5;

/// Text grid: each value left-aligned in a 5-wide column, `-` for empty.
pub fn render(board: &Board) -> String {
    render_with(board, |_, v| match v {
        0 => "-".to_string(),
        v => v.to_string(),
    })
}

/// Like `render`, but open cells are marked `**`.
pub fn render_open_cells(board: &Board) -> String {
    let open = board.open_cells();
    render_with(board, |cell, v| {
        if open.contains(&cell) {
            "**".to_string()
        } else {
            v.to_string()
        }
    })
}

fn render_with<F: Fn(Cell, u32) -> String>(board: &Board, label: F) -> String {
    let mut out = String::new();
    for (r, row) in board.rows().enumerate() {
        let line: String = row
            .iter()
            .enumerate()
            .map(|(c, &v)| format!("{:<COLUMN_WIDTH$}", label(Cell::new(r, c), v)))
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
