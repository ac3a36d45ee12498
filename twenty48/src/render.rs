use crate::grid::Grid;

const CELL_WIDTH: usize = 6;

fn format_val(value: Option<u32>) -> String {
    match value {
        None => " ".repeat(CELL_WIDTH),
        Some(v) => format!("{v:^CELL_WIDTH$}"),
    }
}

/// Render the board as fixed-width text, one line per row.
pub fn render_board(grid: &Grid<u32>) -> String {
    let rule = vec!["-".repeat(CELL_WIDTH); grid.width()].join("+");
    grid.rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(format_val)
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect::<Vec<_>>()
        .join(&format!("\n{rule}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_values_centered_and_blanks_empty_cells() {
        let grid = Grid::from_rows(vec![vec![Some(2), None], vec![Some(2048), Some(16)]]).unwrap();
        let text = render_board(&grid);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  2   |      ");
        assert_eq!(lines[1], "------+------");
        assert_eq!(lines[2], " 2048 |  16  ");
    }
}
