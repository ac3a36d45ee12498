use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use twenty48::board::{move_values, Direction};
use twenty48::grid::Grid;

/// Rows of tile values, 0 for an empty cell.
fn board(rows: &[&[u32]]) -> Grid<u32> {
    Grid::from_rows(
        rows.iter()
            .map(|row| row.iter().map(|&v| (v != 0).then_some(v)).collect())
            .collect(),
    )
    .expect("square board")
}

fn values(grid: &Grid<u32>) -> Vec<Vec<u32>> {
    grid.rows()
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(0)).collect())
        .collect()
}

fn tile_sum(grid: &Grid<u32>) -> u32 {
    grid.iter().filter_map(|(_, v)| v.copied()).sum()
}

fn random_board(rng: &mut StdRng, width: usize) -> Grid<u32> {
    let rows = (0..width)
        .map(|_| {
            (0..width)
                .map(|_| match rng.gen_range(0..5) {
                    0 | 1 => None,
                    k => Some(1u32 << k),
                })
                .collect()
        })
        .collect();
    Grid::from_rows(rows).expect("square board")
}

#[test]
fn left_move_merges_first_pair_of_row() {
    let mut grid = board(&[&[2, 2, 4, 0], &[0; 4], &[0; 4], &[0; 4]]);

    assert!(move_values(&mut grid, Direction::Left).unwrap());
    assert_eq!(values(&grid)[0], vec![4, 4, 0, 0]);
    for row in &values(&grid)[1..] {
        assert_eq!(row, &vec![0; 4]);
    }
}

#[test]
fn right_and_down_treat_the_far_edge_as_the_front() {
    let mut grid = board(&[&[2, 2, 2, 0], &[0, 0, 0, 0], &[0, 4, 0, 0], &[0, 4, 0, 0]]);

    assert!(move_values(&mut grid, Direction::Right).unwrap());
    assert_eq!(
        values(&grid),
        vec![vec![0, 0, 2, 4], vec![0; 4], vec![0, 0, 0, 4], vec![0, 0, 0, 4]]
    );

    assert!(move_values(&mut grid, Direction::Down).unwrap());
    assert_eq!(
        values(&grid),
        vec![vec![0; 4], vec![0; 4], vec![0, 0, 0, 4], vec![0, 0, 2, 8]]
    );
}

#[test]
fn repeating_a_settled_move_changes_nothing() {
    let mut grid = board(&[&[2, 0, 4, 8], &[0, 8, 0, 16], &[4, 0, 0, 0], &[2, 4, 2, 4]]);

    assert!(move_values(&mut grid, Direction::Left).unwrap());
    let settled = grid.clone();
    assert_eq!(
        values(&settled),
        vec![vec![2, 4, 8, 0], vec![8, 16, 0, 0], vec![4, 0, 0, 0], vec![2, 4, 2, 4]]
    );

    assert!(!move_values(&mut grid, Direction::Left).unwrap());
    assert_eq!(grid, settled);
}

#[test]
fn unchanged_moves_leave_the_grid_untouched() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..25 {
        for direction in Direction::ALL {
            let mut grid = random_board(&mut rng, 4);
            // Merges can cascade across repeated moves, but at most width - 1 times per line.
            for _ in 0..4 {
                let before = grid.clone();
                if !move_values(&mut grid, direction).unwrap() {
                    assert_eq!(grid, before, "{direction:?}");
                }
            }
            let before = grid.clone();
            assert!(!move_values(&mut grid, direction).unwrap(), "{direction:?}");
            assert_eq!(grid, before);
        }
    }
}

#[test]
fn locked_full_board_never_changes() {
    let rows: &[&[u32]] = &[&[2, 4, 2, 4], &[4, 2, 4, 2], &[2, 4, 2, 4], &[4, 2, 4, 2]];
    let before = board(rows);
    for direction in Direction::ALL {
        let mut grid = before.clone();
        assert!(!move_values(&mut grid, direction).unwrap(), "{direction:?}");
        assert_eq!(grid, before);
    }
}

#[test]
fn rows_move_independently() {
    let mut grid = board(&[&[0, 0, 0, 0], &[2, 2, 0, 0], &[4, 0, 0, 0], &[0, 0, 0, 0]]);

    assert!(move_values(&mut grid, Direction::Left).unwrap());
    assert_eq!(values(&grid)[1], vec![4, 0, 0, 0]);
    // The row below already holds a 4 but is not touched by the merge above it.
    assert_eq!(values(&grid)[2], vec![4, 0, 0, 0]);
}

#[test]
fn moves_keep_the_tile_sum_and_never_add_tiles() {
    let mut rng = StdRng::seed_from_u64(2048);
    for width in 2..=5 {
        for _ in 0..50 {
            let start = random_board(&mut rng, width);
            for direction in Direction::ALL {
                let mut grid = start.clone();
                let changed = move_values(&mut grid, direction).unwrap();

                assert_eq!(tile_sum(&grid), tile_sum(&start));
                assert!(grid.occupied() <= start.occupied());
                if !changed {
                    assert_eq!(grid, start);
                }
            }
        }
    }
}

#[test]
fn moved_tiles_are_packed_against_the_front_edge() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let mut grid = random_board(&mut rng, 4);
        move_values(&mut grid, Direction::Left).unwrap();
        for row in values(&grid) {
            let filled = row.iter().take_while(|&&v| v != 0).count();
            assert!(row[filled..].iter().all(|&v| v == 0), "gap in {row:?}");
        }
    }
}
