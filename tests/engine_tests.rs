//! Engine tests - line merge rules, directional moves, legality and win checks

use twenty48::core::engine::{
    apply_move, compact_and_merge_line, has_legal_move, is_won, max_tile, valid_move_mask,
    valid_moves,
};
use twenty48::core::{Board, BoardError};
use twenty48::types::{Direction, Grid, MAX_TILE};

fn board(grid: Grid) -> Board {
    Board::from_grid(grid, 0).expect("test grid is well-formed")
}

fn row_board(row: [u32; 4]) -> Board {
    board([row, [0; 4], [0; 4], [0; 4]])
}

#[test]
fn test_no_triple_merge() {
    assert_eq!(compact_and_merge_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
    assert_eq!(compact_and_merge_line([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
}

#[test]
fn test_compaction_then_merge() {
    assert_eq!(compact_and_merge_line([0, 0, 2, 2]), ([4, 0, 0, 0], 4));
    assert_eq!(compact_and_merge_line([2, 0, 2, 4]), ([4, 4, 0, 0], 4));
    assert_eq!(compact_and_merge_line([4, 4, 8, 8]), ([8, 16, 0, 0], 24));
}

#[test]
fn test_line_edge_cases() {
    assert_eq!(compact_and_merge_line([0; 4]), ([0; 4], 0));
    assert_eq!(compact_and_merge_line([2, 4, 8, 16]), ([2, 4, 8, 16], 0));
}

#[test]
fn test_right_on_unflipped_row() {
    let b = row_board([0, 0, 2, 2]);

    let (left, out) = apply_move(&b, Direction::Left);
    assert_eq!(left.grid()[0], [4, 0, 0, 0]);
    assert_eq!(out.score_gained, 4);

    let (right, out) = apply_move(&b, Direction::Right);
    assert_eq!(right.grid()[0], [0, 0, 0, 4]);
    assert_eq!(out.score_gained, 4);
    assert!(out.changed);
}

#[test]
fn test_right_mirrors_triple_rule() {
    // Merges happen from the edge being moved toward.
    let (right, out) = apply_move(&row_board([0, 2, 2, 2]), Direction::Right);
    assert_eq!(right.grid()[0], [0, 0, 2, 4]);
    assert_eq!(out.score_gained, 4);
}

#[test]
fn test_vertical_moves() {
    let b = board([[2, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0]]);

    let (up, out) = apply_move(&b, Direction::Up);
    assert_eq!(
        *up.grid(),
        [[4, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]
    );
    assert_eq!(out.score_gained, 4);

    let (down, out) = apply_move(&b, Direction::Down);
    assert_eq!(
        *down.grid(),
        [[0, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0], [4, 0, 0, 0]]
    );
    assert_eq!(out.score_gained, 4);
}

#[test]
fn test_all_rows_move_in_one_call() {
    let b = board([[2, 2, 0, 0], [0, 4, 0, 4], [8, 0, 8, 0], [0, 0, 0, 2]]);
    let (left, out) = apply_move(&b, Direction::Left);
    assert_eq!(
        *left.grid(),
        [[4, 0, 0, 0], [8, 0, 0, 0], [16, 0, 0, 0], [2, 0, 0, 0]]
    );
    assert_eq!(out.score_gained, 4 + 8 + 16);
    assert_eq!(left.score(), 28);
}

#[test]
fn test_unchanged_move_reports_nothing() {
    let b = row_board([2, 0, 0, 0]);
    let (after, out) = apply_move(&b, Direction::Left);
    assert!(!out.changed);
    assert_eq!(out.score_gained, 0);
    assert_eq!(after, b);

    // In-place variant leaves the board alone too.
    let mut in_place = b;
    assert!(!in_place.apply_move(Direction::Up).changed);
    assert_eq!(in_place, b);
}

#[test]
fn test_one_empty_cell_is_legal() {
    let b = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
    assert!(has_legal_move(&b));
}

#[test]
fn test_full_checkerboard_is_lost() {
    let b = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    assert!(!has_legal_move(&b));
    assert!(valid_moves(&b).is_empty());
    assert_eq!(valid_move_mask(&b), [false; 4]);
}

#[test]
fn test_full_board_with_pair_is_legal() {
    let b = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 8, 8]]);
    assert!(has_legal_move(&b));
    let valid = valid_moves(&b);
    assert_eq!(valid.as_slice(), &[Direction::Left, Direction::Right]);
}

#[test]
fn test_win_is_exact_match() {
    assert!(is_won(&row_board([2048, 0, 0, 0])));
    assert!(!is_won(&row_board([4096, 0, 0, 0])));
    assert!(!is_won(&row_board([1024, 1024, 0, 0])));
}

#[test]
fn test_max_tile() {
    assert_eq!(max_tile(&Board::empty()), 0);
    assert_eq!(max_tile(&row_board([2, 128, 4, 0])), 128);
}

#[test]
fn test_valid_moves_dry_run() {
    let b = row_board([2, 0, 0, 0]);
    let before = b;
    let valid = valid_moves(&b);
    assert_eq!(valid.as_slice(), &[Direction::Right, Direction::Down]);
    assert_eq!(valid_move_mask(&b), [false, false, true, true]);
    assert_eq!(b, before);
}

#[test]
fn test_malformed_boards_are_rejected() {
    assert_eq!(
        Board::from_cells(&[0; 15], 0),
        Err(BoardError::InvalidLength { len: 15 })
    );
    let err = Board::from_grid([[0, 3, 0, 0], [0; 4], [0; 4], [0; 4]], 0).unwrap_err();
    assert_eq!(err, BoardError::InvalidTile { row: 0, col: 1, value: 3 });
    assert!(Board::from_grid([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 0).is_err());
}

#[test]
fn test_large_tiles_merge_past_2048() {
    let (after, out) = apply_move(&row_board([2048, 2048, 0, 0]), Direction::Left);
    assert_eq!(after.grid()[0], [4096, 0, 0, 0]);
    assert_eq!(out.score_gained, 4096);
    assert!(!is_won(&after));
}

#[test]
fn test_ceiling_tiles_do_not_merge() {
    let pair = row_board([MAX_TILE, MAX_TILE, 0, 0]);
    let (after, out) = apply_move(&pair, Direction::Left);
    assert_eq!(after, pair);
    assert!(!out.changed);
    assert_eq!(out.score_gained, 0);

    let (after, out) = apply_move(&pair, Direction::Right);
    assert_eq!(after.grid()[0], [0, 0, MAX_TILE, MAX_TILE]);
    assert!(out.changed);
    assert_eq!(out.score_gained, 0);

    let half = MAX_TILE / 2;
    assert_eq!(
        compact_and_merge_line([MAX_TILE, MAX_TILE, half, half]),
        ([MAX_TILE, MAX_TILE, MAX_TILE, 0], u64::from(MAX_TILE))
    );
}

#[test]
fn test_merging_up_to_the_ceiling_conserves_tiles() {
    let half = MAX_TILE / 2;
    let start = board([[half; 4]; 4]);

    let (once, out) = apply_move(&start, Direction::Left);
    assert!(out.changed);
    assert_eq!(out.score_gained, 8 * u64::from(MAX_TILE));
    for row in once.grid() {
        assert_eq!(*row, [MAX_TILE, MAX_TILE, 0, 0]);
    }
    assert_eq!(once.tile_sum(), start.tile_sum());

    let (twice, out) = apply_move(&once, Direction::Left);
    assert!(!out.changed);
    assert_eq!(twice, once);
    assert_eq!(valid_moves(&once).as_slice(), &[Direction::Right]);
}

#[test]
fn test_board_of_ceiling_tiles_is_stuck() {
    let full = board([[MAX_TILE; 4]; 4]);
    assert!(!has_legal_move(&full));
    assert!(valid_moves(&full).is_empty());
    assert_eq!(max_tile(&full), MAX_TILE);
}
