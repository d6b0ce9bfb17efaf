//! Legal landing spots for a stroke
//!
//! A stroke travels exactly `distance` tiles along one of the 8 compass
//! directions, then drifts sideways by the shot shape. Landing on trees or
//! water is never allowed, and trees along the way block the shot unless the
//! ball is teed up or sitting on fairway.

use super::grid::{Grid, NEIGHBOR_OFFSETS, Position, Tile};
use super::shot::ShotShape;
use crate::round_half_up;

/// Roll distance after the lie bonus/penalty, never below 1
pub fn terrain_adjusted_distance(lie: Tile, roll: u32) -> u32 {
    let roll = roll as i32;
    let adjusted = match lie {
        Tile::Fairway | Tile::Tee => roll + 1,
        Tile::Sand => roll - 1,
        _ => roll,
    };
    adjusted.max(1) as u32
}

/// Sideways drift for a flight direction: the unit direction rotated a
/// quarter turn, scaled by the shape's lateral offset, rounded per axis
pub fn shot_offset(direction: (i32, i32), shape: ShotShape) -> (i32, i32) {
    let lateral = shape.lateral_offset();
    if lateral == 0 {
        return (0, 0);
    }
    let (dx, dy) = (direction.0 as f64, direction.1 as f64);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return (0, 0);
    }
    let (ux, uy) = (dx / len, dy / len);
    let (px, py) = (-uy, ux);
    (
        round_half_up(px * lateral as f64),
        round_half_up(py * lateral as f64),
    )
}

/// Whether trees between `from` and `to` (exclusive) allow the shot.
///
/// The path is sampled once per tile of the longer axis.
pub fn is_path_clear(grid: &Grid, from: Position, to: Position, can_overfly_trees: bool) -> bool {
    if can_overfly_trees {
        return true;
    }
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs());

    (1..steps).all(|i| {
        let x = from.x + round_half_up((dx * i) as f64 / steps as f64);
        let y = from.y + round_half_up((dy * i) as f64 / steps as f64);
        grid.try_get(Position::new(x, y)) != Some(Tile::Tree)
    })
}

/// Every legal landing tile for a ball at `ball` travelling `distance`.
///
/// Results follow direction scan order (NW, N, NE, W, E, SW, S, SE) with
/// duplicates removed.
pub fn legal_moves(grid: &Grid, ball: Position, distance: u32, shape: ShotShape) -> Vec<Position> {
    let lie = grid.get(ball);
    let can_overfly = matches!(lie, Tile::Fairway | Tile::Tee);
    let distance = distance as i32;

    let mut moves: Vec<Position> = Vec::with_capacity(8);
    for (dx, dy) in NEIGHBOR_OFFSETS {
        let (ox, oy) = shot_offset((dx, dy), shape);
        let target = ball.offset(dx * distance + ox, dy * distance + oy);

        let Some(tile) = grid.try_get(target) else {
            continue;
        };
        if tile.is_hazard() {
            continue;
        }
        if !is_path_clear(grid, ball, target, can_overfly) {
            continue;
        }
        if !moves.contains(&target) {
            moves.push(target);
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid_with(tiles: &[(Position, Tile)]) -> Grid {
        let mut grid = Grid::new();
        for &(pos, tile) in tiles {
            grid.set(pos, tile);
        }
        grid
    }

    #[test]
    fn test_terrain_adjustment() {
        assert_eq!(terrain_adjusted_distance(Tile::Fairway, 4), 5);
        assert_eq!(terrain_adjusted_distance(Tile::Tee, 4), 5);
        assert_eq!(terrain_adjusted_distance(Tile::Sand, 4), 3);
        assert_eq!(terrain_adjusted_distance(Tile::Sand, 1), 1);
        assert_eq!(terrain_adjusted_distance(Tile::Rough, 1), 1);
        assert_eq!(terrain_adjusted_distance(Tile::Green, 2), 2);
    }

    #[test]
    fn test_shot_offset_is_perpendicular() {
        // Flying north (-y), the quarter turn points along +x for positive offsets
        assert_eq!(shot_offset((0, -1), ShotShape::Fade), (1, 0));
        assert_eq!(shot_offset((0, -1), ShotShape::Hook), (-2, 0));
        assert_eq!(shot_offset((1, 0), ShotShape::Slice), (0, 2));
        assert_eq!(shot_offset((1, 1), ShotShape::Straight), (0, 0));
        // Diagonals: 0.707 and 1.414 both round to 1
        assert_eq!(shot_offset((1, -1), ShotShape::Fade), (1, 1));
        assert_eq!(shot_offset((1, -1), ShotShape::Slice), (1, 1));
        assert_eq!(shot_offset((1, -1), ShotShape::Draw), (-1, -1));
    }

    #[test]
    fn test_open_grid_from_tee_all_directions() {
        // Tee at (5,28), hole at (5,5), otherwise rough
        let tee = Position::new(5, 28);
        let grid = grid_with(&[(tee, Tile::Tee), (Position::new(5, 5), Tile::Hole)]);
        let moves = legal_moves(&grid, tee, 6, ShotShape::Straight);

        let expected: Vec<Position> = NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| tee.offset(dx * 6, dy * 6))
            .filter(|&p| grid.in_bounds(p))
            .collect();
        assert_eq!(moves, expected);
        // Westward and southward targets fall off the grid
        assert_eq!(
            moves,
            vec![Position::new(5, 22), Position::new(11, 22), Position::new(11, 28)]
        );
    }

    #[test]
    fn test_hazard_targets_rejected() {
        let ball = Position::new(8, 16);
        let grid = grid_with(&[
            (Position::new(8, 13), Tile::Water),
            (Position::new(11, 16), Tile::Tree),
        ]);
        let moves = legal_moves(&grid, ball, 3, ShotShape::Straight);
        assert!(!moves.contains(&Position::new(8, 13)));
        assert!(!moves.contains(&Position::new(11, 16)));
        assert_eq!(moves.len(), 6);
    }

    #[test]
    fn test_trees_block_from_rough_but_not_fairway() {
        let ball = Position::new(8, 20);
        let tree = Position::new(8, 18);
        let target = Position::new(8, 16);

        let rough = grid_with(&[(tree, Tile::Tree)]);
        assert!(!legal_moves(&rough, ball, 4, ShotShape::Straight).contains(&target));

        for lie in [Tile::Sand, Tile::Green] {
            let grid = grid_with(&[(tree, Tile::Tree), (ball, lie)]);
            assert!(!is_path_clear(&grid, ball, target, false));
        }

        for lie in [Tile::Fairway, Tile::Tee] {
            let grid = grid_with(&[(tree, Tile::Tree), (ball, lie)]);
            assert!(legal_moves(&grid, ball, 4, ShotShape::Straight).contains(&target));
        }
    }

    #[test]
    fn test_water_can_be_overflown() {
        let ball = Position::new(8, 20);
        let grid = grid_with(&[(Position::new(8, 18), Tile::Water)]);
        assert!(legal_moves(&grid, ball, 4, ShotShape::Straight).contains(&Position::new(8, 16)));
    }

    #[test]
    fn test_path_sampling_rounds_half_up() {
        // dx = -3 over 6 steps: step 1 samples x + round(-0.5) = x + 0
        let from = Position::new(8, 20);
        let to = Position::new(5, 14);
        let blocked_if_round_away = grid_with(&[(Position::new(7, 19), Tile::Tree)]);
        assert!(is_path_clear(&blocked_if_round_away, from, to, false));
        let blocked = grid_with(&[(Position::new(8, 19), Tile::Tree)]);
        assert!(!is_path_clear(&blocked, from, to, false));
    }

    #[test]
    fn test_shot_shape_shifts_targets() {
        let ball = Position::new(8, 16);
        let grid = Grid::new();
        let moves = legal_moves(&grid, ball, 3, ShotShape::Fade);
        // North flight drifts one tile east
        assert!(moves.contains(&Position::new(9, 13)));
        assert!(!moves.contains(&Position::new(8, 13)));
    }

    fn arb_tile() -> impl Strategy<Value = Tile> {
        prop_oneof![
            4 => Just(Tile::Rough),
            1 => Just(Tile::Fairway),
            1 => Just(Tile::Sand),
            1 => Just(Tile::Water),
            2 => Just(Tile::Tree),
            1 => Just(Tile::Green),
        ]
    }

    fn arb_shape() -> impl Strategy<Value = ShotShape> {
        prop::sample::select(ShotShape::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_legal_moves_never_hazard_or_off_grid(
            tiles in prop::collection::vec(arb_tile(), 512),
            bx in 0i32..16,
            by in 0i32..32,
            distance in 1u32..12,
            shape in arb_shape(),
        ) {
            let mut grid = Grid::new();
            for (pos, tile) in Grid::positions().zip(tiles) {
                grid.set(pos, tile);
            }
            let ball = Position::new(bx, by);
            let moves = legal_moves(&grid, ball, distance, shape);
            prop_assert!(moves.len() <= 8);
            for m in moves {
                prop_assert!(grid.in_bounds(m));
                prop_assert!(!grid.get(m).is_hazard());
            }
        }

        #[test]
        fn prop_tree_on_path_excludes_target_from_rough(
            bx in 0i32..16,
            by in 0i32..32,
            distance in 2u32..8,
            dir in 0usize..8,
            lie in prop::sample::select(vec![Tile::Rough, Tile::Sand, Tile::Green]),
        ) {
            let ball = Position::new(bx, by);
            let (dx, dy) = NEIGHBOR_OFFSETS[dir];
            let d = distance as i32;
            let target = ball.offset(dx * d, dy * d);
            let mut grid = Grid::new();
            prop_assume!(grid.in_bounds(target));
            grid.set(ball, lie);
            grid.set(ball.offset(dx, dy), Tile::Tree);
            let moves = legal_moves(&grid, ball, distance, ShotShape::Straight);
            prop_assert!(!moves.contains(&target));

            grid.set(ball, Tile::Fairway);
            let moves = legal_moves(&grid, ball, distance, ShotShape::Straight);
            prop_assert!(moves.contains(&target));
        }
    }
}
