//! Randomized region growth used to carve terrain features
//!
//! Two flavours:
//! - count-targeted: grow a connected blob one rough cell at a time
//! - probability-targeted: ring each source cell with a per-neighbour chance
//!
//! Neither writes to the grid; the caller paints the returned cells with
//! `paint`, which only ever converts tiles that are still rough.

use rand::Rng;

use super::grid::{Grid, Position, Tile};

/// Grow a connected region from `seeds` until it holds `target_len` cells.
///
/// Each step picks a random frontier cell and admits one of its in-bounds,
/// still-rough neighbours that is not already in the region. A frontier cell
/// with nothing left to admit is dropped from the frontier but stays in the
/// region. Growth that stalls stops short without complaint.
pub fn grow_to_count<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    seeds: &[Position],
    target_len: usize,
) -> Vec<Position> {
    let mut region: Vec<Position> = Vec::with_capacity(target_len.max(seeds.len()));
    for &seed in seeds {
        if !region.contains(&seed) {
            region.push(seed);
        }
    }
    let mut frontier = region.clone();

    while region.len() < target_len && !frontier.is_empty() {
        let pick = rng.random_range(0..frontier.len());
        let current = frontier[pick];

        let candidates: Vec<Position> = grid
            .rough_neighbors(current)
            .filter(|n| !region.contains(n))
            .collect();

        if candidates.is_empty() {
            // Only leaves the frontier; the cell itself is still painted
            frontier.swap_remove(pick);
            continue;
        }

        let next = candidates[rng.random_range(0..candidates.len())];
        region.push(next);
        frontier.push(next);
    }

    if region.len() < target_len {
        log::debug!(
            "Region growth stalled at {}/{} cells",
            region.len(),
            target_len
        );
    }

    region
}

/// Select rough neighbours of every source cell, each with probability `chance`.
///
/// Sources are visited in order and their neighbours in scan order. A cell
/// bordering several sources gets several rolls; duplicates are harmless
/// because painting is idempotent.
pub fn grow_by_chance<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    sources: &[Position],
    chance: f64,
) -> Vec<Position> {
    let mut picked = Vec::new();
    for &source in sources {
        for neighbor in grid.rough_neighbors(source) {
            if rng.random_bool(chance) {
                picked.push(neighbor);
            }
        }
    }
    picked
}

/// Convert every still-rough cell in `cells` to `tile`. Returns how many changed.
pub fn paint(grid: &mut Grid, cells: &[Position], tile: Tile) -> usize {
    let mut painted = 0;
    for &cell in cells {
        if grid.in_bounds(cell) && grid.get(cell) == Tile::Rough {
            grid.set(cell, tile);
            painted += 1;
        }
    }
    painted
}
