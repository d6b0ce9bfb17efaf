//! Course composition
//!
//! Builds one playable hole by running the terrain passes in a fixed order.
//! Later passes read what earlier passes painted (sand rings the green,
//! fairway rings green and sand, trees avoid everything), so the order is
//! part of the contract.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{Grid, Position, SlopeDirection, Tile};
use super::region::{grow_by_chance, grow_to_count, paint};
use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::round_half_up;

/// Course generation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("could not place {what} after {attempts} attempts")]
    PlacementExhausted { what: &'static str, attempts: u32 },
    #[error("invalid course config: {field}")]
    InvalidConfig { field: &'static str },
}

/// Tunable generation parameters. `Default` is the standard course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    /// Number of water hazards
    pub water_hazards: RangeInclusive<u32>,
    /// Tiles per water hazard (including its seed)
    pub water_tiles: usize,
    /// Rows the tee may sit on
    pub tee_rows: RangeInclusive<i32>,
    /// Columns / rows the hole may sit on
    pub hole_cols: RangeInclusive<i32>,
    pub hole_rows: RangeInclusive<i32>,
    /// Fairway tiles grown out from the tee
    pub tee_fairway_tiles: usize,
    /// Extra green tiles grown beyond the hole's neighbours
    pub extra_green_tiles: RangeInclusive<usize>,
    pub green_sand_chance: f64,
    pub green_fairway_chance: f64,
    pub path_fairway_chance: f64,
    pub tree_clusters: RangeInclusive<u32>,
    pub trees_per_cluster: RangeInclusive<u32>,
    /// Placement attempts per tree before it is skipped
    pub tree_attempts: u32,
    pub sand_traps: RangeInclusive<u32>,
    pub slopes: RangeInclusive<u32>,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            water_hazards: 0..=2,
            water_tiles: 12,
            tee_rows: 21..=31,
            hole_cols: 2..=13,
            hole_rows: 2..=13,
            tee_fairway_tiles: 10,
            extra_green_tiles: 1..=3,
            green_sand_chance: 0.4,
            green_fairway_chance: 0.6,
            path_fairway_chance: 0.6,
            tree_clusters: 3..=6,
            trees_per_cluster: 5..=12,
            tree_attempts: 10,
            sand_traps: 2..=5,
            slopes: 20..=39,
        }
    }
}

impl CourseConfig {
    /// Reject settings the generator cannot honour: empty ranges, chances
    /// outside `[0, 1]`, and tee or hole ranges that leave the grid.
    pub fn validate(&self) -> Result<(), GenerationError> {
        fn check(ok: bool, field: &'static str) -> Result<(), GenerationError> {
            if ok {
                Ok(())
            } else {
                Err(GenerationError::InvalidConfig { field })
            }
        }
        fn within(range: &RangeInclusive<i32>, len: i32) -> bool {
            !range.is_empty() && *range.start() >= 0 && *range.end() < len
        }

        check(!self.water_hazards.is_empty(), "water_hazards")?;
        check(within(&self.tee_rows, Grid::HEIGHT), "tee_rows")?;
        check(within(&self.hole_cols, Grid::WIDTH), "hole_cols")?;
        check(within(&self.hole_rows, Grid::HEIGHT), "hole_rows")?;
        check(!self.extra_green_tiles.is_empty(), "extra_green_tiles")?;
        for (chance, field) in [
            (self.green_sand_chance, "green_sand_chance"),
            (self.green_fairway_chance, "green_fairway_chance"),
            (self.path_fairway_chance, "path_fairway_chance"),
        ] {
            check((0.0..=1.0).contains(&chance), field)?;
        }
        check(!self.tree_clusters.is_empty(), "tree_clusters")?;
        check(!self.trees_per_cluster.is_empty(), "trees_per_cluster")?;
        check(!self.sand_traps.is_empty(), "sand_traps")?;
        check(!self.slopes.is_empty(), "slopes")?;
        Ok(())
    }
}

/// Par from the tee-to-hole Manhattan distance
pub fn par_for(tee: Position, hole: Position) -> u32 {
    match tee.manhattan(hole) {
        d if d <= 8 => 3,
        d if d <= 15 => 4,
        _ => 5,
    }
}

/// One generated hole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    grid: Grid,
    tee: Position,
    hole: Position,
    par: u32,
}

impl Course {
    /// Course on an existing grid. The tee and hole tiles are stamped onto it.
    /// Panics if either position is off the grid.
    pub fn new(grid: Grid, tee: Position, hole: Position) -> Self {
        let mut course = Self {
            grid,
            tee,
            hole,
            par: par_for(tee, hole),
        };
        course.place_tee(tee);
        course.place_hole(hole);
        course
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn tee(&self) -> Position {
        self.tee
    }

    pub fn hole(&self) -> Position {
        self.hole
    }

    pub fn par(&self) -> u32 {
        self.par
    }

    /// Move the tee marker: records the position and stamps the tile together
    pub fn place_tee(&mut self, pos: Position) {
        self.tee = pos;
        self.grid.set(pos, Tile::Tee);
        self.par = par_for(self.tee, self.hole);
    }

    /// Move the hole: records the position and stamps the tile together
    pub fn place_hole(&mut self, pos: Position) {
        self.hole = pos;
        self.grid.set(pos, Tile::Hole);
        self.par = par_for(self.tee, self.hole);
    }

    /// Turn the tee box into fairway once the ball has left it.
    /// Returns false when it was already retired.
    pub fn retire_tee(&mut self) -> bool {
        if self.grid.get(self.tee) == Tile::Tee {
            self.grid.set(self.tee, Tile::Fairway);
            true
        } else {
            false
        }
    }

    /// Generate a full course
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        config: &CourseConfig,
    ) -> Result<Self, GenerationError> {
        config.validate()?;
        let mut grid = Grid::new();

        add_water_hazards(&mut grid, rng, config)?;

        let tee = place_random(
            &grid,
            rng,
            "tee",
            0..=Grid::WIDTH - 1,
            config.tee_rows.clone(),
            |t, _| t != Tile::Water,
        )?;
        grid.set(tee, Tile::Tee);

        let hole = place_random(
            &grid,
            rng,
            "hole",
            config.hole_cols.clone(),
            config.hole_rows.clone(),
            |t, _| !matches!(t, Tile::Water | Tile::Tee),
        )?;
        grid.set(hole, Tile::Hole);

        let tee_fairway = grow_to_count(&grid, rng, &[tee], 1 + config.tee_fairway_tiles);
        paint(&mut grid, &tee_fairway, Tile::Fairway);

        add_green(&mut grid, rng, hole, config);

        let greens = grid.positions_of(Tile::Green);
        let sand = grow_by_chance(&grid, rng, &greens, config.green_sand_chance);
        paint(&mut grid, &sand, Tile::Sand);

        let around: Vec<Position> = Grid::positions()
            .filter(|&p| matches!(grid.get(p), Tile::Green | Tile::Sand))
            .collect();
        let apron = grow_by_chance(&grid, rng, &around, config.green_fairway_chance);
        paint(&mut grid, &apron, Tile::Fairway);

        add_connecting_fairway(&mut grid, rng, tee, hole, config);
        add_trees(&mut grid, rng, config)?;
        add_sand_traps(&mut grid, rng, config)?;
        add_slopes(&mut grid, rng, config)?;

        let course = Self::new(grid, tee, hole);
        log::info!(
            "Generated course: tee ({}, {}), hole ({}, {}), par {}",
            tee.x,
            tee.y,
            hole.x,
            hole.y,
            course.par
        );
        Ok(course)
    }
}

/// Pick random cells in the given ranges until `accept` passes.
fn place_random<R, F>(
    grid: &Grid,
    rng: &mut R,
    what: &'static str,
    cols: RangeInclusive<i32>,
    rows: RangeInclusive<i32>,
    accept: F,
) -> Result<Position, GenerationError>
where
    R: Rng + ?Sized,
    F: Fn(Tile, Option<SlopeDirection>) -> bool,
{
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = Position::new(
            rng.random_range(cols.clone()),
            rng.random_range(rows.clone()),
        );
        if accept(grid.get(pos), grid.slope(pos)) {
            return Ok(pos);
        }
    }
    log::error!("Gave up placing {} after {} attempts", what, MAX_PLACEMENT_ATTEMPTS);
    Err(GenerationError::PlacementExhausted {
        what,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

/// Random rough cell anywhere on the grid
fn random_rough<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    what: &'static str,
) -> Result<Position, GenerationError> {
    place_random(
        grid,
        rng,
        what,
        0..=Grid::WIDTH - 1,
        0..=Grid::HEIGHT - 1,
        |t, _| t == Tile::Rough,
    )
}

fn add_water_hazards<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    config: &CourseConfig,
) -> Result<(), GenerationError> {
    let hazards = rng.random_range(config.water_hazards.clone());
    for _ in 0..hazards {
        let seed = random_rough(grid, rng, "water seed")?;
        let water = grow_to_count(grid, rng, &[seed], config.water_tiles);
        paint(grid, &water, Tile::Water);
    }
    log::debug!("Added {} water hazards", hazards);
    Ok(())
}

/// Green on the hole's rough neighbours, then a few more connected tiles
fn add_green<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, hole: Position, config: &CourseConfig) {
    let seeds: Vec<Position> = grid.rough_neighbors(hole).collect();
    if seeds.is_empty() {
        return;
    }
    let extra = rng.random_range(config.extra_green_tiles.clone());
    let green = grow_to_count(grid, rng, &seeds, seeds.len() + extra);
    paint(grid, &green, Tile::Green);
}

/// Jittered straight line from tee to hole, widened with a fringe of fairway
fn add_connecting_fairway<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    tee: Position,
    hole: Position,
    config: &CourseConfig,
) {
    let dx = (hole.x - tee.x) as f64;
    let dy = (hole.y - tee.y) as f64;
    let steps = tee.chebyshev(hole).max(1);

    let mut path = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let jitter = rng.random_range(-1..=1);
        let x = (round_half_up(tee.x as f64 + dx * t) + jitter).clamp(0, Grid::WIDTH - 1);
        let y = (round_half_up(tee.y as f64 + dy * t) + jitter).clamp(0, Grid::HEIGHT - 1);
        let pos = Position::new(x, y);
        if grid.get(pos) == Tile::Rough {
            path.push(pos);
        }
    }
    paint(grid, &path, Tile::Fairway);

    let fringe = grow_by_chance(grid, rng, &path, config.path_fairway_chance);
    paint(grid, &fringe, Tile::Fairway);
}

/// Clusters of trees scattered around random rough centres
fn add_trees<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    config: &CourseConfig,
) -> Result<(), GenerationError> {
    let clusters = rng.random_range(config.tree_clusters.clone());
    let per_cluster = rng.random_range(config.trees_per_cluster.clone());
    let mut planted = 0;

    for _ in 0..clusters {
        let center = random_rough(grid, rng, "tree cluster")?;
        for _ in 0..per_cluster {
            for _ in 0..config.tree_attempts {
                let angle = rng.random::<f64>() * std::f64::consts::TAU;
                let radius = rng.random::<f64>() * 3.0 + 1.0;
                let x = round_half_up(center.x as f64 + angle.cos() * radius)
                    .clamp(0, Grid::WIDTH - 1);
                let y = round_half_up(center.y as f64 + angle.sin() * radius)
                    .clamp(0, Grid::HEIGHT - 1);
                let pos = Position::new(x, y);
                if grid.get(pos) == Tile::Rough {
                    grid.set(pos, Tile::Tree);
                    planted += 1;
                    break;
                }
            }
        }
    }

    log::debug!(
        "Planted {} trees in {} clusters of up to {}",
        planted,
        clusters,
        per_cluster
    );
    Ok(())
}

fn add_sand_traps<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    config: &CourseConfig,
) -> Result<(), GenerationError> {
    let traps = rng.random_range(config.sand_traps.clone());
    for _ in 0..traps {
        let pos = random_rough(grid, rng, "sand trap")?;
        grid.set(pos, Tile::Sand);
    }
    Ok(())
}

fn add_slopes<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    config: &CourseConfig,
) -> Result<(), GenerationError> {
    let count = rng.random_range(config.slopes.clone());
    for _ in 0..count {
        let pos = place_random(
            grid,
            rng,
            "slope",
            0..=Grid::WIDTH - 1,
            0..=Grid::HEIGHT - 1,
            |t, s| !matches!(t, Tile::Water | Tile::Tree | Tile::Sand | Tile::Hole) && s.is_none(),
        )?;
        let dir = SlopeDirection::ALL[rng.random_range(0..SlopeDirection::ALL.len())];
        grid.set_slope(pos, dir);
    }
    log::debug!("Added {} slopes", count);
    Ok(())
}
