//! Walking path, buildable tiles and tile occupancy.

use std::collections::BTreeSet;

use glam::Vec2;
use mystic_towers_core::{GridConfig, PathConfig, PlacementError, TileCoord};

/// Immutable walking route plus the mutable occupied-tile set.
#[derive(Clone, Debug)]
pub(crate) struct Path {
    tiles: Vec<TileCoord>,
    waypoints: Vec<Vec2>,
    buildable: BTreeSet<TileCoord>,
    occupied: BTreeSet<TileCoord>,
    tile_size: f32,
    base: TileCoord,
}

impl Path {
    /// Derives waypoints and buildable tiles from the configured tile sequence.
    pub(crate) fn new(config: &PathConfig, grid: &GridConfig) -> Self {
        let tiles = config.tiles.clone();
        let waypoints = tiles
            .iter()
            .map(|tile| tile.center(grid.tile_size))
            .collect();
        let buildable = buildable_tiles(&tiles, grid.columns, grid.rows);
        Self {
            tiles,
            waypoints,
            buildable,
            occupied: BTreeSet::new(),
            tile_size: grid.tile_size,
            base: config.base,
        }
    }

    pub(crate) fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub(crate) fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub(crate) fn base(&self) -> TileCoord {
        self.base
    }

    pub(crate) fn is_on_path(&self, tile: TileCoord) -> bool {
        self.tiles.contains(&tile)
    }

    /// True iff the tile borders the path and no tower stands on it.
    pub(crate) fn is_buildable(&self, tile: TileCoord) -> bool {
        self.buildable.contains(&tile) && !self.occupied.contains(&tile)
    }

    /// Explains why a tower cannot stand on `tile`, if it cannot.
    pub(crate) fn check_placement(&self, tile: TileCoord) -> Result<(), PlacementError> {
        if !self.buildable.contains(&tile) {
            return Err(PlacementError::NotBuildable);
        }
        if self.occupied.contains(&tile) {
            return Err(PlacementError::Occupied);
        }
        Ok(())
    }

    /// Marks `tile` as occupied. Idempotent and unvalidated.
    pub(crate) fn occupy(&mut self, tile: TileCoord) {
        let _ = self.occupied.insert(tile);
    }

    pub(crate) fn buildable_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.buildable
            .iter()
            .copied()
            .filter(|tile| !self.occupied.contains(tile))
    }

    /// Waypoint an agent at `position` is heading to, found by scanning the
    /// bounding boxes of consecutive waypoint pairs.
    ///
    /// Monsters track an explicit path index instead; this scan only serves
    /// adapters that need a heading for an arbitrary point.
    pub(crate) fn next_waypoint(&self, position: Vec2) -> Option<Vec2> {
        self.waypoints
            .windows(2)
            .find(|pair| {
                let min = pair[0].min(pair[1]);
                let max = pair[0].max(pair[1]);
                position.cmpge(min).all() && position.cmple(max).all()
            })
            .map(|pair| pair[1])
            .or_else(|| self.waypoints.last().copied())
    }

    /// Spawn point for a monster entering `offset` pixels behind the first
    /// waypoint, measured along the first segment.
    pub(crate) fn trailing_start(&self, offset: f32) -> Option<Vec2> {
        let first = *self.waypoints.first()?;
        let direction = self
            .waypoints
            .get(1)
            .map_or(Vec2::ZERO, |second| (*second - first).normalize_or_zero());
        Some(first - direction * offset)
    }
}

fn buildable_tiles(path: &[TileCoord], columns: u32, rows: u32) -> BTreeSet<TileCoord> {
    let mut buildable = BTreeSet::new();
    for tile in path {
        for dc in -1_i64..=1 {
            for dr in -1_i64..=1 {
                if dc == 0 && dr == 0 {
                    continue;
                }
                let column = i64::from(tile.column()) + dc;
                let row = i64::from(tile.row()) + dr;
                let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
                    continue;
                };
                if column >= columns || row >= rows {
                    continue;
                }
                let neighbour = TileCoord::new(column, row);
                if !path.contains(&neighbour) {
                    let _ = buildable.insert(neighbour);
                }
            }
        }
    }
    buildable
}
