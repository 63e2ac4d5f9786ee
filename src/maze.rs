use std::fs;
use std::path::Path;

use crate::config::ModeTable;
use crate::constants::{tile_of, tile_origin};
use crate::entity::{
    DynamicEntity, DynamicRef, EntityRef, Ghost, Pellet, Player, Renderable, Wall, WallShape,
};
use crate::error::ConfigError;
use crate::physics::Vector2D;
use crate::types::{Direction, DirectionSet, RenderableView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall(WallShape),
    Pellet,
    PlayerSpawn,
    GhostSpawn,
}

impl Tile {
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            '1' => Self::Wall(WallShape::Horizontal),
            '2' => Self::Wall(WallShape::Vertical),
            '3' => Self::Wall(WallShape::UpLeft),
            '4' => Self::Wall(WallShape::UpRight),
            '5' => Self::Wall(WallShape::DownLeft),
            '6' => Self::Wall(WallShape::DownRight),
            '7' => Self::Pellet,
            'p' => Self::PlayerSpawn,
            'g' => Self::GhostSpawn,
            _ => Self::Empty,
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Self::Wall(_))
    }
}

/// Static description of a maze: the tile grid plus the spawn cells found in it.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeLayout {
    tiles: Vec<Vec<Tile>>,
    width: i32,
    height: i32,
    player_spawn: (i32, i32),
    ghost_spawns: Vec<(i32, i32)>,
    pellet_count: usize,
}

impl MazeLayout {
    /// Parses one symbol per tile, rows top to bottom. Short rows are padded
    /// with empty tiles so the grid stays rectangular.
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let mut rows: Vec<Vec<Tile>> = source
            .lines()
            .map(|line| line.chars().map(Tile::from_symbol).collect())
            .collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(ConfigError::Map("map is empty".to_string()));
        }
        for row in &mut rows {
            row.resize(width, Tile::Empty);
        }

        let mut player_spawns = Vec::new();
        let mut ghost_spawns = Vec::new();
        let mut pellet_count = 0;
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, tile) in row.iter().enumerate() {
                let cell = (col_idx as i32, row_idx as i32);
                match tile {
                    Tile::PlayerSpawn => player_spawns.push(cell),
                    Tile::GhostSpawn => ghost_spawns.push(cell),
                    Tile::Pellet => pellet_count += 1,
                    Tile::Empty | Tile::Wall(_) => {}
                }
            }
        }

        let player_spawn = match player_spawns.as_slice() {
            [single] => *single,
            [] => return Err(ConfigError::Map("no player spawn ('p') found".to_string())),
            many => {
                return Err(ConfigError::Map(format!(
                    "expected exactly one player spawn ('p'), found {}",
                    many.len()
                )))
            }
        };
        if pellet_count == 0 {
            return Err(ConfigError::Map("map contains no pellets ('7')".to_string()));
        }

        Ok(Self {
            height: rows.len() as i32,
            width: width as i32,
            tiles: rows,
            player_spawn,
            ghost_spawns,
            pellet_count,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.width && row < self.height
    }

    pub fn tile(&self, col: i32, row: i32) -> Option<Tile> {
        if !self.in_bounds(col, row) {
            return None;
        }
        Some(self.tiles[row as usize][col as usize])
    }

    pub fn is_wall(&self, col: i32, row: i32) -> bool {
        self.tile(col, row).is_some_and(Tile::is_wall)
    }

    /// Walkable means inside the grid and not a wall.
    pub fn is_walkable(&self, col: i32, row: i32) -> bool {
        self.tile(col, row).is_some_and(|tile| !tile.is_wall())
    }

    pub fn player_spawn(&self) -> (i32, i32) {
        self.player_spawn
    }

    pub fn ghost_spawns(&self) -> &[(i32, i32)] {
        &self.ghost_spawns
    }

    pub fn pellet_count(&self) -> usize {
        self.pellet_count
    }

    /// Scatter destinations in assignment order: top-left, top-right,
    /// bottom-left, bottom-right.
    pub fn scatter_corners(&self) -> [Vector2D; 4] {
        let last_col = self.width - 1;
        let last_row = self.height - 1;
        [
            tile_origin(0, 0),
            tile_origin(last_col, 0),
            tile_origin(0, last_row),
            tile_origin(last_col, last_row),
        ]
    }

    fn cells(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .map(move |(col, tile)| (col as i32, row as i32, *tile))
        })
    }
}

/// Entity arena built from a layout. Handles ([`EntityRef`], [`DynamicRef`])
/// stay valid for the life of the maze.
#[derive(Clone, Debug)]
pub struct Maze {
    layout: MazeLayout,
    player: Player,
    ghosts: Vec<Ghost>,
    walls: Vec<Wall>,
    pellets: Vec<Pellet>,
    render_order: Vec<EntityRef>,
}

impl Maze {
    pub fn new(layout: &MazeLayout, player_speed: f64, ghost_speeds: ModeTable<f64>) -> Self {
        let (spawn_col, spawn_row) = layout.player_spawn();
        let player = Player::new(tile_origin(spawn_col, spawn_row), player_speed);
        let corners = layout.scatter_corners();

        let mut ghosts = Vec::new();
        let mut walls = Vec::new();
        let mut pellets = Vec::new();
        let mut render_order = Vec::new();
        for (col, row, tile) in layout.cells() {
            match tile {
                Tile::Empty => {}
                Tile::PlayerSpawn => render_order.push(EntityRef::Player),
                Tile::GhostSpawn => {
                    let corner = corners[ghosts.len() % corners.len()];
                    render_order.push(EntityRef::Ghost(ghosts.len()));
                    ghosts.push(Ghost::new(tile_origin(col, row), corner, ghost_speeds));
                }
                Tile::Wall(shape) => {
                    render_order.push(EntityRef::Wall(walls.len()));
                    walls.push(Wall::new(col, row, shape));
                }
                Tile::Pellet => {
                    render_order.push(EntityRef::Pellet(pellets.len()));
                    pellets.push(Pellet::new(col, row));
                }
            }
        }

        Self {
            layout: layout.clone(),
            player,
            ghosts,
            walls,
            pellets,
            render_order,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn ghosts_mut(&mut self) -> &mut [Ghost] {
        &mut self.ghosts
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn pellets(&self) -> &[Pellet] {
        &self.pellets
    }

    pub fn pellet_mut(&mut self, idx: usize) -> Option<&mut Pellet> {
        self.pellets.get_mut(idx)
    }

    /// Player first, then ghosts in map order.
    pub fn dynamic_handles(&self) -> Vec<DynamicRef> {
        std::iter::once(DynamicRef::Player)
            .chain((0..self.ghosts.len()).map(DynamicRef::Ghost))
            .collect()
    }

    pub fn dynamic(&self, handle: DynamicRef) -> Option<&dyn DynamicEntity> {
        match handle {
            DynamicRef::Player => Some(&self.player as &dyn DynamicEntity),
            DynamicRef::Ghost(idx) => self.ghosts.get(idx).map(|ghost| ghost as &dyn DynamicEntity),
        }
    }

    pub fn dynamic_mut(&mut self, handle: DynamicRef) -> Option<&mut dyn DynamicEntity> {
        match handle {
            DynamicRef::Player => Some(&mut self.player as &mut dyn DynamicEntity),
            DynamicRef::Ghost(idx) => self
                .ghosts
                .get_mut(idx)
                .map(|ghost| ghost as &mut dyn DynamicEntity),
        }
    }

    pub fn renderable(&self, handle: EntityRef) -> Option<&dyn Renderable> {
        match handle {
            EntityRef::Player => Some(&self.player as &dyn Renderable),
            EntityRef::Ghost(idx) => self.ghosts.get(idx).map(|e| e as &dyn Renderable),
            EntityRef::Wall(idx) => self.walls.get(idx).map(|e| e as &dyn Renderable),
            EntityRef::Pellet(idx) => self.pellets.get(idx).map(|e| e as &dyn Renderable),
        }
    }

    /// Every entity in tile scan order.
    pub fn renderables(&self) -> Vec<RenderableView> {
        self.render_order
            .iter()
            .filter_map(|handle| self.renderable(*handle))
            .map(|entity| entity.view())
            .collect()
    }

    /// Returns every entity to its spawn state and un-collects all pellets.
    pub fn reset(&mut self) {
        self.player.reset();
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
        for pellet in &mut self.pellets {
            pellet.reset();
        }
    }

    /// Directions whose neighbouring cell, seen from the cell containing
    /// `center`, is inside the grid and not a wall.
    pub fn possible_directions_at(&self, center: Vector2D) -> DirectionSet {
        let col = tile_of(center.x);
        let row = tile_of(center.y);
        Direction::ALL
            .into_iter()
            .filter(|direction| {
                let (dx, dy) = direction.grid_offset();
                self.layout.is_walkable(col + dx, row + dy)
            })
            .collect()
    }

    pub fn update_possible_directions(&mut self, handle: DynamicRef) -> DirectionSet {
        let Some(center) = self.dynamic(handle).map(|entity| entity.center()) else {
            return DirectionSet::empty();
        };
        let possible = self.possible_directions_at(center);
        if let Some(entity) = self.dynamic_mut(handle) {
            entity.set_possible_directions(possible);
        }
        possible
    }

    pub fn is_at_intersection(possible: DirectionSet) -> bool {
        possible.len() > 2
    }
}
