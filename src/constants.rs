use crate::physics::Vector2D;
use crate::types::Direction;

/// Edge length of one maze cell in world units.
pub const TILE_SIZE: f64 = 16.0;

pub const TICK_MS: u64 = 34;

/// Frames the drivers hold on "READY!" before the first tick.
pub const READY_FRAMES: u32 = 100;

pub const PELLET_POINTS: i32 = 100;
pub const PLAYER_IMAGE_SWAP_TICK_COUNT: u64 = 8;

pub const GHOST_DEFAULT_DIRECTION: Direction = Direction::Left;
pub const PLAYER_DEFAULT_DIRECTION: Direction = Direction::Left;

pub fn tile_origin(col: i32, row: i32) -> Vector2D {
    Vector2D::new(col as f64 * TILE_SIZE, row as f64 * TILE_SIZE)
}

pub fn tile_of(coordinate: f64) -> i32 {
    (coordinate / TILE_SIZE).floor() as i32
}
