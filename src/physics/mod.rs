//! Continuous-space motion primitives shared by every moving entity.

mod bounding_box;
mod kinematic;
mod vector;

pub use bounding_box::BoundingBox;
pub use kinematic::KinematicState;
pub use vector::Vector2D;

use crate::types::Direction;

/// Pushes a mover back out of `obstacle` along the axis it was travelling on,
/// leaving the two boxes edge to edge. Returns the corrected top-left corner.
pub fn resolve_collision(
    direction: Direction,
    mover: &BoundingBox,
    obstacle: &BoundingBox,
) -> Vector2D {
    let top_left = mover.top_left();
    match direction {
        Direction::Up => Vector2D::new(top_left.x, obstacle.bottom_y()),
        Direction::Down => Vector2D::new(top_left.x, obstacle.top_y() - mover.height()),
        Direction::Left => Vector2D::new(obstacle.right_x(), top_left.y),
        Direction::Right => Vector2D::new(obstacle.left_x() - mover.width(), top_left.y),
    }
}
