use crate::constants::TILE_SIZE;
use crate::physics::Vector2D;
use crate::types::Direction;

const ALIGN_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicState {
    position: Vector2D,
    previous_position: Vector2D,
    direction: Direction,
    speed: f64,
}

impl KinematicState {
    pub fn new(position: Vector2D, direction: Direction, speed: f64) -> Self {
        Self {
            position,
            previous_position: position,
            direction,
            speed,
        }
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn previous_position(&self) -> Vector2D {
        self.previous_position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn set_position(&mut self, position: Vector2D) {
        self.position = position;
    }

    /// Advances one step of `speed` along the current direction.
    pub fn update(&mut self) {
        self.previous_position = self.position;
        self.position = self.position + self.direction.unit() * self.speed;
    }

    /// Where one step in `direction` would land, without committing to it.
    pub fn potential_position(&self, direction: Direction) -> Vector2D {
        self.position + direction.unit() * self.speed
    }

    /// Attempts to face `direction`. Straight-line changes always succeed; a
    /// perpendicular turn succeeds only within one step of the nearest cell line
    /// on the cross axis, and snaps onto that line.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if !direction.is_perpendicular_to(self.direction) {
            self.direction = direction;
            return true;
        }
        let cross = if direction.is_horizontal() {
            self.position.y
        } else {
            self.position.x
        };
        let aligned = (cross / TILE_SIZE).round() * TILE_SIZE;
        if (cross - aligned).abs() > self.speed + ALIGN_EPSILON {
            return false;
        }
        if direction.is_horizontal() {
            self.position.y = aligned;
        } else {
            self.position.x = aligned;
        }
        self.direction = direction;
        true
    }
}
