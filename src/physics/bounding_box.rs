use crate::physics::Vector2D;
use crate::types::Direction;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    top_left: Vector2D,
    width: f64,
    height: f64,
}

impl BoundingBox {
    pub fn new(top_left: Vector2D, width: f64, height: f64) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Vector2D {
        self.top_left
    }

    pub fn set_top_left(&mut self, top_left: Vector2D) {
        self.top_left = top_left;
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn left_x(&self) -> f64 {
        self.top_left.x
    }

    pub fn right_x(&self) -> f64 {
        self.top_left.x + self.width
    }

    pub fn middle_x(&self) -> f64 {
        self.top_left.x + self.width / 2.0
    }

    pub fn top_y(&self) -> f64 {
        self.top_left.y
    }

    pub fn bottom_y(&self) -> f64 {
        self.top_left.y + self.height
    }

    pub fn middle_y(&self) -> f64 {
        self.top_left.y + self.height / 2.0
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.middle_x(), self.middle_y())
    }

    /// Strict interior overlap; boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.left_x() < other.right_x()
            && self.right_x() > other.left_x()
            && self.top_y() < other.bottom_y()
            && self.bottom_y() > other.top_y()
    }

    /// Overlap seen from a box moving in `direction`: `other` must not lie behind
    /// this box's centre along the axis of motion.
    pub fn collides_with(&self, direction: Direction, other: &BoundingBox) -> bool {
        if !self.overlaps(other) {
            return false;
        }
        match direction {
            Direction::Up => other.middle_y() <= self.middle_y(),
            Direction::Down => other.middle_y() >= self.middle_y(),
            Direction::Left => other.middle_x() <= self.middle_x(),
            Direction::Right => other.middle_x() >= self.middle_x(),
        }
    }

    pub fn contains_point(&self, point: Vector2D) -> bool {
        point.x >= self.left_x()
            && point.x < self.right_x()
            && point.y >= self.top_y()
            && point.y < self.bottom_y()
    }
}
