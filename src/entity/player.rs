use crate::constants::{PLAYER_DEFAULT_DIRECTION, TILE_SIZE};
use crate::entity::{DynamicEntity, Renderable};
use crate::physics::{BoundingBox, KinematicState, Vector2D};
use crate::types::{Direction, DirectionSet, EntityKind, Layer, Sprite};

/// The controllable entity. Intents are buffered and applied on the next
/// update whose possible directions allow them.
#[derive(Clone, Debug)]
pub struct Player {
    bounds: BoundingBox,
    kinematic: KinematicState,
    spawn: Vector2D,
    desired: Option<Direction>,
    possible: DirectionSet,
    mouth_closed: bool,
}

impl Player {
    pub fn new(spawn: Vector2D, speed: f64) -> Self {
        Self {
            bounds: BoundingBox::new(spawn, TILE_SIZE, TILE_SIZE),
            kinematic: KinematicState::new(spawn, PLAYER_DEFAULT_DIRECTION, speed),
            spawn,
            desired: None,
            possible: DirectionSet::empty(),
            mouth_closed: false,
        }
    }

    pub fn up(&mut self) {
        self.steer(Direction::Up);
    }

    pub fn down(&mut self) {
        self.steer(Direction::Down);
    }

    pub fn left(&mut self) {
        self.steer(Direction::Left);
    }

    pub fn right(&mut self) {
        self.steer(Direction::Right);
    }

    pub fn steer(&mut self, direction: Direction) {
        self.desired = Some(direction);
    }

    pub fn desired_direction(&self) -> Option<Direction> {
        self.desired
    }

    pub fn speed(&self) -> f64 {
        self.kinematic.speed()
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.kinematic.set_speed(speed);
    }

    /// Alternates the open/closed mouth frame.
    pub fn switch_image(&mut self) {
        self.mouth_closed = !self.mouth_closed;
    }

    fn apply_desired_direction(&mut self) {
        let Some(desired) = self.desired else {
            return;
        };
        if self.possible.contains(desired) && self.kinematic.turn(desired) {
            self.desired = None;
        }
    }
}

impl Renderable for Player {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn sprite(&self) -> Sprite {
        if self.mouth_closed {
            Sprite::PlayerClosed
        } else {
            Sprite::player_facing(self.kinematic.direction())
        }
    }

    fn layer(&self) -> Layer {
        Layer::Foreground
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bounds
    }

    fn reset(&mut self) {
        let speed = self.kinematic.speed();
        self.kinematic = KinematicState::new(self.spawn, PLAYER_DEFAULT_DIRECTION, speed);
        self.bounds.set_top_left(self.spawn);
        self.desired = None;
        self.possible = DirectionSet::empty();
        self.mouth_closed = false;
    }
}

impl DynamicEntity for Player {
    fn update(&mut self) {
        self.apply_desired_direction();
        self.kinematic.update();
        self.bounds.set_top_left(self.kinematic.position());
    }

    fn direction(&self) -> Direction {
        self.kinematic.direction()
    }

    fn position_before_last_update(&self) -> Vector2D {
        self.kinematic.previous_position()
    }

    fn set_possible_directions(&mut self, directions: DirectionSet) {
        self.possible = directions;
    }

    fn place_at(&mut self, top_left: Vector2D) {
        self.kinematic.set_position(top_left);
        self.bounds.set_top_left(top_left);
    }
}
