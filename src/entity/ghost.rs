use crate::config::ModeTable;
use crate::constants::{GHOST_DEFAULT_DIRECTION, TILE_SIZE};
use crate::entity::{DynamicEntity, Renderable};
use crate::maze::Maze;
use crate::physics::{BoundingBox, KinematicState, Vector2D};
use crate::types::{Direction, DirectionSet, EntityKind, GhostMode, Layer, Sprite};

/// Autonomous pursuer. Chases the last player position it was told about, or
/// heads for its scatter corner, re-targeting only at intersections.
#[derive(Clone, Debug)]
pub struct Ghost {
    bounds: BoundingBox,
    kinematic: KinematicState,
    spawn: Vector2D,
    mode: GhostMode,
    speeds: ModeTable<f64>,
    target_corner: Vector2D,
    target_location: Vector2D,
    player_position: Vector2D,
    possible: DirectionSet,
}

impl Ghost {
    pub fn new(spawn: Vector2D, target_corner: Vector2D, speeds: ModeTable<f64>) -> Self {
        let mode = GhostMode::Scatter;
        Self {
            bounds: BoundingBox::new(spawn, TILE_SIZE, TILE_SIZE),
            kinematic: KinematicState::new(spawn, GHOST_DEFAULT_DIRECTION, speeds.get(mode)),
            spawn,
            mode,
            speeds,
            target_corner,
            target_location: target_corner,
            player_position: spawn,
            possible: DirectionSet::empty(),
        }
    }

    pub fn ghost_mode(&self) -> GhostMode {
        self.mode
    }

    /// Switches behaviour and swaps in the speed for the new mode immediately.
    pub fn set_ghost_mode(&mut self, mode: GhostMode) {
        self.mode = mode;
        self.kinematic.set_speed(self.speeds.get(mode));
    }

    pub fn set_player_position(&mut self, position: Vector2D) {
        self.player_position = position;
    }

    pub fn speed(&self) -> f64 {
        self.kinematic.speed()
    }

    pub fn target_corner(&self) -> Vector2D {
        self.target_corner
    }

    pub fn target_location(&self) -> Vector2D {
        self.target_location
    }

    fn target_for_mode(&self) -> Vector2D {
        match self.mode {
            GhostMode::Chase => self.player_position,
            GhostMode::Scatter => self.target_corner,
        }
    }

    /// Greedy choice among `possible`: the direction whose one-step look-ahead
    /// lands closest to the current target. Reversing is excluded unless it is
    /// the only option; ties go to the earlier direction in [`Direction::ALL`].
    pub fn select_direction(&self, possible: DirectionSet) -> Direction {
        let current = self.kinematic.direction();
        if possible.is_empty() {
            return current;
        }
        let reverse = current.opposite();
        let dead_end = possible.len() == 1 && possible.contains(reverse);

        let mut best: Option<(Direction, f64)> = None;
        for direction in possible.iter() {
            if direction == reverse && !dead_end {
                continue;
            }
            let distance = self
                .kinematic
                .potential_position(direction)
                .distance(self.target_location);
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((direction, distance)),
            }
        }
        best.map(|(direction, _)| direction).unwrap_or(current)
    }

    fn update_direction(&mut self) {
        if Maze::is_at_intersection(self.possible) {
            self.target_location = self.target_for_mode();
        }
        let chosen = self.select_direction(self.possible);
        // A refused perpendicular turn keeps the current heading; selection
        // runs again next tick once the ghost reaches the cell line.
        self.kinematic.turn(chosen);
    }
}

impl Renderable for Ghost {
    fn kind(&self) -> EntityKind {
        EntityKind::Ghost
    }

    fn sprite(&self) -> Sprite {
        Sprite::Ghost
    }

    fn layer(&self) -> Layer {
        Layer::Foreground
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bounds
    }

    fn reset(&mut self) {
        self.kinematic =
            KinematicState::new(self.spawn, GHOST_DEFAULT_DIRECTION, self.speeds.get(self.mode));
        self.bounds.set_top_left(self.spawn);
        self.possible = DirectionSet::empty();
        self.target_location = self.target_for_mode();
    }
}

impl DynamicEntity for Ghost {
    fn update(&mut self) {
        self.update_direction();
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

#[cfg(test)]
mod tests {
    use super::*;

    fn speeds() -> ModeTable<f64> {
        ModeTable {
            chase: 2.0,
            scatter: 1.0,
        }
    }

    fn set(directions: &[Direction]) -> DirectionSet {
        directions.iter().copied().collect()
    }

    #[test]
    fn never_reverses_while_another_option_exists() {
        // Target sits straight behind the ghost, which is heading left.
        let ghost = Ghost::new(Vector2D::new(64.0, 64.0), Vector2D::new(200.0, 64.0), speeds());
        let chosen = ghost.select_direction(set(&[Direction::Left, Direction::Right, Direction::Up]));
        assert_ne!(chosen, Direction::Right);
        assert_eq!(chosen, Direction::Up);
    }

    #[test]
    fn reverses_at_dead_end() {
        let ghost = Ghost::new(Vector2D::new(64.0, 64.0), Vector2D::ZERO, speeds());
        assert_eq!(ghost.select_direction(set(&[Direction::Right])), Direction::Right);
    }

    #[test]
    fn keeps_heading_without_options() {
        let ghost = Ghost::new(Vector2D::new(64.0, 64.0), Vector2D::ZERO, speeds());
        assert_eq!(ghost.select_direction(DirectionSet::empty()), Direction::Left);
    }

    #[test]
    fn picks_direction_closest_to_target() {
        let ghost = Ghost::new(Vector2D::new(64.0, 64.0), Vector2D::new(64.0, 300.0), speeds());
        let chosen = ghost.select_direction(set(&[Direction::Up, Direction::Down, Direction::Left]));
        assert_eq!(chosen, Direction::Down);
    }

    #[test]
    fn ties_resolve_in_enumeration_order() {
        // Up and Down are equidistant from a target level with the ghost.
        let ghost = Ghost::new(Vector2D::new(64.0, 64.0), Vector2D::new(64.0, 64.0), speeds());
        let chosen = ghost.select_direction(set(&[Direction::Down, Direction::Up]));
        assert_eq!(chosen, Direction::Up);
    }

    #[test]
    fn mode_switch_swaps_speed_immediately() {
        let mut ghost = Ghost::new(Vector2D::ZERO, Vector2D::ZERO, speeds());
        assert_eq!(ghost.speed(), 1.0);
        ghost.set_ghost_mode(GhostMode::Chase);
        assert_eq!(ghost.ghost_mode(), GhostMode::Chase);
        assert_eq!(ghost.speed(), 2.0);
    }

    #[test]
    fn retargets_only_at_intersections() {
        let mut ghost = Ghost::new(Vector2D::new(64.0, 64.0), Vector2D::new(0.0, 0.0), speeds());
        ghost.set_ghost_mode(GhostMode::Chase);
        ghost.set_player_position(Vector2D::new(160.0, 64.0));

        ghost.set_possible_directions(set(&[Direction::Left, Direction::Right]));
        ghost.update();
        assert_eq!(ghost.target_location(), Vector2D::new(0.0, 0.0));

        ghost.set_possible_directions(DirectionSet::all());
        ghost.update();
        assert_eq!(ghost.target_location(), Vector2D::new(160.0, 64.0));
    }

    #[test]
    fn reset_restores_spawn_and_default_heading() {
        let mut ghost = Ghost::new(Vector2D::new(32.0, 32.0), Vector2D::ZERO, speeds());
        ghost.set_possible_directions(set(&[Direction::Right]));
        ghost.update();
        ghost.update();
        assert_ne!(ghost.position(), Vector2D::new(32.0, 32.0));
        ghost.set_ghost_mode(GhostMode::Chase);
        ghost.reset();
        assert_eq!(ghost.position(), Vector2D::new(32.0, 32.0));
        assert_eq!(ghost.direction(), GHOST_DEFAULT_DIRECTION);
        assert_eq!(ghost.speed(), 2.0);
    }
}
