//! Entity capabilities and the concrete maze inhabitants.
//!
//! Every entity is [`Renderable`]. Player and ghosts add [`DynamicEntity`];
//! pellets add [`Collectable`]. Collision reactions are looked up by the pair of
//! [`EntityKind`]s in [`reaction`] instead of inspecting concrete types.

mod ghost;
mod player;
mod static_entity;

pub use ghost::Ghost;
pub use player::Player;
pub use static_entity::{Pellet, Wall, WallShape};

use crate::physics::{resolve_collision, BoundingBox, Vector2D};
use crate::types::{Direction, DirectionSet, EntityKind, Layer, RenderableView, Sprite};

pub trait Renderable {
    fn kind(&self) -> EntityKind;
    fn sprite(&self) -> Sprite;
    fn layer(&self) -> Layer;
    fn bounding_box(&self) -> &BoundingBox;
    /// Returns the entity to its spawn state.
    fn reset(&mut self);

    fn position(&self) -> Vector2D {
        self.bounding_box().top_left()
    }

    fn width(&self) -> f64 {
        self.bounding_box().width()
    }

    fn height(&self) -> f64 {
        self.bounding_box().height()
    }

    fn view(&self) -> RenderableView {
        let position = self.position();
        RenderableView {
            kind: self.kind(),
            image: self.sprite(),
            layer: self.layer(),
            x: position.x,
            y: position.y,
            width: self.width(),
            height: self.height(),
        }
    }
}

pub trait DynamicEntity: Renderable {
    fn update(&mut self);
    fn direction(&self) -> Direction;
    fn position_before_last_update(&self) -> Vector2D;
    fn set_possible_directions(&mut self, directions: DirectionSet);
    /// Moves the entity's top-left corner without touching its heading.
    fn place_at(&mut self, top_left: Vector2D);

    fn center(&self) -> Vector2D {
        self.bounding_box().center()
    }

    fn collides_with(&self, other: &dyn Renderable) -> bool {
        self.bounding_box()
            .collides_with(self.direction(), other.bounding_box())
    }

    fn push_out_of(&mut self, obstacle: &BoundingBox) {
        let corrected = resolve_collision(self.direction(), self.bounding_box(), obstacle);
        self.place_at(corrected);
    }
}

pub trait Collectable: Renderable {
    fn is_collectable(&self) -> bool;
    /// Marks the item consumed and yields its points, or `None` if it was
    /// already consumed.
    fn collect(&mut self) -> Option<i32>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    None,
    LoseLife,
    Collect,
    Block,
}

/// Reaction for an overlapping pair, symmetric in its arguments.
pub fn reaction(a: EntityKind, b: EntityKind) -> Reaction {
    use EntityKind::{Ghost, Pellet, Player, Wall};
    match (a, b) {
        (Player, Ghost) | (Ghost, Player) => Reaction::LoseLife,
        (Player, Pellet) | (Pellet, Player) => Reaction::Collect,
        (Player, Wall) | (Wall, Player) | (Ghost, Wall) | (Wall, Ghost) => Reaction::Block,
        (Player, Player) | (Ghost, Ghost) | (Ghost, Pellet) | (Pellet, Ghost) => Reaction::None,
        (Wall, Wall) | (Wall, Pellet) | (Pellet, Wall) | (Pellet, Pellet) => Reaction::None,
    }
}

/// Stable handle into a maze's entity arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRef {
    Player,
    Ghost(usize),
    Wall(usize),
    Pellet(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DynamicRef {
    Player,
    Ghost(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [EntityKind; 4] = [
        EntityKind::Player,
        EntityKind::Ghost,
        EntityKind::Wall,
        EntityKind::Pellet,
    ];

    #[test]
    fn reaction_table_is_symmetric() {
        for a in KINDS {
            for b in KINDS {
                assert_eq!(reaction(a, b), reaction(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn only_player_and_ghost_cost_a_life() {
        for a in KINDS {
            for b in KINDS {
                let expected = matches!(
                    (a, b),
                    (EntityKind::Player, EntityKind::Ghost) | (EntityKind::Ghost, EntityKind::Player)
                );
                assert_eq!(reaction(a, b) == Reaction::LoseLife, expected);
            }
        }
    }

    #[test]
    fn walls_block_every_moving_kind() {
        assert_eq!(reaction(EntityKind::Player, EntityKind::Wall), Reaction::Block);
        assert_eq!(reaction(EntityKind::Ghost, EntityKind::Wall), Reaction::Block);
        assert_eq!(reaction(EntityKind::Ghost, EntityKind::Pellet), Reaction::None);
    }

    #[test]
    fn only_the_player_collects_pellets() {
        for a in KINDS {
            for b in KINDS {
                let expected = matches!(
                    (a, b),
                    (EntityKind::Player, EntityKind::Pellet) | (EntityKind::Pellet, EntityKind::Player)
                );
                assert_eq!(reaction(a, b) == Reaction::Collect, expected);
            }
        }
    }
}
