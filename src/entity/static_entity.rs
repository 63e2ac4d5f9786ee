use crate::constants::{tile_origin, PELLET_POINTS, TILE_SIZE};
use crate::entity::{Collectable, Renderable};
use crate::physics::BoundingBox;
use crate::types::{EntityKind, Layer, Sprite};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallShape {
    Horizontal,
    Vertical,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl WallShape {
    pub fn sprite(self) -> Sprite {
        match self {
            Self::Horizontal => Sprite::WallHorizontal,
            Self::Vertical => Sprite::WallVertical,
            Self::UpLeft => Sprite::WallUpLeft,
            Self::UpRight => Sprite::WallUpRight,
            Self::DownLeft => Sprite::WallDownLeft,
            Self::DownRight => Sprite::WallDownRight,
        }
    }
}

/// Impassable tile. Contributes collision geometry only.
#[derive(Clone, Debug)]
pub struct Wall {
    bounds: BoundingBox,
    shape: WallShape,
}

impl Wall {
    pub fn new(col: i32, row: i32, shape: WallShape) -> Self {
        Self {
            bounds: BoundingBox::new(tile_origin(col, row), TILE_SIZE, TILE_SIZE),
            shape,
        }
    }

    pub fn shape(&self) -> WallShape {
        self.shape
    }
}

impl Renderable for Wall {
    fn kind(&self) -> EntityKind {
        EntityKind::Wall
    }

    fn sprite(&self) -> Sprite {
        self.shape.sprite()
    }

    fn layer(&self) -> Layer {
        Layer::Background
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bounds
    }

    fn reset(&mut self) {}
}

#[derive(Clone, Debug)]
pub struct Pellet {
    bounds: BoundingBox,
    points: i32,
    collected: bool,
}

impl Pellet {
    pub fn new(col: i32, row: i32) -> Self {
        Self {
            bounds: BoundingBox::new(tile_origin(col, row), TILE_SIZE, TILE_SIZE),
            points: PELLET_POINTS,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

impl Renderable for Pellet {
    fn kind(&self) -> EntityKind {
        EntityKind::Pellet
    }

    fn sprite(&self) -> Sprite {
        Sprite::Pellet
    }

    fn layer(&self) -> Layer {
        if self.collected {
            Layer::Invisible
        } else {
            Layer::Foreground
        }
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bounds
    }

    fn reset(&mut self) {
        self.collected = false;
    }
}

impl Collectable for Pellet {
    fn is_collectable(&self) -> bool {
        !self.collected
    }

    fn collect(&mut self) -> Option<i32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.points)
    }
}
