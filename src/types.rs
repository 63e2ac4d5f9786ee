use std::fmt;

use serde::Serialize;

use crate::physics::Vector2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used wherever candidates are compared; ties resolve to
    /// the earliest entry.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub fn is_perpendicular_to(self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }

    pub fn unit(self) -> Vector2D {
        match self {
            Self::Up => Vector2D::new(0.0, -1.0),
            Self::Down => Vector2D::new(0.0, 1.0),
            Self::Left => Vector2D::new(-1.0, 0.0),
            Self::Right => Vector2D::new(1.0, 0.0),
        }
    }

    pub fn grid_offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub fn parse_move(value: &str) -> Option<Self> {
        match value {
            "up" | "w" => Some(Self::Up),
            "down" | "s" => Some(Self::Down),
            "left" | "a" => Some(Self::Left),
            "right" | "d" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Small ordered set of directions, iterated in [`Direction::ALL`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Direction::ALL.into_iter().collect()
    }

    fn bit(direction: Direction) -> u8 {
        match direction {
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 8,
        }
    }

    pub fn insert(&mut self, direction: Direction) {
        self.0 |= Self::bit(direction);
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !Self::bit(direction);
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.0 & Self::bit(direction) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.contains(*direction))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = Self::empty();
        for direction in iter {
            set.insert(direction);
        }
        set
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Chase,
    Scatter,
}

impl GhostMode {
    pub fn next(self) -> Self {
        match self {
            Self::Chase => Self::Scatter,
            Self::Scatter => Self::Chase,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Background,
    Foreground,
    Effect,
    Invisible,
}

/// Image handle handed to the renderer; asset lookup happens outside the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sprite {
    PlayerUp,
    PlayerDown,
    PlayerLeft,
    PlayerRight,
    PlayerClosed,
    Ghost,
    Pellet,
    WallHorizontal,
    WallVertical,
    WallUpLeft,
    WallUpRight,
    WallDownLeft,
    WallDownRight,
}

impl Sprite {
    pub fn player_facing(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::PlayerUp,
            Direction::Down => Self::PlayerDown,
            Direction::Left => Self::PlayerLeft,
            Direction::Right => Self::PlayerRight,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    #[serde(rename = "READY!")]
    Ready,
    #[serde(rename = "YOU WIN!")]
    YouWin,
    #[serde(rename = "GAME OVER")]
    GameOver,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY!",
            Self::YouWin => "YOU WIN!",
            Self::GameOver => "GAME OVER",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Ready)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Ghost,
    Wall,
    Pellet,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderableView {
    pub kind: EntityKind,
    pub image: Sprite,
    pub layer: Layer,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: i32,
    #[serde(rename = "numLives")]
    pub num_lives: i32,
    #[serde(rename = "levelNo")]
    pub level_no: usize,
    #[serde(rename = "numLevels")]
    pub num_levels: usize,
    pub tick: u64,
    #[serde(rename = "ghostMode")]
    pub ghost_mode: Option<GhostMode>,
    #[serde(rename = "pelletsRemaining")]
    pub pellets_remaining: usize,
}
