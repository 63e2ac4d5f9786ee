use log::debug;

use crate::config::{LevelConfig, ModeTable};
use crate::constants::PLAYER_IMAGE_SWAP_TICK_COUNT;
use crate::entity::{reaction, Collectable, DynamicEntity, DynamicRef, Ghost, Player, Reaction, Renderable};
use crate::error::ConfigError;
use crate::maze::{Maze, MazeLayout};
use crate::physics::BoundingBox;
use crate::types::{Direction, EntityKind, GhostMode, RenderableView};

/// One playthrough of the maze with a single level's tuning.
#[derive(Clone, Debug)]
pub struct Level {
    level_no: usize,
    maze: Maze,
    wall_bounds: Vec<BoundingBox>,
    /// Pellet indices still in play; compacted at the end of every tick.
    collectables: Vec<usize>,
    score: i32,
    num_lives: i32,
    tick_count: u32,
    elapsed_ticks: u64,
    mode_lengths: ModeTable<u32>,
    ghost_mode: GhostMode,
}

impl Level {
    pub fn new(
        level_no: usize,
        config: &LevelConfig,
        layout: &MazeLayout,
        num_lives: i32,
        score: i32,
    ) -> Result<Self, ConfigError> {
        config.validate(level_no)?;
        let mut maze = Maze::new(layout, config.pacman_speed, config.ghost_speed);
        let ghost_mode = GhostMode::Scatter;
        for ghost in maze.ghosts_mut() {
            ghost.set_ghost_mode(ghost_mode);
        }
        let wall_bounds = maze.walls().iter().map(|wall| *wall.bounding_box()).collect();
        let collectables = (0..maze.pellets().len()).collect();

        Ok(Self {
            level_no,
            maze,
            wall_bounds,
            collectables,
            score,
            num_lives,
            tick_count: 0,
            elapsed_ticks: 0,
            mode_lengths: config.mode_lengths,
            ghost_mode,
        })
    }

    pub fn tick(&mut self) {
        self.push_player_position();
        self.advance_ghost_mode();

        if u64::from(self.tick_count) % PLAYER_IMAGE_SWAP_TICK_COUNT == 0 {
            self.maze.player_mut().switch_image();
        }

        let handles = self.maze.dynamic_handles();
        for handle in &handles {
            self.maze.update_possible_directions(*handle);
            if let Some(entity) = self.maze.dynamic_mut(*handle) {
                entity.update();
            }
        }

        self.collect_pellets();
        self.resolve_dynamic_collisions(&handles);
        self.resolve_wall_collisions(&handles);
        self.collectables
            .retain(|idx| self.maze.pellets().get(*idx).is_some_and(|p| p.is_collectable()));

        self.tick_count += 1;
        self.elapsed_ticks += 1;
    }

    fn push_player_position(&mut self) {
        let position = self.maze.player().position();
        for ghost in self.maze.ghosts_mut() {
            ghost.set_player_position(position);
        }
    }

    fn advance_ghost_mode(&mut self) {
        if self.tick_count != self.mode_lengths.get(self.ghost_mode) {
            return;
        }
        self.ghost_mode = self.ghost_mode.next();
        for ghost in self.maze.ghosts_mut() {
            ghost.set_ghost_mode(self.ghost_mode);
        }
        self.tick_count = 0;
        debug!(
            "level {} ghost mode -> {:?} at tick {}",
            self.level_no, self.ghost_mode, self.elapsed_ticks
        );
    }

    /// Marks every pellet the player touches this tick. A pellet under the
    /// player's centre counts even if the box test sees it behind the player.
    fn collect_pellets(&mut self) {
        let player = self.maze.player();
        let player_center = player.center();
        let touched: Vec<usize> = self
            .collectables
            .iter()
            .copied()
            .filter(|idx| {
                self.maze.pellets().get(*idx).is_some_and(|pellet| {
                    reaction(player.kind(), pellet.kind()) == Reaction::Collect
                        && pellet.is_collectable()
                        && (player.collides_with(pellet)
                            || pellet.bounding_box().contains_point(player_center))
                })
            })
            .collect();

        for idx in touched {
            if let Some(points) = self.maze.pellet_mut(idx).and_then(|pellet| pellet.collect()) {
                self.score += points;
            }
        }
    }

    fn resolve_dynamic_collisions(&mut self, handles: &[DynamicRef]) {
        let mut life_lost = false;
        for (i, first) in handles.iter().enumerate() {
            for second in &handles[i + 1..] {
                let (Some(a), Some(b)) = (self.maze.dynamic(*first), self.maze.dynamic(*second))
                else {
                    continue;
                };
                let touching = a.bounding_box().collides_with(a.direction(), b.bounding_box())
                    || b.bounding_box().collides_with(b.direction(), a.bounding_box());
                if !touching {
                    continue;
                }
                if reaction(a.kind(), b.kind()) == Reaction::LoseLife && !life_lost {
                    self.handle_lose_life();
                    life_lost = true;
                }
            }
        }
    }

    fn resolve_wall_collisions(&mut self, handles: &[DynamicRef]) {
        for handle in handles {
            let Some(entity) = self.maze.dynamic_mut(*handle) else {
                continue;
            };
            if reaction(entity.kind(), EntityKind::Wall) != Reaction::Block {
                continue;
            }
            for wall in &self.wall_bounds {
                if entity.bounding_box().collides_with(entity.direction(), wall) {
                    entity.push_out_of(wall);
                }
            }
        }
    }

    /// Costs one life and sends the player and every ghost back to spawn.
    /// Collected pellets stay collected.
    pub fn handle_lose_life(&mut self) {
        self.num_lives -= 1;
        self.maze.player_mut().reset();
        for ghost in self.maze.ghosts_mut() {
            ghost.reset();
        }
        debug!(
            "level {} life lost at tick {}, {} remaining",
            self.level_no, self.elapsed_ticks, self.num_lives
        );
    }

    /// Re-derived on every call from the pellets themselves.
    pub fn is_level_finished(&self) -> bool {
        self.maze.pellets().iter().all(|pellet| !pellet.is_collectable())
    }

    pub fn move_intent(&mut self, direction: Direction) {
        self.maze.player_mut().steer(direction);
    }

    pub fn level_no(&self) -> usize {
        self.level_no
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn num_lives(&self) -> i32 {
        self.num_lives
    }

    /// Ticks since the last ghost mode change.
    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn ghost_mode(&self) -> GhostMode {
        self.ghost_mode
    }

    pub fn pellets_remaining(&self) -> usize {
        self.maze
            .pellets()
            .iter()
            .filter(|pellet| pellet.is_collectable())
            .count()
    }

    pub fn player(&self) -> &Player {
        self.maze.player()
    }

    pub fn ghosts(&self) -> &[Ghost] {
        self.maze.ghosts()
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn renderables(&self) -> Vec<RenderableView> {
        self.maze.renderables()
    }
}
