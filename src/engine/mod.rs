use std::path::Path;

use log::info;

use crate::config::GameConfig;
use crate::error::EngineError;
use crate::maze::MazeLayout;
use crate::types::{Direction, GameSnapshot, GameStatus, RenderableView};

mod level;
mod observer;

pub use self::level::Level;
pub use self::observer::{Observer, ObserverId};

use self::observer::ObserverList;

/// Top-level session: walks the configured levels in order, carrying score and
/// lives forward, and fans a snapshot out to observers after every change.
pub struct GameEngine {
    config: GameConfig,
    layout: MazeLayout,
    level: Option<Level>,
    level_no: usize,
    final_score: i32,
    final_lives: i32,
    observers: ObserverList,
}

impl GameEngine {
    pub fn new(config: GameConfig, layout: MazeLayout) -> Result<Self, EngineError> {
        config.validate()?;
        let final_lives = config.num_lives;
        Ok(Self {
            config,
            layout,
            level: None,
            level_no: 0,
            final_score: 0,
            final_lives,
            observers: ObserverList::default(),
        })
    }

    pub fn from_config_file(path: &Path) -> Result<Self, EngineError> {
        let config = GameConfig::load(path)?;
        let layout = MazeLayout::load(&config.map_file)?;
        Self::new(config, layout)
    }

    pub fn start_game(&mut self) -> Result<(), EngineError> {
        self.final_score = 0;
        self.final_lives = self.config.num_lives;
        self.start_level(0, self.config.num_lives, 0)?;
        self.notify_observers();
        Ok(())
    }

    fn start_level(&mut self, level_no: usize, num_lives: i32, score: i32) -> Result<(), EngineError> {
        let levels = self.config.levels.len();
        let level_config = self
            .config
            .levels
            .get(level_no)
            .ok_or(EngineError::LevelOutOfRange {
                level: level_no,
                levels,
            })?;
        let level = Level::new(level_no, level_config, &self.layout, num_lives, score)?;
        self.level = Some(level);
        self.level_no = level_no;
        info!(
            "level {} of {} started with {} lives, score {}",
            level_no + 1,
            levels,
            num_lives,
            score
        );
        Ok(())
    }

    /// Advances the current level by one step. Does nothing before
    /// `start_game` or once the game has been won or lost.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        if self.is_terminal() {
            return Ok(());
        }
        let Some(level) = self.level.as_mut() else {
            return Ok(());
        };
        let lives_before = level.num_lives();
        level.tick();

        let (finished, lives, score) = (level.is_level_finished(), level.num_lives(), level.score());
        if finished {
            info!("level {} cleared with score {}", self.level_no + 1, score);
            let next = self.level_no + 1;
            if next < self.config.levels.len() {
                self.start_level(next, lives, score)?;
            } else {
                info!("game won with score {score}");
            }
        } else if lives <= 0 && lives_before > 0 {
            info!("game over with score {score}");
        }
        self.notify_observers();
        Ok(())
    }

    pub fn end_game(&mut self) {
        if let Some(level) = self.level.take() {
            self.final_score = level.score();
            self.final_lives = level.num_lives();
            info!(
                "game ended at level {} with score {}",
                self.level_no + 1,
                self.final_score
            );
        }
        self.notify_observers();
    }

    pub fn move_up(&mut self) {
        self.move_intent(Direction::Up);
    }

    pub fn move_down(&mut self) {
        self.move_intent(Direction::Down);
    }

    pub fn move_left(&mut self) {
        self.move_intent(Direction::Left);
    }

    pub fn move_right(&mut self) {
        self.move_intent(Direction::Right);
    }

    pub fn move_intent(&mut self, direction: Direction) {
        if self.is_terminal() {
            return;
        }
        if let Some(level) = self.level.as_mut() {
            level.move_intent(direction);
        }
        self.notify_observers();
    }

    pub fn get_renderables(&self) -> Vec<RenderableView> {
        self.level
            .as_ref()
            .map(Level::renderables)
            .unwrap_or_default()
    }

    pub fn get_num_lives(&self) -> i32 {
        self.level.as_ref().map_or(self.final_lives, Level::num_lives)
    }

    pub fn get_score(&self) -> i32 {
        self.level.as_ref().map_or(self.final_score, Level::score)
    }

    /// Derived from the current level on every call.
    pub fn get_game_status(&self) -> GameStatus {
        match &self.level {
            None => GameStatus::GameOver,
            Some(level) if level.is_level_finished() => GameStatus::YouWin,
            Some(level) if level.num_lives() <= 0 => GameStatus::GameOver,
            Some(_) => GameStatus::Ready,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.get_game_status().is_terminal()
    }

    pub fn current_level_no(&self) -> usize {
        self.level_no
    }

    pub fn num_levels(&self) -> usize {
        self.config.levels.len()
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let level = self.level.as_ref();
        GameSnapshot {
            status: self.get_game_status(),
            score: self.get_score(),
            num_lives: self.get_num_lives(),
            level_no: self.level_no,
            num_levels: self.num_levels(),
            tick: level.map_or(0, Level::elapsed_ticks),
            ghost_mode: level.map(Level::ghost_mode),
            pellets_remaining: level.map_or(0, Level::pellets_remaining),
        }
    }

    pub fn register_observer(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub fn notify_observers(&mut self) {
        let snapshot = self.snapshot();
        self.observers.notify(&snapshot);
    }
}
