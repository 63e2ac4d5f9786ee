use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use maze_chase::config::{GameConfig, LevelConfig, ModeTable};
use maze_chase::constants::{tile_origin, PELLET_POINTS};
use maze_chase::engine::GameEngine;
use maze_chase::entity::{DynamicEntity, Renderable};
use maze_chase::error::{ConfigError, EngineError};
use maze_chase::maze::{MazeLayout, Tile};
use maze_chase::types::{Direction, EntityKind, GameStatus, GhostMode, Layer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ARENA: &str = "\
3111111114
2777777772
2731147772
27g7777p72
2777731772
2777777772
5111111116";

fn level_config(pacman_speed: f64, chase: f64, scatter: f64) -> LevelConfig {
    LevelConfig {
        pacman_speed,
        ghost_speed: ModeTable { chase, scatter },
        mode_lengths: ModeTable {
            chase: 20,
            scatter: 10,
        },
    }
}

fn engine_for(map: &str, levels: Vec<LevelConfig>, num_lives: i32) -> GameEngine {
    let config = GameConfig {
        map_file: PathBuf::from("inline"),
        num_lives,
        levels,
    };
    let layout = MazeLayout::parse(map).expect("layout parses");
    GameEngine::new(config, layout).expect("engine builds")
}

#[test]
fn single_pellet_level_is_won_on_first_tick() {
    let mut engine = engine_for("7p", vec![level_config(1.0, 1.0, 1.0)], 3);
    engine.start_game().expect("start");
    engine.tick().expect("tick");
    assert_eq!(engine.get_score(), PELLET_POINTS);
    assert_eq!(engine.get_game_status(), GameStatus::YouWin);
    assert_eq!(engine.snapshot().pellets_remaining, 0);
}

#[test]
fn ghost_mode_timer_switches_at_configured_lengths() {
    let mut engine = engine_for(ARENA, vec![level_config(1.0, 1.5, 0.5)], 50);
    engine.start_game().expect("start");
    for _ in 0..10 {
        engine.tick().expect("tick");
    }
    assert_eq!(engine.snapshot().ghost_mode, Some(GhostMode::Scatter));
    engine.tick().expect("tick");
    let level = engine.level().expect("level active");
    assert_eq!(level.ghost_mode(), GhostMode::Chase);
    assert!(level.ghosts().iter().all(|ghost| ghost.speed() == 1.5));

    for _ in 0..20 {
        engine.tick().expect("tick");
    }
    assert_eq!(engine.snapshot().ghost_mode, Some(GhostMode::Scatter));
}

#[test]
fn life_loss_resets_dynamic_entities_but_keeps_pellets() {
    let map = "\
1111111
17pg771
1111111";
    let mut engine = engine_for(map, vec![level_config(1.0, 2.0, 2.0)], 3);
    engine.start_game().expect("start");
    engine.tick().expect("tick");

    assert_eq!(engine.get_num_lives(), 2);
    let level = engine.level().expect("level active");
    assert_eq!(level.player().position(), tile_origin(2, 1));
    assert_eq!(level.player().direction(), Direction::Left);
    assert_eq!(level.ghosts()[0].position(), tile_origin(3, 1));
    let pellet_layers: Vec<Layer> = engine
        .get_renderables()
        .into_iter()
        .filter(|view| view.kind == EntityKind::Pellet)
        .map(|view| view.layer)
        .collect();
    assert_eq!(
        pellet_layers,
        vec![Layer::Invisible, Layer::Foreground, Layer::Foreground]
    );
}

#[test]
fn empty_levels_never_build_an_engine() {
    let config = GameConfig {
        map_file: PathBuf::from("inline"),
        num_lives: 3,
        levels: Vec::new(),
    };
    let layout = MazeLayout::parse("7p").expect("layout parses");
    let result = GameEngine::new(config, layout);
    assert!(matches!(
        result,
        Err(EngineError::Config(ConfigError::NoLevels))
    ));
}

#[test]
fn renderables_cover_every_tile_entity() {
    let mut engine = engine_for(ARENA, vec![level_config(1.0, 1.0, 1.0)], 3);
    engine.start_game().expect("start");
    let views = engine.get_renderables();
    let count = |kind: EntityKind| views.iter().filter(|view| view.kind == kind).count();
    assert_eq!(count(EntityKind::Player), 1);
    assert_eq!(count(EntityKind::Ghost), 1);
    assert_eq!(count(EntityKind::Pellet), 32);
    assert!(views
        .iter()
        .filter(|view| view.kind == EntityKind::Wall)
        .all(|view| view.layer == Layer::Background));
}

#[test]
fn random_play_keeps_score_and_lives_monotonic() {
    for seed in 0..4u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut engine = engine_for(
            ARENA,
            vec![level_config(1.0, 1.0, 0.8), level_config(1.5, 1.2, 1.0)],
            3,
        );
        engine.start_game().expect("start");
        let mut previous = engine.snapshot();

        for tick in 0..5_000u64 {
            if tick % 12 == 0 {
                let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
                engine.move_intent(direction);
            }
            engine.tick().expect("tick");
            let snapshot = engine.snapshot();
            assert!(snapshot.score >= previous.score, "seed {seed} tick {tick}");
            assert!(snapshot.num_lives <= previous.num_lives, "seed {seed} tick {tick}");
            assert!(previous.num_lives - snapshot.num_lives <= 1);
            if snapshot.status != GameStatus::YouWin {
                assert_eq!(
                    snapshot.num_lives <= 0,
                    snapshot.status == GameStatus::GameOver,
                    "seed {seed} tick {tick}"
                );
            }
            previous = snapshot;
            if engine.is_terminal() {
                break;
            }
        }
    }
}

#[test]
fn entities_never_rest_inside_walls() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut engine = engine_for(ARENA, vec![level_config(1.0, 1.0, 1.0)], 50);
    engine.start_game().expect("start");
    for tick in 0..2_000u64 {
        if tick % 9 == 0 {
            engine.move_intent(Direction::ALL[rng.random_range(0..4)]);
        }
        engine.tick().expect("tick");
        let Some(level) = engine.level() else {
            break;
        };
        let walls = level.maze().walls();
        let movers = std::iter::once(level.player().bounding_box())
            .chain(level.ghosts().iter().map(|ghost| ghost.bounding_box()));
        for mover in movers {
            assert!(
                walls.iter().all(|wall| !mover.overlaps(wall.bounding_box())),
                "tick {tick}: {:?}",
                mover
            );
        }
        if engine.is_terminal() {
            break;
        }
    }
}

#[test]
fn bundled_configuration_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.json");
    let mut engine = GameEngine::from_config_file(&path).expect("bundled config loads");
    assert!(engine.num_levels() >= 1);
    engine.start_game().expect("start");
    assert_eq!(engine.get_game_status(), GameStatus::Ready);
    assert!(engine.snapshot().pellets_remaining > 0);
}

fn reachable_from(layout: &MazeLayout, start: (i32, i32)) -> HashSet<(i32, i32)> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some((col, row)) = queue.pop_front() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.grid_offset();
            let next = (col + dx, row + dy);
            if layout.is_walkable(next.0, next.1) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[test]
fn bundled_map_is_winnable_and_ghosts_can_reach_the_player() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("maps/classic.txt");
    let layout = MazeLayout::load(&path).expect("bundled map loads");
    let reachable = reachable_from(&layout, layout.player_spawn());

    let stranded: Vec<(i32, i32)> = (0..layout.height())
        .flat_map(|row| (0..layout.width()).map(move |col| (col, row)))
        .filter(|&(col, row)| layout.tile(col, row) == Some(Tile::Pellet))
        .filter(|cell| !reachable.contains(cell))
        .collect();
    assert!(stranded.is_empty(), "unreachable pellets {stranded:?}");
    assert!(layout
        .ghost_spawns()
        .iter()
        .all(|spawn| reachable.contains(spawn)));
}
