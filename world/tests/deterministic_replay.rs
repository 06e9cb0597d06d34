use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use crawl_core::{Command, Direction, Event, GenerationConfig, Tile};
use crawl_world::{self as world, query, World};

#[test]
fn deterministic_replay_matches_between_runs() {
    for seed in [0, 7, 2024] {
        let first = replay(seed, &scripted_moves());
        let second = replay(seed, &scripted_moves());

        assert_eq!(first, second, "replay diverged for seed {seed}");
        assert_eq!(first.fingerprint(), second.fingerprint());
    }
}

#[test]
fn different_seeds_produce_different_floors() {
    let first = replay(1, &[]);
    let second = replay(2, &[]);
    assert_ne!(first.tiles, second.tiles);
}

#[test]
fn replay_never_loses_the_player() {
    let outcome = replay(31, &scripted_moves());
    let players = outcome
        .tiles
        .iter()
        .filter(|tile| tile.player_stats().is_some())
        .count();
    assert_eq!(players, 1);
}

fn replay(seed: u64, moves: &[Direction]) -> ReplayOutcome {
    let mut world = World::initialize(GenerationConfig::default(), seed, None).expect("valid");
    let mut log = Vec::new();

    for &direction in moves {
        let mut events = Vec::new();
        let result = world::apply(&mut world, Command::MovePlayer { direction }, &mut events);
        log.extend(events.into_iter().map(EventRecord::Event));
        if let Err(error) = result {
            log.push(EventRecord::Refused(error.to_string()));
        }
    }

    ReplayOutcome {
        floor: query::floor(&world),
        tiles: query::grid(&world).rows().flatten().copied().collect(),
        events: log,
    }
}

fn scripted_moves() -> Vec<Direction> {
    let pattern = [
        Direction::Right,
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];
    pattern.into_iter().cycle().take(64).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    floor: u32,
    tiles: Vec<Tile>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Event(Event),
    Refused(String),
}
