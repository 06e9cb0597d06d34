//! Turn resolution: player moves, battles, pickups and enemy pursuit.

use crawl_core::{
    Combatant, Direction, Event, GridError, MoveEvent, MoveResolution, Pickup, PlayerStats,
    Position, RunStatus, Tile, TileKind,
};
use crawl_system_path_tracer::next_step;
use log::{debug, info, warn};

use crate::{
    generation::{floor_rng, generate_floor},
    grid::Grid,
    registry, World, WorldError,
};

/// Classifies the tile one step away from `origin` without mutating anything.
///
/// Out-of-bounds targets surface as [`GridError::OutOfBounds`]; rock and any
/// other impassable kind resolve to [`MoveEvent::Null`] with the destination
/// pinned to `origin`.
pub fn resolve_move(
    grid: &Grid,
    origin: Position,
    direction: Direction,
) -> Result<MoveResolution, GridError> {
    let target = origin.step(direction);
    let tile = *grid.tile_at(target)?;

    let event = match tile.kind() {
        TileKind::Empty => MoveEvent::Step,
        TileKind::Enemy => MoveEvent::Battle,
        kind if kind.is_pickup() => MoveEvent::Pickup,
        _ => MoveEvent::Null,
    };
    let destination = match event {
        MoveEvent::Null => origin,
        _ => target,
    };

    Ok(MoveResolution {
        event,
        tile,
        origin,
        destination,
    })
}

pub(crate) fn take_turn(
    world: &mut World,
    direction: Direction,
    out: &mut Vec<Event>,
) -> Result<(), WorldError> {
    if world.status == RunStatus::Defeated {
        return Err(WorldError::RunOver);
    }

    let origin = registry::player_position(&world.grid).ok_or(WorldError::PlayerMissing)?;
    let resolution = resolve_move(&world.grid, origin, direction)?;
    debug!(
        "player at {origin} moving {direction:?} resolved to {:?}",
        resolution.event
    );

    match resolution.event {
        MoveEvent::Null => {
            out.push(Event::MoveBlocked {
                at: origin,
                direction,
            });
            return Ok(());
        }
        MoveEvent::Step => {
            world.grid.move_entity(origin, resolution.destination)?;
            out.push(Event::PlayerMoved {
                from: origin,
                to: resolution.destination,
            });
        }
        MoveEvent::Battle => battle(world, &resolution, out)?,
        MoveEvent::Pickup if resolution.tile.kind() == TileKind::Key => {
            descend(world, &resolution, out)?;
        }
        MoveEvent::Pickup => collect_gold(world, &resolution, out)?,
    }

    pursue(world, out)
}

fn battle(
    world: &mut World,
    resolution: &MoveResolution,
    out: &mut Vec<Event>,
) -> Result<(), WorldError> {
    let origin = resolution.origin;
    let at = resolution.destination;
    let mut player = player_at(&world.grid, origin)?;
    let mut enemy = resolution
        .tile
        .enemy_stats()
        .copied()
        .ok_or(WorldError::NotAnEnemy { position: at })?;

    let outcome = world
        .combat
        .resolve(&mut player, &mut enemy, &mut world.turn_rng);
    debug!(
        "battle at {at} ended after {} exchanges, {:?} standing",
        outcome.exchanges, outcome.victor
    );
    out.push(Event::BattleResolved { at, outcome });

    match outcome.victor {
        Combatant::Player => {
            let gold_dropped = world.combat.roll_gold_drop(&enemy, &mut world.turn_rng);
            player.gold = player.gold.saturating_add(gold_dropped);

            world.grid.carve(at)?;
            let _ = world.grid.replace(origin, Tile::player(player))?;
            world.grid.move_entity(origin, at)?;
            out.push(Event::BattleWon { at, gold_dropped });
            out.push(Event::PlayerMoved {
                from: origin,
                to: at,
            });
        }
        Combatant::Enemy => {
            let _ = world.grid.replace(origin, Tile::player(player))?;
            let _ = world.grid.replace(at, Tile::enemy(enemy))?;
            world.status = RunStatus::Defeated;
            info!("player defeated at {origin} on floor {}", world.floor);
            out.push(Event::PlayerDefeated { at: origin });
        }
    }
    Ok(())
}

fn collect_gold(
    world: &mut World,
    resolution: &MoveResolution,
    out: &mut Vec<Event>,
) -> Result<(), WorldError> {
    let origin = resolution.origin;
    let at = resolution.destination;
    let mut player = player_at(&world.grid, origin)?;
    let amount = resolution.tile.pickup().map_or(1, Pickup::amount);
    player.gold = player.gold.saturating_add(amount);

    let _ = world.grid.replace(origin, Tile::player(player))?;
    world.grid.move_entity(origin, at)?;
    out.push(Event::GoldCollected {
        at,
        gold: player.gold,
    });
    out.push(Event::PlayerMoved {
        from: origin,
        to: at,
    });
    Ok(())
}

fn descend(
    world: &mut World,
    resolution: &MoveResolution,
    out: &mut Vec<Event>,
) -> Result<(), WorldError> {
    let mut player = player_at(&world.grid, resolution.origin)?;
    player.keys = player.keys.saturating_add(1);

    let floor = world.floor.saturating_add(1);
    let mut rng = floor_rng(world.seed, floor);
    let (grid, _) = generate_floor(&world.config, player, &mut rng)?;
    info!("key collected, descending to floor {floor}");

    world.floor = floor;
    world.grid = grid;
    out.push(Event::KeyCollected {
        at: resolution.destination,
        keys: player.keys,
    });
    out.push(Event::FloorGenerated {
        floor,
        rooms: world.grid.rooms().len(),
    });
    Ok(())
}

fn pursue(world: &mut World, out: &mut Vec<Event>) -> Result<(), WorldError> {
    if world.status != RunStatus::InProgress {
        return Ok(());
    }
    let Some(player) = registry::player_position(&world.grid) else {
        return Err(WorldError::PlayerMissing);
    };
    let enemies = registry::enemy_positions(&world.grid);

    let mut commands = std::mem::take(&mut world.pending);
    world.pursuit.handle(player, &enemies, &mut commands);
    let result = commands
        .drain(..)
        .try_for_each(|command| crate::apply(world, command, out));
    world.pending = commands;
    result
}

pub(crate) fn step_enemy(
    world: &mut World,
    from: Position,
    to: Position,
    out: &mut Vec<Event>,
) -> Result<(), WorldError> {
    if world.grid.tile_at(from)?.kind() != TileKind::Enemy {
        return Err(WorldError::NotAnEnemy { position: from });
    }
    let expected = registry::player_position(&world.grid).and_then(|player| next_step(from, player));
    if expected != Some(to) {
        return Err(WorldError::InvalidStep { from, to });
    }

    let blocked_by = world.grid.tile_at(to)?.kind();
    match blocked_by {
        TileKind::Player | TileKind::Enemy => {
            debug!("enemy at {from} held by {blocked_by:?} at {to}");
            out.push(Event::EnemyHeld {
                at: from,
                blocked_by,
            });
            return Ok(());
        }
        TileKind::Gold | TileKind::Key => {
            warn!("enemy at {from} trampled the {blocked_by:?} at {to}");
            out.push(Event::PickupDestroyed {
                at: to,
                kind: blocked_by,
            });
        }
        TileKind::Empty | TileKind::Fill => {}
    }

    world.grid.move_entity(from, to)?;
    debug!("enemy advanced from {from} to {to}");
    out.push(Event::EnemyAdvanced { from, to });
    Ok(())
}

fn player_at(grid: &Grid, position: Position) -> Result<PlayerStats, WorldError> {
    grid.tile_at(position)?
        .player_stats()
        .copied()
        .ok_or(WorldError::PlayerMissing)
}
