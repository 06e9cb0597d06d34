//! Plain-text rendering of the dungeon and its events.

use std::fmt::Write as _;

use crawl_core::{Combatant, Event, RunStatus, TileKind};
use crawl_world::{query, World};

/// Glyph drawn for each tile kind.
pub(crate) const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => '.',
        TileKind::Fill => '#',
        TileKind::Enemy => 'E',
        TileKind::Key => 'k',
        TileKind::Gold => '$',
        TileKind::Player => '@',
    }
}

/// Draws the current floor followed by a one-line status summary.
pub(crate) fn render(world: &World) -> String {
    let mut out = String::new();
    for row in query::grid(world).rows() {
        out.extend(row.iter().map(|tile| glyph(tile.kind())));
        out.push('\n');
    }
    out.push_str(&status_line(world));
    out
}

fn status_line(world: &World) -> String {
    let status = match query::status(world) {
        RunStatus::InProgress => "in progress",
        RunStatus::Defeated => "defeated",
    };
    let mut line = format!("floor {}", query::floor(world));
    if let Some(stats) = query::player_stats(world) {
        let _ = write!(
            line,
            " | health {} | strength {} | gold {} | keys {}",
            stats.health, stats.strength, stats.gold, stats.keys
        );
    }
    let _ = write!(line, " | {status}");
    line
}

/// Human-readable summary of a world event.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::MoveBlocked { at, direction } => format!("blocked moving {direction:?} from {at}"),
        Event::PlayerMoved { from, to } => format!("moved {from} -> {to}"),
        Event::BattleResolved { at, outcome } => {
            let victor = match outcome.victor {
                Combatant::Player => "player",
                Combatant::Enemy => "enemy",
            };
            format!(
                "battle at {at}: {victor} wins after {} exchanges",
                outcome.exchanges
            )
        }
        Event::BattleWon { at, gold_dropped } => {
            format!("enemy at {at} dropped {gold_dropped} gold")
        }
        Event::PlayerDefeated { at } => format!("player fell at {at}"),
        Event::GoldCollected { at, gold } => format!("gold at {at}, now carrying {gold}"),
        Event::KeyCollected { at, keys } => format!("key at {at}, {keys} collected"),
        Event::FloorGenerated { floor, rooms } => {
            format!("descended to floor {floor} ({rooms} rooms)")
        }
        Event::EnemyAdvanced { from, to } => format!("enemy {from} -> {to}"),
        Event::EnemyHeld { at, blocked_by } => {
            format!("enemy at {at} held by {blocked_by:?}")
        }
        Event::PickupDestroyed { at, kind } => format!("enemy trampled {kind:?} at {at}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crawl_core::{GenerationConfig, Position};

    #[test]
    fn rendering_draws_one_line_per_row_plus_status() {
        let world = World::initialize(GenerationConfig::default(), 9, None).expect("valid");
        let text = render(&world);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 16);
        assert!(lines[..15].iter().all(|line| line.chars().count() == 72));
        assert_eq!(text.matches('@').count(), 1);
        assert_eq!(
            lines[15],
            "floor 0 | health 100 | strength 10 | gold 0 | keys 0 | in progress"
        );
    }

    #[test]
    fn events_read_naturally() {
        let event = Event::PlayerMoved {
            from: Position::new(1, 2),
            to: Position::new(2, 2),
        };
        assert_eq!(describe(&event), "moved (1, 2) -> (2, 2)");
    }
}
