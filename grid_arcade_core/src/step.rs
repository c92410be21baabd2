//! The movement step shared by both games.
//!
//! A step validates one move against the [`World`] and then fires the effect
//! of whatever tile the actor ends up on. Game-specific reactions (combat,
//! power-ups, dialogue flags) are left to the caller, keyed on the returned
//! [`TileEffect`].

use log::debug;

use crate::{
    Direction, Position,
    actor::Actor,
    world::{Collectible, Special, Tile, World},
};

/// What the tile under the actor did after a successful move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEffect {
    Nothing,
    /// The collectible was picked up and its cell cleared.
    Collected(Collectible),
    /// The actor walked onto a hostile. The caller opens combat.
    EnterCombat,
    /// Health was restored to the maximum.
    Rested,
    /// The actor stands on a dialogue marker.
    Dialogue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The target was a wall or outside the grid; nothing changed.
    Blocked,
    Moved(TileEffect),
}

/// Where a move from `from` would land, if that cell is walkable.
///
/// `None` as direction means staying put, which is always allowed.
pub fn target(world: &World, from: Position, direction: Option<Direction>) -> Option<Position> {
    let candidate = match direction {
        Some(direction) => from.offset(direction)?,
        None => from,
    };
    world.is_walkable(candidate).then_some(candidate)
}

/// Moves `actor` one cell and applies the landing tile's effect.
///
/// Invalid moves are a no-op, not an error.
pub fn step(world: &mut World, actor: &mut Actor, direction: Option<Direction>) -> StepOutcome {
    let Some(destination) = target(world, actor.position, direction) else {
        debug!("move {:?} from {:?} blocked", direction, actor.position);
        return StepOutcome::Blocked;
    };
    actor.position = destination;

    let tile = match world.tile_at(destination) {
        Ok(tile) => tile,
        // target() only returns in-bounds cells
        Err(_) => return StepOutcome::Moved(TileEffect::Nothing),
    };

    let effect = match tile {
        Tile::Empty | Tile::Wall => TileEffect::Nothing,
        Tile::Collectible(kind) => {
            if let Some(item) = kind.item() {
                actor.give(item);
            }
            if world.clear_tile(destination).is_err() {
                return StepOutcome::Moved(TileEffect::Nothing);
            }
            TileEffect::Collected(kind)
        }
        Tile::Special(Special::HostileSpawn) => TileEffect::EnterCombat,
        Tile::Special(Special::Rest) => {
            actor.restore();
            TileEffect::Rested
        }
        Tile::Special(Special::Dialogue) => TileEffect::Dialogue,
    };
    debug!("moved to {:?}: {:?}", destination, effect);
    StepOutcome::Moved(effect)
}
