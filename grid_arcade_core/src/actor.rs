use serde::{Deserialize, Serialize};

use crate::{Item, Position};

/// Holds the state of the player-controlled actor.
///
/// `health` doubles as the life counter in Pac-Man. It never exceeds
/// `max_health` and never drops below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub position: Position,
    health: u32,
    max_health: u32,
    pub inventory: Vec<Item>,
}

impl Actor {
    pub fn new(position: Position, max_health: u32) -> Self {
        Actor {
            position,
            health: max_health,
            max_health,
            inventory: Vec::new(),
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Sets health, clamped to `max_health`.
    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }

    pub fn restore(&mut self) {
        self.health = self.max_health;
    }

    /// Removes `amount` health, saturating at zero. Returns the health left.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub fn give(&mut self, item: Item) {
        self.inventory.push(item);
    }

    pub fn count_of(&self, item: Item) -> usize {
        self.inventory.iter().filter(|held| **held == item).count()
    }
}

/// A ghost. Only its position changes during play; `spawn` is where it is
/// sent back to when eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
    pub position: Position,
    pub spawn: Position,
}

impl Ghost {
    pub fn new(spawn: Position) -> Self {
        Ghost {
            position: spawn,
            spawn,
        }
    }

    pub fn respawn(&mut self) {
        self.position = self.spawn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_stays_within_bounds() {
        let mut actor = Actor::new(Position::new(0, 0), 100);
        assert_eq!(actor.take_damage(30), 70);
        actor.set_health(250);
        assert_eq!(actor.health(), 100);
        assert_eq!(actor.take_damage(120), 0);
        assert!(actor.is_dead());
        actor.restore();
        assert_eq!(actor.health(), 100);
    }

    #[test]
    fn inventory_keeps_pickup_order() {
        let mut actor = Actor::new(Position::new(0, 0), 1);
        actor.give(Item::GoblinTooth);
        actor.give(Item::HealingPotion);
        actor.give(Item::GoblinTooth);
        assert_eq!(
            actor.inventory,
            vec![Item::GoblinTooth, Item::HealingPotion, Item::GoblinTooth]
        );
        assert_eq!(actor.count_of(Item::GoblinTooth), 2);
    }

    #[test]
    fn ghost_respawns_at_spawn() {
        let mut ghost = Ghost::new(Position::new(3, 4));
        ghost.position = Position::new(7, 7);
        ghost.respawn();
        assert_eq!(ghost.position, Position::new(3, 4));
    }
}
