use std::ops::RangeInclusive;

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Item, Position, actor::Actor, world::World};

/// Health a goblin starts every fight with.
pub const ADVERSARY_START_HEALTH: i32 = 40;
/// Damage the player deals per attack.
pub const PLAYER_DAMAGE: RangeInclusive<u32> = 5..=19;
/// Damage the goblin deals back per attack.
pub const ADVERSARY_DAMAGE: RangeInclusive<u32> = 3..=12;

/// The two damage values of one attack round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRolls {
    /// Dealt by the player to the adversary.
    pub player: u32,
    /// Dealt by the adversary to the player.
    pub adversary: u32,
}

impl DamageRolls {
    /// Draws both values independently from their ranges.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        DamageRolls {
            player: rng.random_range(PLAYER_DAMAGE),
            adversary: rng.random_range(ADVERSARY_DAMAGE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatState {
    #[default]
    Exploring,
    InCombat {
        adversary_health: i32,
        /// The hostile tile the fight started on; cleared on victory.
        at: Position,
    },
}

/// What happened during one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub rolls: DamageRolls,
    pub adversary_health: i32,
    pub player_health: u32,
    pub adversary_defeated: bool,
    pub player_died: bool,
}

impl CombatState {
    pub fn in_combat(&self) -> bool {
        matches!(self, CombatState::InCombat { .. })
    }

    pub fn adversary_health(&self) -> Option<i32> {
        match self {
            CombatState::InCombat {
                adversary_health, ..
            } => Some(*adversary_health),
            CombatState::Exploring => None,
        }
    }

    /// Starts a fight against the hostile at `at`.
    pub fn engage(&mut self, at: Position) {
        info!("combat started at {:?}", at);
        *self = CombatState::InCombat {
            adversary_health: ADVERSARY_START_HEALTH,
            at,
        };
    }

    /// Rolls damage from `rng` and resolves one round.
    pub fn attack<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        world: &mut World,
        player: &mut Actor,
    ) -> Option<RoundReport> {
        if !self.in_combat() {
            return None;
        }
        self.attack_with(DamageRolls::roll(rng), world, player)
    }

    /// Resolves one round with the given damage values.
    ///
    /// Both sides take damage in the same round, even when the player's hit
    /// is lethal. On victory the hostile tile is cleared and a
    /// [`Item::GoblinTooth`] is awarded. Returns `None` outside combat.
    pub fn attack_with(
        &mut self,
        rolls: DamageRolls,
        world: &mut World,
        player: &mut Actor,
    ) -> Option<RoundReport> {
        let CombatState::InCombat {
            adversary_health,
            at,
        } = self
        else {
            return None;
        };

        let dealt = i32::try_from(rolls.player).unwrap_or(i32::MAX);
        *adversary_health = adversary_health.saturating_sub(dealt);
        let player_health = player.take_damage(rolls.adversary);
        let remaining = *adversary_health;
        let at = *at;
        debug!(
            "attack: dealt {} (goblin at {}), took {} (player at {})",
            rolls.player, remaining, rolls.adversary, player_health
        );

        let adversary_defeated = remaining <= 0;
        if adversary_defeated {
            if let Err(err) = world.clear_tile(at) {
                warn!("could not clear defeated hostile: {err}");
            }
            player.give(Item::GoblinTooth);
            *self = CombatState::Exploring;
            info!("goblin at {:?} defeated", at);
        }

        Some(RoundReport {
            rolls,
            adversary_health: remaining,
            player_health,
            adversary_defeated,
            player_died: player.is_dead(),
        })
    }
}
