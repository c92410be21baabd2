//! The medieval RPG: exploration, looting, goblin fights and the villager's quest.

use std::path::Path;

use log::info;
use rand::Rng;

use crate::{
    Direction, Item, Phase,
    actor::Actor,
    combat::{CombatState, DamageRolls, RoundReport},
    layouts::{Layout, LayoutError, RPG_LAYOUT, parse_layout},
    save::{SaveError, SaveRecord},
    step::{StepOutcome, TileEffect, step},
    world::World,
};

pub const MAX_HEALTH: u32 = 100;
/// Goblins the villager wants dead before paying out.
pub const QUEST_GOAL: u32 = 2;

/// A discrete player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    /// Re-inspect the current tile without moving.
    Stay,
    Interact,
    Attack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestState {
    pub accepted: bool,
    pub goblins_defeated: u32,
}

/// The villager's reply when the player talks to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialogue {
    QuestOffered,
    QuestInProgress,
    QuestCompleted,
}

impl Dialogue {
    pub fn line(&self) -> &'static str {
        match self {
            Dialogue::QuestOffered => "Villager: Brave one, defeat 2 goblins to earn a reward!",
            Dialogue::QuestInProgress => "Villager: You're still on your quest. Keep going!",
            Dialogue::QuestCompleted => "Villager: You did it! Here's your reward: Gold Coin!",
        }
    }
}

/// The result of handling one [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpgEvent {
    /// The command does not apply in the current state.
    Ignored,
    Blocked,
    Moved(TileEffect),
    Talked(Dialogue),
    Attacked(RoundReport),
}

#[derive(Debug, Clone)]
pub struct RpgGame {
    pub world: World,
    pub player: Actor,
    pub combat: CombatState,
    pub quest: QuestState,
    npc_nearby: bool,
    phase: Phase,
}

impl RpgGame {
    /// Starts a session on the built-in map.
    pub fn standard() -> Result<Self, LayoutError> {
        Ok(Self::from_layout(parse_layout(RPG_LAYOUT)?))
    }

    pub fn from_layout(layout: Layout) -> Self {
        RpgGame {
            world: layout.world,
            player: Actor::new(layout.start, MAX_HEALTH),
            combat: CombatState::Exploring,
            quest: QuestState::default(),
            npc_nearby: false,
            phase: Phase::Playing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the player is standing on the villager's tile.
    ///
    /// Every movement command clears the flag first, a blocked one included,
    /// so bumping a tree while on the villager drops it until the player
    /// waits (`Command::Stay`) or steps back onto the tile.
    pub fn npc_nearby(&self) -> bool {
        self.npc_nearby
    }

    /// Handles one command, drawing combat damage from `rng`.
    pub fn handle<R: Rng + ?Sized>(&mut self, command: Command, rng: &mut R) -> RpgEvent {
        if command == Command::Attack && self.combat.in_combat() {
            let rolls = DamageRolls::roll(rng);
            return self.attack_with(rolls);
        }
        self.handle_without_attack(command)
    }

    fn handle_without_attack(&mut self, command: Command) -> RpgEvent {
        if self.phase.is_terminal() {
            return RpgEvent::Ignored;
        }
        match command {
            Command::Interact if self.npc_nearby => {
                self.talk().map_or(RpgEvent::Ignored, RpgEvent::Talked)
            }
            Command::Interact | Command::Attack => RpgEvent::Ignored,
            Command::Move(_) | Command::Stay if self.combat.in_combat() => RpgEvent::Ignored,
            Command::Move(direction) => self.walk(Some(direction)),
            Command::Stay => self.walk(None),
        }
    }

    fn walk(&mut self, direction: Option<Direction>) -> RpgEvent {
        self.npc_nearby = false;
        match step(&mut self.world, &mut self.player, direction) {
            StepOutcome::Blocked => RpgEvent::Blocked,
            StepOutcome::Moved(effect) => {
                match effect {
                    TileEffect::EnterCombat => self.combat.engage(self.player.position),
                    TileEffect::Dialogue => self.npc_nearby = true,
                    TileEffect::Rested => info!("rested at the village"),
                    TileEffect::Collected(kind) => info!("picked up {:?}", kind),
                    TileEffect::Nothing => {}
                }
                RpgEvent::Moved(effect)
            }
        }
    }

    /// Resolves one attack with fixed damage values.
    pub fn attack_with(&mut self, rolls: DamageRolls) -> RpgEvent {
        if self.phase.is_terminal() {
            return RpgEvent::Ignored;
        }
        let Some(report) = self
            .combat
            .attack_with(rolls, &mut self.world, &mut self.player)
        else {
            return RpgEvent::Ignored;
        };
        if report.adversary_defeated {
            self.quest.goblins_defeated += 1;
        }
        if report.player_died {
            info!("player died in combat");
            self.phase = Phase::Lost;
        }
        RpgEvent::Attacked(report)
    }

    /// Talks to the villager, advancing the quest. `None` when nobody is near.
    pub fn talk(&mut self) -> Option<Dialogue> {
        if !self.npc_nearby || self.phase.is_terminal() {
            return None;
        }
        let reply = if !self.quest.accepted {
            self.quest.accepted = true;
            Dialogue::QuestOffered
        } else if self.quest.goblins_defeated >= QUEST_GOAL {
            self.player.give(Item::GoldCoin);
            self.quest = QuestState::default();
            Dialogue::QuestCompleted
        } else {
            Dialogue::QuestInProgress
        };
        info!("villager: {:?}", reply);
        Some(reply)
    }

    pub fn to_save_record(&self) -> SaveRecord {
        SaveRecord {
            position: self.player.position,
            health: self.player.health(),
            inventory: self.player.inventory.clone(),
            quest_accepted: self.quest.accepted,
            goblins_defeated: self.quest.goblins_defeated,
        }
    }

    /// Replaces the persisted fields with `record`.
    ///
    /// The record is checked before anything is touched, so a rejected
    /// record leaves the session as it was. A record with zero health is
    /// rejected, since a dead player cannot resume.
    pub fn apply_save_record(&mut self, record: SaveRecord) -> Result<(), SaveError> {
        if !self.world.is_walkable(record.position) {
            return Err(SaveError::InvalidPosition(record.position));
        }
        if record.health == 0 {
            return Err(SaveError::DeadPlayer);
        }
        self.player.position = record.position;
        self.player.set_health(record.health);
        self.player.inventory = record.inventory;
        self.quest = QuestState {
            accepted: record.quest_accepted,
            goblins_defeated: record.goblins_defeated,
        };
        self.combat = CombatState::Exploring;
        self.npc_nearby = false;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), SaveError> {
        self.to_save_record().write_to(path)?;
        info!("game saved to {}", path.display());
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> Result<(), SaveError> {
        let record = SaveRecord::read_from(path)?;
        self.apply_save_record(record)?;
        info!("game loaded from {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{
        Position,
        combat::ADVERSARY_START_HEALTH,
        world::{Collectible, Tile},
    };

    fn game() -> RpgGame {
        RpgGame::standard().unwrap()
    }

    fn walk(game: &mut RpgGame, direction: Direction, times: usize) {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..times {
            game.handle(Command::Move(direction), &mut rng);
        }
    }

    #[test]
    fn walking_onto_goblin_starts_combat() {
        let mut game = game();
        assert_eq!(game.player.position, Position::new(1, 1));
        walk(&mut game, Direction::Down, 4);
        walk(&mut game, Direction::Right, 4);

        assert_eq!(game.player.position, Position::new(5, 5));
        assert!(game.combat.in_combat());
        assert_eq!(game.combat.adversary_health(), Some(ADVERSARY_START_HEALTH));

        let event = game.attack_with(DamageRolls {
            player: 10,
            adversary: 5,
        });
        assert!(matches!(event, RpgEvent::Attacked(_)));
        assert_eq!(game.combat.adversary_health(), Some(30));
        assert_eq!(game.player.health(), 95);
        assert!(game.combat.in_combat());
    }

    #[test]
    fn movement_is_ignored_during_combat() {
        let mut game = game();
        game.combat.engage(game.player.position);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            game.handle(Command::Move(Direction::Right), &mut rng),
            RpgEvent::Ignored
        );
        assert_eq!(game.player.position, Position::new(1, 1));
    }

    #[test]
    fn attack_outside_combat_is_ignored() {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(game.handle(Command::Attack, &mut rng), RpgEvent::Ignored);
        assert_eq!(game.player.health(), MAX_HEALTH);
    }

    #[test]
    fn winning_a_fight_counts_toward_the_quest() {
        let mut game = game();
        walk(&mut game, Direction::Down, 4);
        walk(&mut game, Direction::Right, 4);
        let rolls = DamageRolls {
            player: 19,
            adversary: 3,
        };
        for _ in 0..3 {
            game.attack_with(rolls);
        }
        assert!(!game.combat.in_combat());
        assert_eq!(game.quest.goblins_defeated, 1);
        assert_eq!(game.player.inventory, vec![Item::GoblinTooth]);
        assert_eq!(game.world.tile_at(Position::new(5, 5)), Ok(Tile::Empty));

        // walking back over the cleared cell does not restart combat
        walk(&mut game, Direction::Left, 1);
        walk(&mut game, Direction::Right, 1);
        assert!(!game.combat.in_combat());
    }

    #[test]
    fn dying_ends_the_session() {
        let mut game = game();
        walk(&mut game, Direction::Down, 4);
        walk(&mut game, Direction::Right, 4);
        game.player.set_health(10);
        let event = game.attack_with(DamageRolls {
            player: 5,
            adversary: 12,
        });
        assert!(matches!(event, RpgEvent::Attacked(report) if report.player_died));
        assert_eq!(game.phase(), Phase::Lost);
        assert_eq!(
            game.attack_with(DamageRolls {
                player: 5,
                adversary: 5
            }),
            RpgEvent::Ignored
        );
    }

    #[test]
    fn villager_quest_cycle() {
        let mut game = game();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(game.handle(Command::Interact, &mut rng), RpgEvent::Ignored);

        walk(&mut game, Direction::Down, 5);
        walk(&mut game, Direction::Right, 1);
        assert_eq!(game.player.position, Position::new(6, 2));
        assert!(game.npc_nearby());

        assert_eq!(
            game.handle(Command::Interact, &mut rng),
            RpgEvent::Talked(Dialogue::QuestOffered)
        );
        assert!(game.quest.accepted);
        assert_eq!(game.talk(), Some(Dialogue::QuestInProgress));

        game.quest.goblins_defeated = QUEST_GOAL;
        assert_eq!(game.talk(), Some(Dialogue::QuestCompleted));
        assert_eq!(game.player.inventory, vec![Item::GoldCoin]);
        assert_eq!(game.quest, QuestState::default());
    }

    #[test]
    fn nearby_flag_resets_on_every_step() {
        let mut game = game();
        walk(&mut game, Direction::Down, 5);
        walk(&mut game, Direction::Right, 1);
        assert!(game.npc_nearby());

        walk(&mut game, Direction::Right, 1);
        assert!(!game.npc_nearby());

        walk(&mut game, Direction::Left, 1);
        assert!(game.npc_nearby());
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(
            game.handle(Command::Stay, &mut rng),
            RpgEvent::Moved(TileEffect::Dialogue)
        );
        assert!(game.npc_nearby());
    }

    #[test]
    fn chest_gives_a_potion_once() {
        let mut game = game();
        walk(&mut game, Direction::Down, 9);
        assert_eq!(game.player.position, Position::new(10, 1));
        assert_eq!(game.player.inventory, vec![Item::HealingPotion]);
        assert_eq!(
            game.world.remaining(|t| *t == Tile::Collectible(Collectible::Chest)),
            0
        );
        walk(&mut game, Direction::Up, 1);
        walk(&mut game, Direction::Down, 1);
        assert_eq!(game.player.inventory, vec![Item::HealingPotion]);
    }

    #[test]
    fn save_then_load_restores_persisted_fields() {
        let path = std::env::temp_dir().join(format!("grid_arcade_rpg_{}.json", std::process::id()));
        let mut game = game();
        walk(&mut game, Direction::Down, 9);
        game.player.take_damage(25);
        game.quest.accepted = true;
        game.quest.goblins_defeated = 1;
        game.save(&path).unwrap();

        let mut fresh = RpgGame::standard().unwrap();
        fresh.load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(fresh.to_save_record(), game.to_save_record());
        assert_eq!(fresh.player.health(), 75);
    }

    #[test]
    fn rejected_record_leaves_state_alone() {
        let mut game = game();
        let before = game.to_save_record();
        let bad = SaveRecord {
            position: Position::new(2, 2),
            health: 1,
            inventory: vec![Item::GoldCoin],
            quest_accepted: true,
            goblins_defeated: 9,
        };
        assert!(matches!(
            game.apply_save_record(bad),
            Err(SaveError::InvalidPosition(_))
        ));
        let missing = std::env::temp_dir().join("grid_arcade_never_written.json");
        assert!(game.load(&missing).is_err());
        assert_eq!(game.to_save_record(), before);
    }

    #[test]
    fn dead_player_record_is_rejected() {
        let mut game = game();
        let before = game.to_save_record();
        let dead = SaveRecord {
            health: 0,
            ..before.clone()
        };
        assert!(matches!(
            game.apply_save_record(dead),
            Err(SaveError::DeadPlayer)
        ));
        assert_eq!(game.to_save_record(), before);
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn blocked_move_on_villager_clears_nearby() {
        let layout = parse_layout("N#\nP.").unwrap();
        let mut game = RpgGame::from_layout(layout);
        walk(&mut game, Direction::Up, 1);
        assert_eq!(game.player.position, Position::new(0, 0));
        assert!(game.npc_nearby());

        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            game.handle(Command::Move(Direction::Right), &mut rng),
            RpgEvent::Blocked
        );
        assert_eq!(game.player.position, Position::new(0, 0));
        assert!(!game.npc_nearby());
        assert_eq!(game.handle(Command::Interact, &mut rng), RpgEvent::Ignored);

        game.handle(Command::Stay, &mut rng);
        assert!(game.npc_nearby());
    }
}
