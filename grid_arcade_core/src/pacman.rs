//! Pac-Man: dots, power pellets and randomly wandering ghosts.

use std::{fmt, str::FromStr, time::Duration};

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Direction, Phase, Position,
    actor::{Actor, Ghost},
    layouts::{Layout, LayoutError, PACMAN_LAYOUT, parse_layout},
    step::{self, StepOutcome, TileEffect},
    world::{Collectible, Tile, World},
};

pub const STARTING_LIVES: u32 = 3;
/// Ticks a power pellet keeps ghosts edible.
pub const POWER_UP_TICKS: u32 = 20;

const EASY_SPAWNS: [Position; 1] = [Position::new(10, 10)];
const MEDIUM_SPAWNS: [Position; 2] = [Position::new(10, 10), Position::new(13, 1)];
const HARD_SPAWNS: [Position; 3] = [
    Position::new(10, 10),
    Position::new(13, 1),
    Position::new(1, 18),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown difficulty '{0}', expected easy, medium or hard")]
pub struct ParseDifficultyError(String);

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Where each ghost starts; the number of entries is the ghost count.
    pub fn ghost_spawns(&self) -> &'static [Position] {
        match self {
            Difficulty::Easy => &EASY_SPAWNS,
            Difficulty::Medium => &MEDIUM_SPAWNS,
            Difficulty::Hard => &HARD_SPAWNS,
        }
    }

    /// Time between ghost ticks.
    pub fn tick_interval(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(300),
            Difficulty::Medium => Duration::from_millis(200),
            Difficulty::Hard => Duration::from_millis(120),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Ghosts sent home while the player was powered up.
    pub ghosts_eaten: usize,
    pub lives_lost: u32,
    /// The power-up ran out on this tick.
    pub power_expired: bool,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct PacmanGame {
    pub world: World,
    /// `health` is the number of lives left.
    pub player: Actor,
    pub ghosts: Vec<Ghost>,
    start: Position,
    power_timer: u32,
    phase: Phase,
}

impl PacmanGame {
    /// Starts a session on the built-in maze.
    pub fn standard(difficulty: Difficulty) -> Result<Self, LayoutError> {
        Ok(Self::from_layout(parse_layout(PACMAN_LAYOUT)?, difficulty))
    }

    pub fn from_layout(layout: Layout, difficulty: Difficulty) -> Self {
        Self::with_ghost_spawns(layout, difficulty.ghost_spawns())
    }

    /// Ghosts spawning outside the grid or inside a wall are dropped.
    pub fn with_ghost_spawns(layout: Layout, spawns: &[Position]) -> Self {
        let ghosts = spawns
            .iter()
            .filter(|spawn| layout.world.is_walkable(**spawn))
            .map(|spawn| Ghost::new(*spawn))
            .collect();
        PacmanGame {
            player: Actor::new(layout.start, STARTING_LIVES),
            world: layout.world,
            ghosts,
            start: layout.start,
            power_timer: 0,
            phase: Phase::Playing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn lives(&self) -> u32 {
        self.player.health()
    }

    pub fn powered_up(&self) -> bool {
        self.power_timer > 0
    }

    pub fn power_timer(&self) -> u32 {
        self.power_timer
    }

    /// Number of collectibles still on the board.
    ///
    /// Chests on a custom map count too; the board is only cleared once
    /// every pickup is gone.
    pub fn pellets_left(&self) -> usize {
        self.world.remaining(|tile| matches!(tile, Tile::Collectible(_)))
    }

    pub fn is_cleared(&self) -> bool {
        self.pellets_left() == 0
    }

    /// Moves the player. Captures are only checked on ticks.
    ///
    /// Returns `None` once the session has ended.
    pub fn handle_move(&mut self, direction: Direction) -> Option<StepOutcome> {
        if self.phase.is_terminal() {
            return None;
        }
        let outcome = step::step(&mut self.world, &mut self.player, Some(direction));
        if outcome == StepOutcome::Moved(TileEffect::Collected(Collectible::PowerPellet)) {
            info!("power pellet eaten");
            self.power_timer = POWER_UP_TICKS;
        }
        Some(outcome)
    }

    /// Advances the ghosts one tick with directions drawn from `rng`.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TickReport> {
        let directions: Vec<Direction> = self
            .ghosts
            .iter()
            .map(|_| Direction::ALL[rng.random_range(0..Direction::ALL.len())])
            .collect();
        self.tick_with(&directions)
    }

    /// Advances the ghosts one tick, ghost `i` trying `directions[i]`.
    ///
    /// A ghost whose draw is blocked stays put for this tick. Ghosts without
    /// a direction also stay put. Returns `None` once the session has ended.
    pub fn tick_with(&mut self, directions: &[Direction]) -> Option<TickReport> {
        if self.phase.is_terminal() {
            return None;
        }
        let mut report = TickReport::default();

        for (ghost, direction) in self.ghosts.iter_mut().zip(directions) {
            if let Some(next) = step::target(&self.world, ghost.position, Some(*direction)) {
                ghost.position = next;
            }
        }
        debug!(
            "ghosts at {:?}",
            self.ghosts.iter().map(|g| g.position).collect::<Vec<_>>()
        );

        let powered = self.powered_up();
        for ghost in self.ghosts.iter_mut() {
            if ghost.position != self.player.position {
                continue;
            }
            if powered {
                ghost.respawn();
                report.ghosts_eaten += 1;
            } else {
                self.player.take_damage(1);
                self.player.position = self.start;
                report.lives_lost += 1;
                info!("caught by a ghost, {} lives left", self.player.health());
                if self.player.is_dead() {
                    self.phase = Phase::Lost;
                    report.phase = self.phase;
                    return Some(report);
                }
            }
        }

        if self.power_timer > 0 {
            self.power_timer -= 1;
            report.power_expired = self.power_timer == 0;
        }

        if self.is_cleared() {
            info!("board cleared");
            self.phase = Phase::Won;
        }
        report.phase = self.phase;
        Some(report)
    }
}
