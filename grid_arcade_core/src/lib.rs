use serde::{Deserialize, Serialize};

pub mod actor;
pub mod combat;
pub mod layouts;
pub mod map;
pub mod pacman;
pub mod rpg;
pub mod save;
pub mod step;
pub mod world;

/// A cell coordinate, addressed as (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Returns the neighbouring position in `direction`.
    ///
    /// Returns `None` when the neighbour would have a negative coordinate.
    /// The upper bound is not checked here; that is the grid's job.
    pub fn offset(self, direction: Direction) -> Option<Position> {
        let (d_row, d_col) = direction.delta();
        Some(Position {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

/// One of the four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The `(row, col)` delta of a single step in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Items that can end up in the player's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    HealingPotion,
    GoblinTooth,
    GoldCoin,
}

impl Item {
    pub fn name(&self) -> &'static str {
        match self {
            Item::HealingPotion => "Healing Potion",
            Item::GoblinTooth => "Goblin Tooth",
            Item::GoldCoin => "Gold Coin",
        }
    }
}

/// Whether a session is still running or has reached a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::Playing)
    }
}
