//! Text layouts for the built-in maps, and the parser that turns them into a [`World`].
//!
//! One character per cell:
//!
//! | char | tile                      |
//! |------|---------------------------|
//! | `.`  | empty                     |
//! | `#`  | wall (or tree)            |
//! | `o`  | dot                       |
//! | `O`  | power pellet              |
//! | `C`  | chest                     |
//! | `G`  | goblin                    |
//! | `V`  | village                   |
//! | `N`  | villager                  |
//! | `P`  | player start (empty cell) |

use crate::{
    Position,
    map::Grid,
    world::{Collectible, Special, Tile, World},
};

pub const RPG_LAYOUT: &str = "
................
.P............V.
..#.............
....#...........
................
.....G..........
..N.............
................
..........G.....
................
.C..............
................
";

pub const PACMAN_LAYOUT: &str = "
####################
#PooooooooooooooooO#
#oooooooooooooooooo#
#oooooooooooooooooo#
#oooooooooooooooooo#
#oooo###ooooooooooo#
#oooooo#ooooooooooo#
#oooooo#ooooooooooo#
#oooooooooooooooooo#
#oooooooooooooooooo#
#oooooooooOoooooooo#
#oooooooooooooooooo#
#oooooooooooooooooo#
#oooooooooooooooooo#
####################
";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Layout is empty")]
    Empty,
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unknown tile code '{code}' at ({row}, {col})")]
    UnknownCode { code: char, row: usize, col: usize },
    #[error("No player start ('P') found in layout")]
    MissingStart,
    #[error("Multiple player starts ('P') found, second at ({row}, {col})")]
    DuplicateStart { row: usize, col: usize },
}

/// A parsed map together with where the player begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub world: World,
    pub start: Position,
}

fn tile_for(code: char) -> Option<Tile> {
    let tile = match code {
        '.' | 'P' => Tile::Empty,
        '#' => Tile::Wall,
        'o' => Tile::Collectible(Collectible::Dot),
        'O' => Tile::Collectible(Collectible::PowerPellet),
        'C' => Tile::Collectible(Collectible::Chest),
        'G' => Tile::Special(Special::HostileSpawn),
        'V' => Tile::Special(Special::Rest),
        'N' => Tile::Special(Special::Dialogue),
        _ => return None,
    };
    Some(tile)
}

/// Parses a layout string. Blank lines and surrounding whitespace are ignored.
pub fn parse_layout(text: &str) -> Result<Layout, LayoutError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let width = match lines.first() {
        Some(first) => first.chars().count(),
        None => return Err(LayoutError::Empty),
    };

    let mut start = None;
    let mut rows = Vec::with_capacity(lines.len());
    for (row, line) in lines.iter().enumerate() {
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }
        let mut cells = Vec::with_capacity(width);
        for (col, code) in line.chars().enumerate() {
            if code == 'P' {
                if start.is_some() {
                    return Err(LayoutError::DuplicateStart { row, col });
                }
                start = Some(Position::new(row, col));
            }
            cells.push(tile_for(code).ok_or(LayoutError::UnknownCode { code, row, col })?);
        }
        rows.push(cells);
    }

    let start = start.ok_or(LayoutError::MissingStart)?;
    Ok(Layout {
        world: World::new(Grid::from_rows(rows)),
        start,
    })
}
