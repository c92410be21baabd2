use serde::{Deserialize, Serialize};

use crate::{
    Item, Position,
    map::{Grid, GridError},
};

/// Something the player picks up by walking onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collectible {
    Dot,
    PowerPellet,
    Chest,
}

impl Collectible {
    /// The inventory item granted on pickup, if any.
    pub fn item(&self) -> Option<Item> {
        match self {
            Collectible::Chest => Some(Item::HealingPotion),
            Collectible::Dot | Collectible::PowerPellet => None,
        }
    }
}

/// A tile that triggers an effect without being consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Special {
    /// A goblin waiting to be fought.
    HostileSpawn,
    /// A village where the player rests.
    Rest,
    /// The villager who hands out the quest.
    Dialogue,
}

/// The contents of one grid cell. Each cell holds exactly one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Collectible(Collectible),
    Special(Special),
}

/// The tile matrix a game is played on.
///
/// The shape never changes after construction. The only mutation is
/// [`World::clear_tile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    tiles: Grid<Tile>,
}

impl World {
    pub fn new(tiles: Grid<Tile>) -> Self {
        World { tiles }
    }

    pub fn rows(&self) -> usize {
        self.tiles.rows()
    }

    pub fn cols(&self) -> usize {
        self.tiles.cols()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.tiles.contains(position)
    }

    pub fn tile_at(&self, position: Position) -> Result<Tile, GridError> {
        self.tiles.try_get(position).copied()
    }

    /// In bounds and not a wall.
    pub fn is_walkable(&self, position: Position) -> bool {
        matches!(self.tiles.get(position), Some(tile) if *tile != Tile::Wall)
    }

    pub fn clear_tile(&mut self, position: Position) -> Result<(), GridError> {
        self.tiles.set(position, Tile::Empty)
    }

    /// Counts the tiles matching `predicate`.
    pub fn remaining<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Tile) -> bool,
    {
        self.tiles.iter().filter(|tile| predicate(tile)).count()
    }

    /// Finds every position holding `tile`.
    pub fn positions_of(&self, tile: Tile) -> Vec<Position> {
        self.tiles
            .enumerate()
            .filter_map(|(position, cell)| (*cell == tile).then_some(position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> World {
        World::new(Grid::from_rows(vec![
            vec![Tile::Empty, Tile::Wall],
            vec![Tile::Collectible(Collectible::Dot), Tile::Special(Special::Rest)],
        ]))
    }

    #[test]
    fn tile_at_rejects_out_of_bounds() {
        let world = small_world();
        assert_eq!(world.tile_at(Position::new(0, 1)), Ok(Tile::Wall));
        assert!(matches!(
            world.tile_at(Position::new(0, 2)),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn walkable_excludes_walls_and_outside() {
        let world = small_world();
        assert!(world.is_walkable(Position::new(0, 0)));
        assert!(!world.is_walkable(Position::new(0, 1)));
        assert!(world.is_walkable(Position::new(1, 1)));
        assert!(!world.is_walkable(Position::new(2, 0)));
    }

    #[test]
    fn clear_tile_empties_the_cell() {
        let mut world = small_world();
        let dot = Position::new(1, 0);
        assert_eq!(
            world.remaining(|t| matches!(t, Tile::Collectible(_))),
            1
        );
        world.clear_tile(dot).unwrap();
        assert_eq!(world.tile_at(dot), Ok(Tile::Empty));
        assert_eq!(
            world.remaining(|t| matches!(t, Tile::Collectible(_))),
            0
        );
        assert!(world.clear_tile(Position::new(5, 5)).is_err());
    }

    #[test]
    fn chest_grants_potion() {
        assert_eq!(Collectible::Chest.item(), Some(Item::HealingPotion));
        assert_eq!(Collectible::Dot.item(), None);
    }
}
