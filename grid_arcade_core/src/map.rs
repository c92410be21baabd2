use serde::{Deserialize, Serialize};

use crate::Position;

/// Represents errors that can occur within the grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Cell ({row}, {col}) is out of bounds for a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// A fixed-size 2D grid.
///
/// Stores elements of type `T` in a flat vector using row-major order.
/// The dimensions are set once at construction; there is no way to resize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a grid from rows that have already been checked to share one width.
    pub(crate) fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let cells: Vec<T> = rows.into_iter().flatten().collect();
        debug_assert_eq!(cells.len(), row_count * cols);
        Grid {
            rows: row_count,
            cols,
            cells,
        }
    }

    /// Returns the number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index_of(&self, position: Position) -> Option<usize> {
        if self.contains(position) {
            Some(position.row * self.cols + position.col)
        } else {
            None
        }
    }

    /// Checks if the given position is within the grid boundaries.
    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    fn out_of_bounds(&self, position: Position) -> GridError {
        GridError::OutOfBounds {
            row: position.row,
            col: position.col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Gets a reference to the cell at `position`, or `None` when out of bounds.
    pub fn get(&self, position: Position) -> Option<&T> {
        self.index_of(position).map(|index| &self.cells[index])
    }

    /// Sets the value of the cell at `position`.
    pub fn set(&mut self, position: Position, value: T) -> Result<(), GridError> {
        let index = self
            .index_of(position)
            .ok_or_else(|| self.out_of_bounds(position))?;
        self.cells[index] = value;
        Ok(())
    }

    /// Like [`Grid::get`], but reports the failing coordinates.
    pub fn try_get(&self, position: Position) -> Result<&T, GridError> {
        self.get(position).ok_or_else(|| self.out_of_bounds(position))
    }

    /// Returns an iterator over the cells of the grid in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Returns an iterator that yields `(Position, &T)` for each cell.
    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &T)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (Position::new(index / cols, index % cols), cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_is_row_major() {
        let grid = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        let cells: Vec<_> = grid.enumerate().map(|(p, v)| (p.row, p.col, *v)).collect();
        assert_eq!(cells[4], (1, 1, 5));
        assert_eq!(grid.get(Position::new(1, 2)), Some(&6));
        assert_eq!(grid.try_get(Position::new(0, 0)), Ok(&1));
    }

    #[test]
    fn set_out_of_bounds_reports_coordinates() {
        let mut grid = Grid::from_rows(vec![vec![0u8, 0], vec![0, 0]]);
        let err = grid.set(Position::new(2, 0), 1).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 2
            }
        );
        assert!(grid.get(Position::new(0, 2)).is_none());
    }
}
