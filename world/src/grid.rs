//! Static tile map shared by both agents.

use std::collections::BTreeSet;

use labyrinth_core::{GridView, Position, TileType};

use crate::GridError;

/// Immutable tile map with its traversal rules.
///
/// Tiles are stored densely in row-major order. The grid is built once at
/// startup and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<TileType>,
    width: u32,
    height: u32,
    free_tiles: BTreeSet<TileType>,
    finish_tile: TileType,
}

impl Grid {
    /// Builds a grid from explicit rows of tile codes.
    ///
    /// Every row must match the width of the first row.
    pub fn new<I>(
        rows: Vec<Vec<TileType>>,
        free_tiles: I,
        finish_tile: TileType,
    ) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = TileType>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(GridError::Ragged {
                row,
                expected: width,
                found,
            });
        }

        // Positions are signed, so both dimensions must fit an i32.
        let fits = i32::try_from(width).is_ok()
            && i32::try_from(height).is_ok()
            && width.checked_mul(height).is_some();
        let (Ok(columns), Ok(lines), true) = (u32::try_from(width), u32::try_from(height), fits)
        else {
            return Err(GridError::TooLarge { width, height });
        };

        Ok(Self {
            tiles: rows.into_iter().flatten().collect(),
            width: columns,
            height: lines,
            free_tiles: free_tiles.into_iter().collect(),
            finish_tile,
        })
    }

    /// Parses a grid from whitespace-separated tile codes, one row per line.
    ///
    /// Trailing blank lines are ignored; any other blank line is a zero-width
    /// row and is rejected as ragged.
    pub fn from_text<I>(
        text: &str,
        free_tiles: I,
        finish_tile: TileType,
    ) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = TileType>,
    {
        let mut rows = Vec::new();
        for (line_index, line) in text.trim_end().lines().enumerate() {
            let row = line
                .split_whitespace()
                .enumerate()
                .map(|(token_index, token)| {
                    token
                        .parse::<u32>()
                        .map(TileType::new)
                        .map_err(|_| GridError::InvalidToken {
                            line: line_index + 1,
                            column: token_index + 1,
                            token: token.to_owned(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }

        Self::new(rows, free_tiles, finish_tile)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the position lies within the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Returns the tile at the provided position.
    pub fn tile_at(&self, position: Position) -> Result<TileType, GridError> {
        self.index(position)
            .and_then(|index| self.tiles.get(index).copied())
            .ok_or(GridError::OutOfBounds { position })
    }

    /// Reports whether an agent may occupy the position.
    ///
    /// Out-of-bounds positions are never free.
    #[must_use]
    pub fn is_free(&self, position: Position) -> bool {
        self.tile_at(position)
            .is_ok_and(|tile| self.free_tiles.contains(&tile))
    }

    /// Reports whether the position holds the finish tile.
    #[must_use]
    pub fn is_finish(&self, position: Position) -> bool {
        debug_assert!(
            self.contains(position),
            "finish check outside the grid at {position:?}"
        );
        self.tile_at(position)
            .is_ok_and(|tile| tile == self.finish_tile)
    }

    /// Captures a read-only view of the tiles for presentation.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.tiles, self.width, self.height)
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    pub(crate) fn index(&self, position: Position) -> Option<usize> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    pub(crate) fn position_of(&self, index: usize) -> Position {
        let width = usize::try_from(self.width).unwrap_or(1).max(1);
        let x = i32::try_from(index % width).unwrap_or(i32::MAX);
        let y = i32::try_from(index / width).unwrap_or(i32::MAX);
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(rows: &[&[u32]]) -> Vec<Vec<TileType>> {
        rows.iter()
            .map(|row| row.iter().copied().map(TileType::new).collect())
            .collect()
    }

    fn sample() -> Grid {
        Grid::new(
            tiles(&[&[0, 1, 2], &[0, 0, 1]]),
            [TileType::new(0), TileType::new(2)],
            TileType::new(2),
        )
        .expect("rectangular grid")
    }

    #[test]
    fn tile_at_rejects_out_of_bounds() {
        let grid = sample();
        assert_eq!(grid.tile_at(Position::new(1, 0)), Ok(TileType::new(1)));
        assert_eq!(
            grid.tile_at(Position::new(3, 0)),
            Err(GridError::OutOfBounds {
                position: Position::new(3, 0)
            })
        );
        assert!(grid.tile_at(Position::new(0, -1)).is_err());
    }

    #[test]
    fn is_free_treats_out_of_bounds_as_blocked() {
        let grid = sample();
        assert!(grid.is_free(Position::new(0, 0)));
        assert!(grid.is_free(Position::new(2, 0)));
        assert!(!grid.is_free(Position::new(1, 0)));
        assert!(!grid.is_free(Position::new(-1, 0)));
        assert!(!grid.is_free(Position::new(0, 2)));
    }

    #[test]
    fn is_finish_matches_finish_tile() {
        let grid = sample();
        assert!(grid.is_finish(Position::new(2, 0)));
        assert!(!grid.is_finish(Position::new(0, 0)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = Grid::new(tiles(&[&[0, 0], &[0]]), [TileType::new(0)], TileType::new(2))
            .expect_err("ragged grid");
        assert_eq!(
            error,
            GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn from_text_parses_rows_and_ignores_trailing_blank_lines() {
        let grid = Grid::from_text("0 1 2\n0  0 1\n\n", [TileType::new(0)], TileType::new(2))
            .expect("valid source");
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.tile_at(Position::new(2, 1)), Ok(TileType::new(1)));
    }

    #[test]
    fn from_text_reports_invalid_tokens() {
        let error = Grid::from_text("0 0\n0 x\n", [TileType::new(0)], TileType::new(2))
            .expect_err("non-integer token");
        assert_eq!(
            error,
            GridError::InvalidToken {
                line: 2,
                column: 2,
                token: "x".to_owned()
            }
        );

        assert!(Grid::from_text("0 -1\n", [TileType::new(0)], TileType::new(2)).is_err());
    }

    #[test]
    fn from_text_rejects_interior_blank_lines() {
        let error = Grid::from_text("0 0\n\n0 0\n", [TileType::new(0)], TileType::new(2))
            .expect_err("blank interior row");
        assert!(matches!(error, GridError::Ragged { row: 1, .. }));
    }

    #[test]
    fn empty_source_yields_empty_grid() {
        let grid = Grid::from_text("", [TileType::new(0)], TileType::new(2)).expect("empty grid");
        assert_eq!((grid.width(), grid.height()), (0, 0));
        assert!(!grid.is_free(Position::new(0, 0)));
    }

    #[test]
    fn index_and_position_are_inverse() {
        let grid = sample();
        let position = Position::new(1, 1);
        let index = grid.index(position).expect("in bounds");
        assert_eq!(index, 4);
        assert_eq!(grid.position_of(index), position);
        assert_eq!(grid.cell_count(), 6);
    }
}
