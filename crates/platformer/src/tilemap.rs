//! Tile map loading
//!
//! A map is a fixed-width grid of single-character cells:
//!
//! | char  | tile |
//! |-------|------|
//! | `#`   | solid block |
//! | `P`   | player spawn |
//! | `C`   | coin |
//! | space | empty |
//!
//! Row 0 is the top of the screen. Every row must have the same width as
//! the first; a trailing newline is ignored.

use std::path::{Path, PathBuf};

use platformer_engine::foundation::math::Vec2;
use thiserror::Error;

/// Map loading errors
#[derive(Error, Debug)]
pub enum MapError {
    /// A cell holds a character with no tile meaning
    #[error("Unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile {
        /// Zero-based row
        row: usize,
        /// Zero-based column
        col: usize,
        /// Offending character
        ch: char,
    },

    /// A row's width differs from the map width
    #[error("Row {row} has {found} columns, expected {expected}")]
    RowWidth {
        /// Zero-based row
        row: usize,
        /// Map width
        expected: usize,
        /// Width of this row
        found: usize,
    },

    /// The map has no cells
    #[error("Map is empty")]
    Empty,

    /// The map file could not be read
    #[error("Failed to read map {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// One map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Nothing
    Empty,
    /// Static solid block
    Block,
    /// Player spawn point
    Player,
    /// Collectible coin
    Coin,
}

impl Tile {
    /// Tile for a map character
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(Self::Empty),
            '#' => Some(Self::Block),
            'P' => Some(Self::Player),
            'C' => Some(Self::Coin),
            _ => None,
        }
    }
}

/// Parsed tile grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    columns: usize,
    tiles: Vec<Vec<Tile>>,
}

impl TileMap {
    /// Parse map text; the first row sets the width
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = text.lines().collect();
        let columns = rows.first().map_or(0, |row| row.chars().count());
        Self::from_rows(&rows, columns)
    }

    /// Build a map from rows that must each be `columns` wide
    pub fn from_rows<S: AsRef<str>>(rows: &[S], columns: usize) -> Result<Self, MapError> {
        if rows.is_empty() || columns == 0 {
            return Err(MapError::Empty);
        }

        let tiles = rows
            .iter()
            .enumerate()
            .map(|(row, line)| parse_row(row, line.as_ref(), columns))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, tiles })
    }

    /// Read and parse a map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::parse(&text)?;
        log::info!("Loaded {}x{} map from {}", map.columns, map.rows(), path.display());
        Ok(map)
    }

    /// Map width in tiles
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Map height in tiles
    pub fn rows(&self) -> usize {
        self.tiles.len()
    }

    /// Tile at (col, row), row 0 at the top
    pub fn get(&self, col: usize, row: usize) -> Option<Tile> {
        self.tiles.get(row)?.get(col).copied()
    }

    /// Every non-empty tile as (col, row, tile)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .filter(|(_, tile)| **tile != Tile::Empty)
                .map(move |(col, tile)| (col, row, *tile))
        })
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().flatten().filter(|t| **t == tile).count()
    }

    /// World-space centre of a cell; the bottom row sits on y = 0
    pub fn tile_center(&self, col: usize, row: usize, tile_size: f32) -> Vec2 {
        let flipped_row = self.rows() - 1 - row;
        Vec2::new(
            (col as f32).mul_add(tile_size, tile_size / 2.0),
            (flipped_row as f32).mul_add(tile_size, tile_size / 2.0),
        )
    }
}

fn parse_row(row: usize, line: &str, columns: usize) -> Result<Vec<Tile>, MapError> {
    let found = line.chars().count();
    if found != columns {
        return Err(MapError::RowWidth {
            row,
            expected: columns,
            found,
        });
    }

    line.chars()
        .enumerate()
        .map(|(col, ch)| Tile::from_char(ch).ok_or(MapError::UnknownTile { row, col, ch }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_small_map_counts() {
        let map = TileMap::from_rows(&["###", " P ", "###"], 3).unwrap();

        assert_eq!(map.count(Tile::Block), 6);
        assert_eq!(map.count(Tile::Player), 1);
        assert_eq!(map.count(Tile::Coin), 0);
        assert_eq!(map.occupied().count(), 7);
    }

    #[test]
    fn test_parse_ignores_trailing_newline() {
        let map = TileMap::parse("C #\n###\n").unwrap();

        assert_eq!(map.columns(), 3);
        assert_eq!(map.rows(), 2);
        assert_eq!(map.get(0, 0), Some(Tile::Coin));
        assert_eq!(map.get(1, 0), Some(Tile::Empty));
        assert_eq!(map.get(3, 0), None);
    }

    #[test]
    fn test_unknown_tile_names_position() {
        let err = TileMap::parse("###\n#x#\n").unwrap_err();
        assert!(matches!(err, MapError::UnknownTile { row: 1, col: 1, ch: 'x' }));
        assert_eq!(err.to_string(), "Unknown tile 'x' at row 1, column 1");
    }

    #[test]
    fn test_row_width_mismatch() {
        let err = TileMap::parse("###\n##\n").unwrap_err();
        assert!(matches!(
            err,
            MapError::RowWidth {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_empty_map() {
        assert!(matches!(TileMap::parse(""), Err(MapError::Empty)));
        assert!(matches!(TileMap::parse("\n"), Err(MapError::Empty)));
    }

    #[test]
    fn test_tile_center_flips_rows() {
        let map = TileMap::from_rows(&["P  ", "###"], 3).unwrap();

        let player = map.tile_center(0, 0, 16.0);
        assert_relative_eq!(player, Vec2::new(8.0, 24.0));

        let corner = map.tile_center(2, 1, 16.0);
        assert_relative_eq!(corner, Vec2::new(40.0, 8.0));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TileMap::load("no/such/level.txt"),
            Err(MapError::Io { .. })
        ));
    }

    #[test]
    fn test_shipped_level_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/level1.txt");
        let map = TileMap::load(path).unwrap();
        assert_eq!(map.count(Tile::Player), 1);
        assert!(map.count(Tile::Coin) > 0);
    }
}
