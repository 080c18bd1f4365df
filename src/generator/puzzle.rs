//! Sliding-tile boards.
//!
//! A board of edge `N` holds tiles `1..N²` and one blank (stored as `0`).
//! Shuffles are drawn with Fisher–Yates and rejected until the result is
//! solvable and not already solved.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::error::GeneratorError;

use super::StimulusGenerator;

/// Largest supported edge length; tiles are stored as `u16`.
const MAX_SIZE: usize = 255;

/// A sliding-tile board in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    size: usize,
    tiles: Vec<u16>,
}

impl Board {
    /// The solved board: `1..N²-1` followed by the blank.
    #[must_use]
    pub fn solved(size: usize) -> Self {
        let cells = size * size;
        let mut tiles: Vec<u16> = (1..cells)
            .map(|t| u16::try_from(t).unwrap_or(u16::MAX))
            .collect();
        tiles.push(0);
        Self { size, tiles }
    }

    /// Builds a board from explicit tiles.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] unless `tiles` is a
    /// permutation of `0..size²`.
    pub fn from_tiles(size: usize, tiles: Vec<u16>) -> Result<Self, GeneratorError> {
        if !(2..=MAX_SIZE).contains(&size) || tiles.len() != size * size {
            return Err(GeneratorError::InvalidParameters(format!(
                "expected {0}x{0} tiles, got {1}",
                size,
                tiles.len()
            )));
        }
        let mut seen = vec![false; tiles.len()];
        for &tile in &tiles {
            let slot = seen.get_mut(usize::from(tile)).ok_or_else(|| {
                GeneratorError::InvalidParameters(format!("tile {tile} out of range"))
            })?;
            if *slot {
                return Err(GeneratorError::InvalidParameters(format!(
                    "tile {tile} appears twice"
                )));
            }
            *slot = true;
        }
        Ok(Self { size, tiles })
    }

    /// Edge length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Tiles in row-major order, `0` for the blank.
    #[must_use]
    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    /// Index of the blank cell.
    #[must_use]
    pub fn blank_index(&self) -> usize {
        self.tiles.iter().position(|&t| t == 0).unwrap_or(0)
    }

    /// Whether every tile is in its home position.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let last = self.tiles.len() - 1;
        self.tiles[last] == 0
            && self.tiles[..last]
                .iter()
                .enumerate()
                .all(|(i, &t)| usize::from(t) == i + 1)
    }

    /// Number of tile pairs out of order, ignoring the blank.
    #[must_use]
    pub fn inversions(&self) -> usize {
        let tiles: Vec<u16> = self.tiles.iter().copied().filter(|&t| t != 0).collect();
        let mut count = 0;
        for (i, a) in tiles.iter().enumerate() {
            count += tiles[i + 1..].iter().filter(|b| *b < a).count();
        }
        count
    }

    /// Whether the board can reach the solved state by sliding.
    ///
    /// Odd edge: inversions must be even. Even edge: inversions plus the
    /// blank's row counted from the bottom (1-based) must be odd.
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        let inversions = self.inversions();
        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let blank_row_from_bottom = self.size - self.blank_index() / self.size;
            (inversions + blank_row_from_bottom) % 2 == 1
        }
    }

    /// Whether the cell at `index` is orthogonally next to the blank.
    #[must_use]
    pub fn is_adjacent_to_blank(&self, index: usize) -> bool {
        if index >= self.tiles.len() {
            return false;
        }
        let blank = self.blank_index();
        let (row, col) = (index / self.size, index % self.size);
        let (blank_row, blank_col) = (blank / self.size, blank % self.size);
        row.abs_diff(blank_row) + col.abs_diff(blank_col) == 1
    }

    /// Slides the tile at `index` into the blank.
    ///
    /// Returns `false` and leaves the board untouched if the tile is not
    /// adjacent to the blank.
    pub fn slide(&mut self, index: usize) -> bool {
        if !self.is_adjacent_to_blank(index) {
            return false;
        }
        let blank = self.blank_index();
        self.tiles.swap(index, blank);
        true
    }

    /// Size label sent with results, e.g. `"3x3"`.
    #[must_use]
    pub fn size_label(&self) -> String {
        format!("{0}x{0}", self.size)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        for row in self.tiles.chunks(self.size) {
            let cells: Vec<String> = row
                .iter()
                .map(|&t| {
                    if t == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{t:>width$}")
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Produces solvable, unsolved shuffles of an `N x N` board.
#[derive(Debug, Clone, Copy)]
pub struct PuzzleGenerator {
    size: usize,
}

impl PuzzleGenerator {
    /// Creates a generator for `size x size` boards.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if `size` is below 2
    /// or too large to number every tile.
    pub fn new(size: usize) -> Result<Self, GeneratorError> {
        if size < 2 {
            return Err(GeneratorError::InvalidParameters(format!(
                "puzzle size must be at least 2, got {size}"
            )));
        }
        if size > MAX_SIZE {
            return Err(GeneratorError::InvalidParameters(format!(
                "puzzle size must be at most {MAX_SIZE}, got {size}"
            )));
        }
        Ok(Self { size })
    }

    /// Edge length of generated boards.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl StimulusGenerator for PuzzleGenerator {
    type Output = Board;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Board {
        let mut board = Board::solved(self.size);
        // Half of all permutations are solvable and only one is solved, so
        // each draw is accepted with probability at least 11/24 (N = 2).
        loop {
            board.tiles.shuffle(rng);
            if board.is_solvable() && !board.is_solved() {
                return board;
            }
        }
    }

    fn name(&self) -> &'static str {
        "puzzle"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn solved_board_layout() {
        let board = Board::solved(3);
        assert_eq!(board.tiles(), &[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert!(board.is_solved());
        assert!(board.is_solvable());
        assert_eq!(board.inversions(), 0);
    }

    #[test]
    fn swapped_pair_is_unsolvable_on_odd_board() {
        let board = Board::from_tiles(3, vec![2, 1, 3, 4, 5, 6, 7, 8, 0]).unwrap();
        assert_eq!(board.inversions(), 1);
        assert!(!board.is_solvable());
    }

    #[test]
    fn even_board_accounts_for_blank_row() {
        assert!(Board::solved(4).is_solvable());
        // blank moved up one row: one slide away from solved
        let tiles = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 13, 14, 15, 12];
        let board = Board::from_tiles(4, tiles).unwrap();
        assert!(board.is_solvable());
        let swapped = vec![2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0];
        assert!(!Board::from_tiles(4, swapped).unwrap().is_solvable());
    }

    #[test]
    fn slide_only_moves_adjacent_tiles() {
        let mut board = Board::solved(3);
        assert!(!board.slide(0));
        assert!(board.slide(7));
        assert_eq!(board.blank_index(), 7);
        assert!(!board.is_solved());
        assert!(board.slide(8));
        assert!(board.is_solved());
        assert!(!board.slide(99));
    }

    #[test]
    fn generated_boards_are_solvable_and_unsolved() {
        for size in 2..=5 {
            let generator = PuzzleGenerator::new(size).unwrap();
            let mut rng = StdRng::seed_from_u64(size as u64);
            for _ in 0..50 {
                let board = generator.generate(&mut rng);
                assert!(board.is_solvable());
                assert!(!board.is_solved());
            }
        }
    }

    #[test]
    fn rejects_invalid_boards() {
        assert!(PuzzleGenerator::new(1).is_err());
        assert!(Board::from_tiles(2, vec![1, 1, 2, 0]).is_err());
        assert!(Board::from_tiles(2, vec![1, 2, 0]).is_err());
        assert!(Board::from_tiles(2, vec![1, 2, 9, 0]).is_err());
    }

    #[test]
    fn display_and_label() {
        let board = Board::solved(2);
        assert_eq!(board.to_string(), "1 2\n3 .\n");
        assert_eq!(board.size_label(), "2x2");
    }
}
