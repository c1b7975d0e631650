use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::LockError;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, PieceKind},
};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Occupied cell not owned by any piece kind (pre-seeded boards).
    Garbage,
    /// Locked piece of a specific type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Block::Piece(kind) => Some(kind),
            Block::Empty | Block::Garbage => None,
        }
    }
}

/// A single row of the board, indexed by column.
pub type BoardRow = [Block; BOARD_WIDTH];

const EMPTY_ROW: BoardRow = [Block::Empty; BOARD_WIDTH];

/// The 10×20 playfield holding locked cells.
///
/// Row 0 is the top, column 0 the left edge. Positions above row 0 are not stored: a
/// piece may extend there while falling, but it can never be locked there.
///
/// # Example
///
/// ```
/// use tetrorush_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::from_ascii(
///     "
///     ###########
///     ##########.
///     ",
/// );
/// assert!(board.is_row_full(18));
///
/// let cleared = board.clear_full_rows();
/// assert_eq!(cleared.as_slice(), &[18]);
/// assert!(!board.is_row_full(19));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Builds a board from an ASCII picture.
    ///
    /// Blank lines are ignored and the remaining lines are aligned with the bottom of the
    /// board. Each line holds exactly [`BOARD_WIDTH`] characters: `.` is empty, `#` is a
    /// garbage cell and a piece letter (`I`, `J`, `L`, `O`, `S`, `Z`, `T`) is a locked cell
    /// of that kind.
    ///
    /// # Panics
    ///
    /// Panics if a line has the wrong width, an unknown character appears or the picture
    /// is taller than the board.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "board picture has {} rows, at most {BOARD_HEIGHT} allowed",
            lines.len()
        );

        let mut board = Self::EMPTY;
        let offset = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells = line.chars().collect::<Vec<_>>();
            assert_eq!(cells.len(), BOARD_WIDTH, "bad row width: {line:?}");
            for (x, ch) in cells.into_iter().enumerate() {
                board.rows[offset + i][x] = match ch {
                    '.' => Block::Empty,
                    '#' => Block::Garbage,
                    _ => match PieceKind::from_char(ch) {
                        Some(kind) => Block::Piece(kind),
                        None => panic!("unknown board character {ch:?}"),
                    },
                };
            }
        }
        board
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Block {
        self.rows[y][x]
    }

    /// Returns the cell at signed coordinates, or `None` outside the stored grid.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.get(x).copied()
    }

    pub fn set_cell(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y][x] = block;
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &BoardRow {
        &self.rows[y]
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|b| b.is_occupied())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|b| b.is_empty())
    }

    /// Returns the indices of all full rows, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> ArrayVec<usize, BOARD_HEIGHT> {
        (0..BOARD_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Removes row `y`, shifts every row above it down by one and inserts an empty row
    /// at the top.
    pub fn remove_row(&mut self, y: usize) {
        self.rows.copy_within(0..y, 1);
        self.rows[0] = EMPTY_ROW;
    }

    /// Removes every full row and returns the indices they had before removal.
    ///
    /// All full rows are collected first and compacted in a single bottom-up pass, so
    /// several full rows (adjacent or not) are handled without any index skew. The
    /// relative order of the surviving rows is preserved.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, BOARD_HEIGHT> {
        let full = self.full_rows();
        if full.is_empty() {
            return full;
        }

        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if full.contains(&y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        full
    }

    /// Returns whether `piece` overlaps a wall, the floor or an occupied cell.
    ///
    /// Cells above the board (negative rows) never collide as long as their column is
    /// within bounds.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece) -> bool {
        piece.occupied_positions().any(|(x, y)| {
            let Ok(x) = usize::try_from(x) else {
                return true;
            };
            if x >= BOARD_WIDTH {
                return true;
            }
            let Ok(y) = usize::try_from(y) else {
                return false;
            };
            y >= BOARD_HEIGHT || self.rows[y][x].is_occupied()
        })
    }

    /// Writes the piece's cells into the board.
    ///
    /// Fails without touching the board if any cell lies above row 0.
    pub fn fill_piece(&mut self, piece: &Piece) -> Result<(), LockError> {
        if piece.occupied_positions().any(|(_, y)| y < 0) {
            return Err(LockError::AboveBoard);
        }
        for (x, y) in piece.occupied_positions() {
            if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y))
                && x < BOARD_WIDTH
                && y < BOARD_HEIGHT
            {
                self.rows[y][x] = Block::Piece(piece.kind());
            }
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for block in row {
                let ch = match block {
                    Block::Empty => '.',
                    Block::Garbage => '#',
                    Block::Piece(kind) => kind.as_char(),
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
