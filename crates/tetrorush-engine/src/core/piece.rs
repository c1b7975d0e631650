use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BOARD_WIDTH, board::Board};

/// Largest width or height of any piece shape.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Horizontal offsets tried, in order, after a clockwise rotation.
///
/// The first offset whose placement is legal wins. This is a simplified wall-kick
/// table: there are no vertical kicks and no per-piece tables.
pub const KICK_OFFSETS: [i32; 5] = [0, 1, -1, 2, -2];

const SPAWN_Y: i32 = 0;

/// RGB color associated with a piece kind.
///
/// Formats as a lowercase CSS hex string.
///
/// ```
/// use tetrorush_engine::PieceKind;
///
/// assert_eq!(PieceKind::L.color().to_string(), "#ffa500");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
#[display("#{_0:02x}{_1:02x}{_2:02x}")]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Enum representing the type of piece.
///
/// The discriminant is the kind index used by the randomizer (0-6, in I/J/L/O/S/Z/T order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// Z-piece.
    Z = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in index order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Returns the canonical spawn orientation of this kind.
    #[must_use]
    pub const fn spawn_shape(self) -> Shape {
        SPAWN_SHAPES[self as usize]
    }

    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            PieceKind::I => Rgb(0x00, 0xff, 0xff),
            PieceKind::J => Rgb(0x00, 0x00, 0xff),
            PieceKind::L => Rgb(0xff, 0xa5, 0x00),
            PieceKind::O => Rgb(0xff, 0xff, 0x00),
            PieceKind::S => Rgb(0x00, 0xff, 0x00),
            PieceKind::Z => Rgb(0xff, 0x00, 0x00),
            PieceKind::T => Rgb(0x80, 0x00, 0x80),
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrorush_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrorush_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('J'), Some(PieceKind::J));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

const SPAWN_SHAPES: [Shape; PieceKind::LEN] = [
    Shape::parse(&["####"]),
    Shape::parse(&["#..", "###"]),
    Shape::parse(&["..#", "###"]),
    Shape::parse(&["##", "##"]),
    Shape::parse(&[".##", "##."]),
    Shape::parse(&["##.", ".##"]),
    Shape::parse(&[".#.", "###"]),
];

/// Rectangular boolean matrix describing which cells of a piece are occupied.
///
/// Only the top-left `width × height` part of the backing array is meaningful; the rest
/// is always `false`. Shapes are plain values, so rotating a copy never affects the
/// original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Builds a shape from rows of `#` (occupied) and `.` (empty).
    #[allow(clippy::cast_possible_truncation)]
    const fn parse(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows[0].len();
        assert!(height <= MAX_SHAPE_SIZE && width <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < height {
            let row = rows[y].as_bytes();
            assert!(row.len() == width);
            let mut x = 0;
            while x < width {
                cells[y][x] = row[x] == b'#';
                x += 1;
            }
            y += 1;
        }
        Self {
            width: width as u8,
            height: height as u8,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns whether the cell at `(x, y)` (relative to the top-left corner) is occupied.
    ///
    /// Cells outside the shape's bounds are reported as empty.
    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.cells[y][x]
    }

    /// Returns an iterator of occupied `(x, y)` cells relative to the top-left corner.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width)
                .filter(move |&x| self.cells[usize::from(y)][usize::from(x)])
                .map(move |x| (x, y))
        })
    }

    /// Returns the shape rotated 90° clockwise (transpose, then reverse each row).
    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        let (width, height) = (self.width(), self.height());
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in cells.iter_mut().enumerate().take(width) {
            for (x, cell) in row.iter_mut().enumerate().take(height) {
                *cell = self.cells[height - 1 - x][y];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Rotates the shape 90° clockwise in place.
    pub fn rotate_cw(&mut self) {
        *self = self.rotated_cw();
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width() {
                f.write_str(if self.cells[y][x] { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

/// A piece with its current shape and the board position of its top-left corner.
///
/// Pieces are `Copy`: movement and rotation return new values, so a transform can be
/// tried on a detached copy and committed only if the result is legal.
///
/// # Example
///
/// ```
/// use tetrorush_engine::{Board, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::new(PieceKind::T);
/// assert_eq!((piece.x(), piece.y()), (3, 0));
///
/// let moved = piece.right();
/// assert!(!board.is_colliding(&moved));
///
/// let rotated = moved.kicked_rotation(&board).unwrap();
/// assert_eq!(rotated.shape().to_string(), "#.\n##\n#.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
    x: i32,
    y: i32,
}

impl Piece {
    /// Creates a piece of the given kind in spawn orientation at the spawn position.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        let shape = kind.spawn_shape();
        Self {
            kind,
            shape,
            x: spawn_x(&shape),
            y: SPAWN_Y,
        }
    }

    /// Returns the same piece anchored at `(x, y)`.
    #[must_use]
    pub fn at(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Returns an iterator of board coordinates covered by the piece.
    ///
    /// Coordinates may lie outside the board (negative or past the edges).
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied_cells()
            .map(move |(dx, dy)| (self.x + i32::from(dx), self.y + i32::from(dy)))
    }

    #[must_use]
    pub fn moved(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    #[must_use]
    pub fn left(self) -> Self {
        self.moved(-1, 0)
    }

    #[must_use]
    pub fn right(self) -> Self {
        self.moved(1, 0)
    }

    #[must_use]
    pub fn down(self) -> Self {
        self.moved(0, 1)
    }

    /// Returns the piece with its shape rotated clockwise, anchor unchanged.
    #[must_use]
    pub fn rotated_cw(self) -> Self {
        let mut piece = self;
        piece.shape.rotate_cw();
        piece
    }

    /// Regenerates the canonical shape and moves the piece back to the spawn position.
    pub fn reset_to_spawn(&mut self) {
        *self = Self::new(self.kind);
    }

    /// Rotates clockwise, trying each of [`KICK_OFFSETS`] in order.
    ///
    /// Returns `None` if every offset collides; the receiver is never modified.
    #[must_use]
    pub fn kicked_rotation(self, board: &Board) -> Option<Self> {
        let rotated = self.rotated_cw();
        KICK_OFFSETS
            .iter()
            .map(|&dx| rotated.moved(dx, 0))
            .find(|piece| !board.is_colliding(piece))
    }

    /// Returns the lowest position reachable by moving straight down.
    ///
    /// This is the hard-drop destination, also used by renderers for the ghost piece.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let next = dropped.down();
            if board.is_colliding(&next) {
                return dropped;
            }
            dropped = next;
        }
    }

    /// Returns how many rows [`Self::simulate_drop_position`] moves the piece.
    #[must_use]
    pub fn drop_distance(&self, board: &Board) -> usize {
        let dropped = self.simulate_drop_position(board);
        usize::try_from(dropped.y - self.y).unwrap_or(0)
    }
}

fn spawn_x(shape: &Shape) -> i32 {
    let x = (BOARD_WIDTH - shape.width()) / 2;
    i32::try_from(x).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_index_order() {
        for (index, kind) in PieceKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), index);
            assert_eq!(PieceKind::from_index(index), Some(kind));
        }
        assert_eq!(PieceKind::from_index(7), None);
        assert_eq!(PieceKind::I.index(), 0);
        assert_eq!(PieceKind::T.index(), 6);
    }

    #[test]
    fn test_spawn_shapes() {
        assert_eq!(PieceKind::I.spawn_shape().to_string(), "####");
        assert_eq!(PieceKind::J.spawn_shape().to_string(), "#..\n###");
        assert_eq!(PieceKind::L.spawn_shape().to_string(), "..#\n###");
        assert_eq!(PieceKind::O.spawn_shape().to_string(), "##\n##");
        assert_eq!(PieceKind::S.spawn_shape().to_string(), ".##\n##.");
        assert_eq!(PieceKind::Z.spawn_shape().to_string(), "##.\n.##");
        assert_eq!(PieceKind::T.spawn_shape().to_string(), ".#.\n###");

        for kind in PieceKind::ALL {
            assert_eq!(kind.spawn_shape().occupied_cells().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_spawn_position_is_centered() {
        // floor(10 / 2 - width / 2)
        assert_eq!(Piece::new(PieceKind::I).x(), 3);
        assert_eq!(Piece::new(PieceKind::O).x(), 4);
        assert_eq!(Piece::new(PieceKind::T).x(), 3);
        for kind in PieceKind::ALL {
            assert_eq!(Piece::new(kind).y(), 0);
        }
    }

    #[test]
    fn test_rotation_is_transpose_then_reverse() {
        let mut shape = PieceKind::J.spawn_shape();
        shape.rotate_cw();
        assert_eq!(shape.to_string(), "##\n#.\n#.");
        shape.rotate_cw();
        assert_eq!(shape.to_string(), "###\n..#");
        shape.rotate_cw();
        assert_eq!(shape.to_string(), ".#\n.#\n##");

        let i = PieceKind::I.spawn_shape().rotated_cw();
        assert_eq!((i.width(), i.height()), (1, 4));
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in PieceKind::ALL {
            let shape = kind.spawn_shape();
            let rotated = shape.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(rotated, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_keeps_kind() {
        let piece = Piece::new(PieceKind::S).rotated_cw();
        assert_eq!(piece.kind(), PieceKind::S);
        assert_ne!(*piece.shape(), PieceKind::S.spawn_shape());
    }

    #[test]
    fn test_reset_to_spawn() {
        let mut piece = Piece::new(PieceKind::L).rotated_cw().at(7, 12);
        piece.reset_to_spawn();
        assert_eq!(piece, Piece::new(PieceKind::L));
    }

    #[test]
    fn test_kick_prefers_offsets_in_order() {
        let piece = Piece::new(PieceKind::T).at(3, 10);
        // The rotated T covers (3,10) (3,11) (4,11) (3,12); blocking (3,12) and (4,12)
        // rules out offsets 0 and +1, leaving -1 as the first legal offset.
        let mut board = Board::EMPTY;
        board.set_cell(3, 12, crate::Block::Garbage);
        board.set_cell(4, 12, crate::Block::Garbage);
        assert!(!board.is_colliding(&piece));

        let rotated = piece.kicked_rotation(&board).unwrap();
        assert_eq!(rotated.x(), 2);
        assert_eq!(rotated.y(), 10);

        // Without obstacles the unshifted rotation is accepted.
        let rotated = piece.kicked_rotation(&Board::EMPTY).unwrap();
        assert_eq!(rotated.x(), 3);
    }

    #[test]
    fn test_kick_offsets_order() {
        assert_eq!(KICK_OFFSETS, [0, 1, -1, 2, -2]);
    }

    #[test]
    fn test_kick_right_before_left() {
        // Only (3,12) is blocked: offsets +1 and -1 both fit, +1 must win.
        let piece = Piece::new(PieceKind::T).at(3, 10);
        let mut board = Board::EMPTY;
        board.set_cell(3, 12, crate::Block::Garbage);
        assert!(!board.is_colliding(&piece.rotated_cw().moved(-1, 0)));

        let rotated = piece.kicked_rotation(&board).unwrap();
        assert_eq!((rotated.x(), rotated.y()), (4, 10));
    }

    #[test]
    fn test_kick_two_right_before_two_left() {
        // Columns 2..=4 of row 12 block offsets 0, +1 and -1; both +2 and -2 fit.
        let piece = Piece::new(PieceKind::T).at(3, 10);
        let mut board = Board::EMPTY;
        for x in 2..=4 {
            board.set_cell(x, 12, crate::Block::Garbage);
        }
        assert!(!board.is_colliding(&piece));
        assert!(!board.is_colliding(&piece.rotated_cw().moved(-2, 0)));

        let rotated = piece.kicked_rotation(&board).unwrap();
        assert_eq!((rotated.x(), rotated.y()), (5, 10));
    }

    #[test]
    fn test_kick_fails_when_all_offsets_collide() {
        let piece = Piece::new(PieceKind::T).at(3, 10);
        let mut board = Board::EMPTY;
        for x in 1..=5 {
            board.set_cell(x, 12, crate::Block::Garbage);
        }
        assert!(!board.is_colliding(&piece));
        assert_eq!(piece.kicked_rotation(&board), None);
    }

    #[test]
    fn test_kick_off_the_wall() {
        // A vertical I in the last column cannot turn horizontal: even the -2 kick
        // leaves its right end past column 9.
        let vertical = Piece::new(PieceKind::I).rotated_cw().at(9, 5);
        let board = Board::EMPTY;
        assert!(!board.is_colliding(&vertical));
        assert_eq!(vertical.kicked_rotation(&board), None);

        let vertical = vertical.at(8, 5);
        let horizontal = vertical.kicked_rotation(&board).unwrap();
        assert_eq!(horizontal.x(), 6);
    }

    #[test]
    fn test_simulate_drop_position() {
        let piece = Piece::new(PieceKind::O);
        let board = Board::EMPTY;
        let dropped = piece.simulate_drop_position(&board);
        assert_eq!(dropped.y(), 18);
        assert_eq!(piece.drop_distance(&board), 18);
        assert_eq!(dropped.drop_distance(&board), 0);
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(PieceKind::I.color().to_string(), "#00ffff");
        assert_eq!(PieceKind::T.color().to_string(), "#800080");
        assert_eq!(Piece::new(PieceKind::Z).color(), Rgb(0xff, 0, 0));
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }
}
