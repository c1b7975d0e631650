use crate::{
    HoldError, LockError, PieceCollisionError,
    core::{board::Board, piece::Piece},
};

use super::{Direction, PieceBag, PieceSeed};

/// Single-game playfield: the board, the falling piece, the next and held pieces.
///
/// Every transform is computed on a copy of the falling piece and committed only if the
/// result does not collide, so a rejected operation leaves the field untouched.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    current: Piece,
    next: Piece,
    held: Option<Piece>,
    can_hold: bool,
    bag: PieceBag,
}

impl GameField {
    /// Creates a field with an empty board and the first two pieces of `seed`'s sequence.
    #[must_use]
    pub fn new(seed: PieceSeed) -> Self {
        Self::with_board(Board::EMPTY, seed)
    }

    /// Like [`Self::new`], but starting from a pre-seeded board.
    ///
    /// The falling piece is placed at its spawn position even if that collides; check
    /// [`Self::is_current_colliding`] before playing.
    #[must_use]
    pub fn with_board(board: Board, seed: PieceSeed) -> Self {
        let mut bag = PieceBag::with_seed(seed);
        let current = Piece::new(bag.draw());
        let next = Piece::new(bag.draw());
        Self {
            board,
            current,
            next,
            held: None,
            can_hold: true,
            bag,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current(&self) -> Piece {
        self.current
    }

    #[must_use]
    pub fn next(&self) -> Piece {
        self.next
    }

    #[must_use]
    pub fn held(&self) -> Option<Piece> {
        self.held
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    #[must_use]
    pub fn is_current_colliding(&self) -> bool {
        self.board.is_colliding(&self.current)
    }

    /// Returns where the falling piece would land on a hard drop.
    #[must_use]
    pub fn ghost(&self) -> Piece {
        self.current.simulate_drop_position(&self.board)
    }

    pub fn set_current(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.current = piece;
        Ok(())
    }

    pub fn try_move(&mut self, direction: Direction) -> Result<(), PieceCollisionError> {
        let (dx, dy) = direction.offset();
        self.set_current(self.current.moved(dx, dy))
    }

    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self
            .current
            .kicked_rotation(&self.board)
            .ok_or(PieceCollisionError)?;
        self.current = piece;
        Ok(())
    }

    /// Moves the falling piece straight down as far as it goes and returns the number of
    /// rows traversed. The piece is not locked.
    pub fn hard_drop(&mut self) -> usize {
        let rows = self.current.drop_distance(&self.board);
        self.current = self.ghost();
        rows
    }

    /// Stores the falling piece (in spawn form) and brings in the held or next piece.
    ///
    /// Hold is available once per lock. When the incoming piece collides at its spawn
    /// position the swap is kept and [`HoldError::PieceCollision`] is returned; the
    /// caller treats it as game over.
    pub fn try_hold(&mut self) -> Result<(), HoldError> {
        if !self.can_hold {
            return Err(HoldError::HoldAlreadyUsed);
        }
        self.can_hold = false;

        let mut stored = self.current;
        stored.reset_to_spawn();
        self.current = match self.held.replace(stored) {
            Some(held) => held,
            None => self.promote_next(),
        };

        if self.is_current_colliding() {
            return Err(HoldError::PieceCollision(PieceCollisionError));
        }
        Ok(())
    }

    /// Writes the falling piece into the board, clears full rows and spawns the next
    /// piece.
    ///
    /// Returns the number of cleared rows together with the lock result. A piece with a
    /// cell above the board is not written at all; a spawn collision is reported after
    /// the rows have been cleared.
    pub fn lock_piece(&mut self) -> (usize, Result<(), LockError>) {
        if let Err(e) = self.board.fill_piece(&self.current) {
            return (0, Err(e));
        }
        let cleared_lines = self.board.clear_full_rows().len();

        self.current = self.promote_next();
        self.can_hold = true;
        if self.is_current_colliding() {
            return (
                cleared_lines,
                Err(LockError::SpawnCollision(PieceCollisionError)),
            );
        }
        (cleared_lines, Ok(()))
    }

    fn promote_next(&mut self) -> Piece {
        let next = Piece::new(self.bag.draw());
        std::mem::replace(&mut self.next, next)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Block, PieceKind};

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    fn block_spawn_area(board: &mut Board) {
        for y in 0..2 {
            for x in 3..8 {
                board.set_cell(x, y, Block::Garbage);
            }
        }
    }

    #[test]
    fn test_new_field() {
        let field = GameField::new(SEED);
        assert!(field.board().is_empty());
        assert_eq!(field.current(), Piece::new(field.current().kind()));
        assert_eq!(field.next(), Piece::new(field.next().kind()));
        assert_ne!(field.current().kind(), field.next().kind());
        assert_eq!(field.held(), None);
        assert!(field.can_hold());
        assert!(!field.is_current_colliding());
    }

    #[test]
    fn test_rejected_move_keeps_piece() {
        let mut field = GameField::new(SEED);
        field.set_current(Piece::new(PieceKind::O).at(0, 5)).unwrap();
        assert!(field.try_move(Direction::Left).is_err());
        assert_eq!(field.current().x(), 0);
        field.try_move(Direction::Right).unwrap();
        field.try_move(Direction::Down).unwrap();
        assert_eq!((field.current().x(), field.current().y()), (1, 6));
    }

    #[test]
    fn test_failed_rotation_keeps_piece() {
        let mut field = GameField::new(SEED);
        let piece = Piece::new(PieceKind::I).rotated_cw().at(9, 5);
        field.set_current(piece).unwrap();
        assert!(field.try_rotate().is_err());
        assert_eq!(field.current(), piece);
    }

    #[test]
    fn test_hard_drop_returns_rows() {
        let mut field = GameField::new(SEED);
        field.set_current(Piece::new(PieceKind::O)).unwrap();
        assert_eq!(field.hard_drop(), 18);
        assert_eq!(field.current().y(), 18);
        assert_eq!(field.hard_drop(), 0);
    }

    #[test]
    fn test_first_hold_promotes_next() {
        let mut field = GameField::new(SEED);
        let first = field.current().kind();
        let second = field.next().kind();
        field.try_move(Direction::Down).unwrap();
        let _ = field.try_rotate();

        field.try_hold().unwrap();
        assert_eq!(field.held(), Some(Piece::new(first)));
        assert_eq!(field.current(), Piece::new(second));
        assert_ne!(field.next().kind(), second);
        assert!(!field.can_hold());
    }

    #[test]
    fn test_second_hold_in_same_turn_is_rejected() {
        let mut field = GameField::new(SEED);
        field.try_hold().unwrap();
        let (current, next, held) = (field.current(), field.next(), field.held());

        assert!(matches!(field.try_hold(), Err(HoldError::HoldAlreadyUsed)));
        assert_eq!(field.current(), current);
        assert_eq!(field.next(), next);
        assert_eq!(field.held(), held);
    }

    #[test]
    fn test_hold_swaps_after_lock() {
        let mut field = GameField::new(SEED);
        let first = field.current().kind();
        field.try_hold().unwrap();
        field.hard_drop();
        let (cleared, result) = field.lock_piece();
        assert_eq!(cleared, 0);
        result.unwrap();
        assert!(field.can_hold());

        let before = field.current().kind();
        field.try_hold().unwrap();
        assert_eq!(field.current(), Piece::new(first));
        assert_eq!(field.held(), Some(Piece::new(before)));
    }

    #[test]
    fn test_hold_collision_keeps_swap() {
        let mut board = Board::EMPTY;
        block_spawn_area(&mut board);
        let mut field = GameField::with_board(board, SEED);
        assert!(field.is_current_colliding());

        let first = field.current().kind();
        let second = field.next().kind();
        field.set_current(Piece::new(first).at(0, 10)).unwrap();

        assert!(matches!(
            field.try_hold(),
            Err(HoldError::PieceCollision(_))
        ));
        assert_eq!(field.current(), Piece::new(second));
        assert_eq!(field.held(), Some(Piece::new(first)));
    }

    #[test]
    fn test_lock_clears_rows_and_spawns_next() {
        let mut board = Board::EMPTY;
        for y in 16..20 {
            for x in 0..9 {
                board.set_cell(x, y, Block::Garbage);
            }
        }
        let mut field = GameField::with_board(board, SEED);
        let next = field.next();
        field
            .set_current(Piece::new(PieceKind::I).rotated_cw().at(9, 0))
            .unwrap();
        field.hard_drop();

        let (cleared, result) = field.lock_piece();
        assert_eq!(cleared, 4);
        result.unwrap();
        assert!(field.board().is_empty());
        assert_eq!(field.current(), next);
    }

    #[test]
    fn test_lock_above_board_writes_nothing() {
        let mut board = Board::EMPTY;
        board.set_cell(4, 1, Block::Garbage);
        let mut field = GameField::with_board(board.clone(), SEED);
        field
            .set_current(Piece::new(PieceKind::O).at(4, -1))
            .unwrap();
        let current = field.current();

        let (cleared, result) = field.lock_piece();
        assert_eq!(cleared, 0);
        assert!(result.unwrap_err().is_above_board());
        assert_eq!(field.board(), &board);
        assert_eq!(field.current(), current);
    }

    #[test]
    fn test_lock_reports_spawn_collision() {
        let mut board = Board::EMPTY;
        block_spawn_area(&mut board);
        let mut field = GameField::with_board(board, SEED);
        field
            .set_current(Piece::new(PieceKind::O).at(0, 10))
            .unwrap();
        field.hard_drop();

        let (cleared, result) = field.lock_piece();
        assert_eq!(cleared, 0);
        assert!(result.unwrap_err().is_spawn_collision());
        assert!(field.can_hold());
    }
}
