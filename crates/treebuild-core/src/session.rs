//! One puzzle attempt, owned by the caller.
//!
//! The session replaces process-wide mutable state with an explicit value:
//! it owns the tree, the shuffled pieces, and the board, and advances a
//! small state machine (`Start -> Playing -> Won/Quit`) in response to
//! discrete player actions. Several sessions can coexist independently,
//! which also makes the engine deterministic to test.

use crate::board::PlacementBoard;
use crate::error::{ClearError, GenerateError, PlaceError};
use crate::generator::{Generator, GeneratorConfig};
use crate::slot_capacity;
use crate::tree::Tree;
use crate::types::{Difficulty, PuzzlePiece};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No active puzzle; waiting for difficulty selection
    Start,
    /// A puzzle is in progress
    Playing,
    /// The board reached the identity mapping
    Won,
    /// The player left; terminal
    Quit,
}

/// A discrete player action driving the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Generate a fresh puzzle at the given difficulty
    NewGame(Difficulty),
    /// Place the piece derived from `piece` onto `board_slot`
    Place { board_slot: usize, piece: usize },
    /// Clear `board_slot`, returning its piece to the pool
    Clear { board_slot: usize },
    /// Empty the whole board, keeping the puzzle
    Reset,
    /// End the session
    Quit,
}

struct ActivePuzzle {
    difficulty: Difficulty,
    tree: Tree,
    /// Presentation order, fixed for the whole attempt
    pieces: Vec<PuzzlePiece>,
    board: PlacementBoard,
}

/// A single puzzle session.
pub struct PuzzleSession {
    state: SessionState,
    puzzle: Option<ActivePuzzle>,
}

impl Default for PuzzleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleSession {
    /// Create a session with no active puzzle
    pub fn new() -> Self {
        Self {
            state: SessionState::Start,
            puzzle: None,
        }
    }

    /// Generate a fresh puzzle and enter `Playing`.
    ///
    /// Accepted from any non-terminal state; the previous puzzle, if any,
    /// is discarded wholesale.
    pub fn new_puzzle(&mut self, difficulty: Difficulty) -> Result<(), GenerateError> {
        self.install(difficulty, Generator::new())
    }

    /// Like [`PuzzleSession::new_puzzle`] with a fixed generator seed.
    pub fn new_puzzle_seeded(
        &mut self,
        difficulty: Difficulty,
        seed: u64,
    ) -> Result<(), GenerateError> {
        self.install(difficulty, Generator::with_seed(seed))
    }

    fn install(
        &mut self,
        difficulty: Difficulty,
        mut generator: Generator,
    ) -> Result<(), GenerateError> {
        if self.state == SessionState::Quit {
            return Ok(());
        }
        let (tree, pieces) = generator.generate(difficulty)?;
        let config = GeneratorConfig::for_difficulty(difficulty);
        let board = PlacementBoard::new(
            slot_capacity(config.max_depth),
            tree.nodes().iter().map(|n| n.slot()),
        );
        self.puzzle = Some(ActivePuzzle {
            difficulty,
            tree,
            pieces,
            board,
        });
        self.state = SessionState::Playing;
        info!(%difficulty, "new puzzle started");
        Ok(())
    }

    /// Apply one player action, returning the resulting state.
    ///
    /// Misuse of place/clear against the current board state is a logical
    /// no-op here; callers that want the precise cause use the typed
    /// methods directly.
    pub fn apply(&mut self, action: PlayerAction) -> Result<SessionState, GenerateError> {
        match action {
            PlayerAction::NewGame(difficulty) => self.new_puzzle(difficulty)?,
            PlayerAction::Place { board_slot, piece } => {
                let _ = self.place(board_slot, piece);
            }
            PlayerAction::Clear { board_slot } => {
                let _ = self.clear(board_slot);
            }
            PlayerAction::Reset => self.reset(),
            PlayerAction::Quit => self.quit(),
        }
        Ok(self.state)
    }

    /// Place a pooled piece onto an unoccupied board slot.
    ///
    /// Re-evaluates the win condition on success; reaching the identity
    /// mapping moves the session to `Won`.
    pub fn place(&mut self, board_slot: usize, piece: usize) -> Result<(), PlaceError> {
        if self.state != SessionState::Playing {
            return Err(PlaceError::NotPlaying);
        }
        let puzzle = self.puzzle.as_mut().ok_or(PlaceError::NotPlaying)?;

        // A piece id is the structural slot it came from; anything else
        // names a piece this puzzle never produced.
        if !puzzle.board.is_populated(piece) || puzzle.board.is_piece_placed(piece) {
            return Err(PlaceError::PieceUnavailable(piece));
        }
        puzzle.board.place(board_slot, piece)?;
        debug!(board_slot, piece, "piece placed");

        if puzzle.board.is_identity() {
            info!("board reached identity mapping");
            self.state = SessionState::Won;
        }
        Ok(())
    }

    /// Clear an occupied board slot, returning its piece to the pool.
    pub fn clear(&mut self, board_slot: usize) -> Result<PuzzlePiece, ClearError> {
        if self.state != SessionState::Playing {
            return Err(ClearError::NotPlaying);
        }
        let puzzle = self.puzzle.as_mut().ok_or(ClearError::NotPlaying)?;

        let slot = puzzle.board.clear(board_slot)?;
        debug!(board_slot, piece = slot, "slot cleared");
        let piece = puzzle
            .pieces
            .iter()
            .copied()
            .find(|p| p.original_slot == slot)
            .expect("cleared piece missing from piece list");
        Ok(piece)
    }

    /// Empty the board without touching the tree or the pieces.
    pub fn reset(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }
        if let Some(puzzle) = self.puzzle.as_mut() {
            puzzle.board.reset();
            debug!("board reset");
        }
    }

    /// End the session; terminal.
    pub fn quit(&mut self) {
        self.state = SessionState::Quit;
        self.puzzle = None;
    }

    /// Abandon the current puzzle and return to the start state.
    pub fn to_start(&mut self) {
        if self.state == SessionState::Quit {
            return;
        }
        self.state = SessionState::Start;
        self.puzzle = None;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Won iff every populated slot holds its own piece
    pub fn is_won(&self) -> bool {
        self.state == SessionState::Won
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.puzzle.as_ref().map(|p| p.difficulty)
    }

    /// The active puzzle's tree, for read-only layout traversal
    pub fn tree(&self) -> Option<&Tree> {
        self.puzzle.as_ref().map(|p| &p.tree)
    }

    /// All pieces in presentation (shuffled) order
    pub fn pieces(&self) -> &[PuzzlePiece] {
        self.puzzle.as_ref().map_or(&[], |p| p.pieces.as_slice())
    }

    pub fn board(&self) -> Option<&PlacementBoard> {
        self.puzzle.as_ref().map(|p| &p.board)
    }

    /// Pieces currently in the pool, in presentation order
    pub fn unplaced(&self) -> Vec<PuzzlePiece> {
        match self.puzzle.as_ref() {
            Some(puzzle) => puzzle
                .pieces
                .iter()
                .copied()
                .filter(|p| !puzzle.board.is_piece_placed(p.original_slot))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_session() -> PuzzleSession {
        let mut session = PuzzleSession::new();
        session.new_puzzle_seeded(Difficulty::Easy, 42).unwrap();
        session
    }

    #[test]
    fn test_new_session_starts_idle() {
        let session = PuzzleSession::new();
        assert_eq!(session.state(), SessionState::Start);
        assert!(session.tree().is_none());
        assert!(session.pieces().is_empty());
    }

    #[test]
    fn test_new_puzzle_enters_playing_with_full_pool() {
        let session = playing_session();
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.pieces().len(), 11);
        assert_eq!(session.unplaced().len(), 11);
        assert_eq!(session.tree().unwrap().node_count(), 11);
    }

    #[test]
    fn test_actions_rejected_outside_playing() {
        let mut session = PuzzleSession::new();
        assert_eq!(session.place(0, 0), Err(PlaceError::NotPlaying));
        assert_eq!(session.clear(0), Err(ClearError::NotPlaying));
        session.reset(); // no-op, must not panic
    }

    #[test]
    fn test_placing_every_piece_at_home_wins() {
        let mut session = playing_session();
        let pieces: Vec<PuzzlePiece> = session.pieces().to_vec();

        for (i, piece) in pieces.iter().enumerate() {
            assert!(!session.is_won());
            session.place(piece.original_slot, piece.original_slot).unwrap();
            assert_eq!(session.unplaced().len(), pieces.len() - i - 1);
        }
        assert!(session.is_won());
        assert_eq!(session.state(), SessionState::Won);

        // Terminal for board mutation until a new game starts
        assert_eq!(session.clear(0), Err(ClearError::NotPlaying));
    }

    #[test]
    fn test_misplaced_piece_does_not_win() {
        let mut session = playing_session();
        let pieces: Vec<PuzzlePiece> = session.pieces().to_vec();
        let slots: Vec<usize> = pieces.iter().map(|p| p.original_slot).collect();

        // Swap the first two pieces, place the rest at home
        session.place(slots[0], pieces[1].original_slot).unwrap();
        session.place(slots[1], pieces[0].original_slot).unwrap();
        for piece in &pieces[2..] {
            session.place(piece.original_slot, piece.original_slot).unwrap();
        }
        assert!(!session.is_won());
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_piece_cannot_be_placed_twice() {
        let mut session = playing_session();
        let piece = session.pieces()[0];
        let slots: Vec<usize> = session.pieces().iter().map(|p| p.original_slot).collect();
        let other_slot = slots
            .iter()
            .copied()
            .find(|&s| s != piece.original_slot)
            .unwrap();

        session.place(piece.original_slot, piece.original_slot).unwrap();
        assert_eq!(
            session.place(other_slot, piece.original_slot),
            Err(PlaceError::PieceUnavailable(piece.original_slot))
        );
    }

    #[test]
    fn test_unknown_piece_is_unavailable() {
        let mut session = playing_session();
        let absent = (0..31)
            .find(|&s| !session.board().unwrap().is_populated(s))
            .expect("an 11-node tree leaves unpopulated slots");
        let target = session.pieces()[0].original_slot;
        assert_eq!(
            session.place(target, absent),
            Err(PlaceError::PieceUnavailable(absent))
        );
    }

    #[test]
    fn test_clear_returns_the_piece_to_the_pool() {
        let mut session = playing_session();
        let piece = session.pieces()[0];

        session.place(piece.original_slot, piece.original_slot).unwrap();
        assert_eq!(session.unplaced().len(), 10);

        let cleared = session.clear(piece.original_slot).unwrap();
        assert_eq!(cleared, piece);
        assert_eq!(session.unplaced().len(), 11);
    }

    #[test]
    fn test_reset_returns_all_pieces_without_regenerating() {
        let mut session = playing_session();
        let values_before = session.tree().unwrap().in_order_values();
        let pieces_before = session.pieces().to_vec();

        for piece in pieces_before.iter().take(5) {
            session.place(piece.original_slot, piece.original_slot).unwrap();
        }
        session.reset();

        assert_eq!(session.unplaced().len(), 11);
        assert_eq!(session.tree().unwrap().in_order_values(), values_before);
        assert_eq!(session.pieces(), pieces_before.as_slice());
    }

    #[test]
    fn test_apply_drives_the_state_machine() {
        let mut session = PuzzleSession::new();
        assert_eq!(
            session.apply(PlayerAction::NewGame(Difficulty::Easy)).unwrap(),
            SessionState::Playing
        );
        // Misuse is a logical no-op through the event interface
        assert_eq!(
            session.apply(PlayerAction::Clear { board_slot: 0 }).unwrap(),
            SessionState::Playing
        );
        assert_eq!(
            session.apply(PlayerAction::Quit).unwrap(),
            SessionState::Quit
        );
        // Quit is terminal, even for NewGame
        assert_eq!(
            session.apply(PlayerAction::NewGame(Difficulty::Hard)).unwrap(),
            SessionState::Quit
        );
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut a = PuzzleSession::new();
        let mut b = PuzzleSession::new();
        a.new_puzzle_seeded(Difficulty::Easy, 1).unwrap();
        b.new_puzzle_seeded(Difficulty::Hard, 2).unwrap();

        let piece = a.pieces()[0];
        a.place(piece.original_slot, piece.original_slot).unwrap();

        assert_eq!(b.unplaced().len(), 23);
        assert_eq!(a.difficulty(), Some(Difficulty::Easy));
        assert_eq!(b.difficulty(), Some(Difficulty::Hard));
    }
}
