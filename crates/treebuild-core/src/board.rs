//! Placement board: the mutable mapping the player fills in.
//!
//! Board slots are addressed directly by structural slot number. An entry
//! holds the `original_slot` of the piece placed there, or nothing. Slots
//! that no tree node occupies are not part of the board and reject every
//! operation.

use crate::error::{ClearError, PlaceError};

/// Fixed-size board indexed by structural slot.
#[derive(Debug, Clone)]
pub struct PlacementBoard {
    /// Per-slot occupant: the `original_slot` of the piece placed there
    entries: Vec<Option<usize>>,
    /// Which structural slots exist in this puzzle's tree
    populated: Vec<bool>,
}

impl PlacementBoard {
    /// Create an empty board with the given slot capacity.
    ///
    /// `populated_slots` names the structural slots the tree occupies; only
    /// those accept placements.
    pub fn new(capacity: usize, populated_slots: impl IntoIterator<Item = usize>) -> Self {
        let mut populated = vec![false; capacity];
        for slot in populated_slots {
            assert!(slot < capacity, "populated slot {slot} out of range");
            populated[slot] = true;
        }
        Self {
            entries: vec![None; capacity],
            populated,
        }
    }

    /// Total number of addressable slots
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Whether a tree node occupies this structural slot
    pub fn is_populated(&self, slot: usize) -> bool {
        self.populated.get(slot).copied().unwrap_or(false)
    }

    /// The populated structural slots, ascending
    pub fn populated_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.populated
            .iter()
            .enumerate()
            .filter(|(_, &p)| p)
            .map(|(slot, _)| slot)
    }

    /// The `original_slot` of the piece at `slot`, if any
    pub fn piece_at(&self, slot: usize) -> Option<usize> {
        self.entries.get(slot).copied().flatten()
    }

    /// Whether the piece derived from `original_slot` is on the board
    pub fn is_piece_placed(&self, original_slot: usize) -> bool {
        self.entries.iter().any(|&e| e == Some(original_slot))
    }

    /// Number of pieces currently on the board
    pub fn placed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Place a piece on an unoccupied board slot.
    pub fn place(&mut self, board_slot: usize, piece_slot: usize) -> Result<(), PlaceError> {
        if !self.is_populated(board_slot) {
            return Err(PlaceError::InvalidSlot(board_slot));
        }
        if self.entries[board_slot].is_some() {
            return Err(PlaceError::AlreadyOccupied(board_slot));
        }
        self.entries[board_slot] = Some(piece_slot);
        Ok(())
    }

    /// Remove and return the piece at an occupied board slot.
    pub fn clear(&mut self, board_slot: usize) -> Result<usize, ClearError> {
        if !self.is_populated(board_slot) {
            return Err(ClearError::InvalidSlot(board_slot));
        }
        self.entries[board_slot]
            .take()
            .ok_or(ClearError::AlreadyEmpty(board_slot))
    }

    /// Empty every slot, returning all pieces to the unplaced pool.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
    }

    /// Win condition: every populated slot holds the piece derived from it.
    ///
    /// Any unfilled populated slot or any mismatched piece fails; there is
    /// no partial-credit state.
    pub fn is_identity(&self) -> bool {
        self.populated_slots()
            .all(|slot| self.entries[slot] == Some(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_slot_board() -> PlacementBoard {
        PlacementBoard::new(31, [0, 1, 2])
    }

    #[test]
    fn test_place_and_clear_restore_board() {
        let mut board = three_slot_board();
        let before = board.clone();

        board.place(1, 2).unwrap();
        assert_eq!(board.piece_at(1), Some(2));
        assert!(board.is_piece_placed(2));

        let piece = board.clear(1).unwrap();
        assert_eq!(piece, 2);
        assert_eq!(board.piece_at(1), None);
        assert_eq!(board.entries, before.entries);
    }

    #[test]
    fn test_place_on_occupied_slot_is_rejected_unchanged() {
        let mut board = three_slot_board();
        board.place(0, 1).unwrap();

        let err = board.place(0, 2).unwrap_err();
        assert_eq!(err, PlaceError::AlreadyOccupied(0));
        assert_eq!(board.piece_at(0), Some(1), "failed place must not mutate");
        assert!(!board.is_piece_placed(2));
    }

    #[test]
    fn test_clear_on_empty_slot_is_rejected() {
        let mut board = three_slot_board();
        assert_eq!(board.clear(2), Err(ClearError::AlreadyEmpty(2)));
    }

    #[test]
    fn test_unpopulated_slots_reject_operations() {
        let mut board = three_slot_board();
        assert_eq!(board.place(5, 0), Err(PlaceError::InvalidSlot(5)));
        assert_eq!(board.clear(5), Err(ClearError::InvalidSlot(5)));
        assert_eq!(board.place(31, 0), Err(PlaceError::InvalidSlot(31)));
    }

    #[test]
    fn test_reset_empties_every_slot() {
        let mut board = three_slot_board();
        board.place(0, 0).unwrap();
        board.place(1, 2).unwrap();
        board.reset();

        assert_eq!(board.placed_count(), 0);
        assert!(!board.is_piece_placed(0));
        assert!(!board.is_piece_placed(2));
    }

    #[test]
    fn test_identity_truth_table() {
        // board = {0:0, 1:1, 2:2} -> won
        let mut board = three_slot_board();
        board.place(0, 0).unwrap();
        board.place(1, 1).unwrap();
        board.place(2, 2).unwrap();
        assert!(board.is_identity());

        // board = {0:0, 1:2, 2:1} -> not won
        let mut board = three_slot_board();
        board.place(0, 0).unwrap();
        board.place(1, 2).unwrap();
        board.place(2, 1).unwrap();
        assert!(!board.is_identity());

        // board = {0:0, 1:1} with slot 2 empty -> not won
        let mut board = three_slot_board();
        board.place(0, 0).unwrap();
        board.place(1, 1).unwrap();
        assert!(!board.is_identity());
    }

    #[test]
    fn test_empty_board_of_empty_tree_is_trivially_identity() {
        let board = PlacementBoard::new(31, []);
        assert!(board.is_identity());
    }
}
