use serde::{Deserialize, Serialize};

/// Difficulty level of a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of nodes in a puzzle of this difficulty
    pub fn node_count(&self) -> usize {
        match self {
            Difficulty::Easy => 11,
            Difficulty::Medium => 17,
            Difficulty::Hard => 23,
        }
    }

    /// Get all difficulty levels
    pub fn all_levels() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// A detached copy of one node's value and structural slot.
///
/// Pieces are what the player shuffles and places; they never reference the
/// live tree, so placement cannot mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzlePiece {
    /// The node value shown on the piece
    pub value: u8,
    /// The structural slot the piece was derived from
    pub original_slot: usize,
}

impl PuzzlePiece {
    pub fn new(value: u8, original_slot: usize) -> Self {
        Self {
            value,
            original_slot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_counts() {
        assert_eq!(Difficulty::Easy.node_count(), 11);
        assert_eq!(Difficulty::Medium.node_count(), 17);
        assert_eq!(Difficulty::Hard.node_count(), 23);
    }

    #[test]
    fn test_difficulty_serializes_by_name() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"Medium\"");
    }

    #[test]
    fn test_all_levels_ordering() {
        let levels = Difficulty::all_levels();
        assert_eq!(levels.len(), 3);
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
    }
}
