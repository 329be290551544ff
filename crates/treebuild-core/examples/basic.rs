//! Basic example of using the puzzle engine

use treebuild_core::{Difficulty, PlayerAction, PuzzleSession};

fn main() {
    // Start a session and generate a puzzle
    println!("Generating a Medium puzzle...\n");
    let mut session = PuzzleSession::new();
    session
        .new_puzzle(Difficulty::Medium)
        .expect("medium difficulty is always satisfiable");

    // Walk the tree the way a frontend would
    let tree = session.tree().expect("session is playing");
    println!("Tree ({} nodes, max depth {:?}):", tree.node_count(), tree.max_depth());
    for node in tree.nodes() {
        println!(
            "{:indent$}slot {:>2}  value {:>3}",
            "",
            node.slot(),
            node.value(),
            indent = node.depth() * 2
        );
    }

    // The player sees the values in shuffled order
    let pieces: Vec<_> = session.pieces().to_vec();
    print!("\nShuffled pieces:");
    for piece in &pieces {
        print!(" {}", piece.value);
    }
    println!();

    // Auto-solve: place every piece back into its original slot
    for piece in &pieces {
        session
            .apply(PlayerAction::Place {
                board_slot: piece.original_slot,
                piece: piece.original_slot,
            })
            .expect("placement actions cannot fail generation");
    }
    println!("\nSolved: {}", session.is_won());
}
