use crate::error::GenerateError;
use crate::slot_capacity;
use crate::tree::Tree;
use crate::types::{Difficulty, PuzzlePiece};
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_VALUE_BOUND};
use tracing::{debug, trace};

/// Configuration for puzzle generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of nodes in the generated tree
    pub node_count: usize,
    /// Maximum allowed node depth; deeper trees are discarded and rebuilt
    pub max_depth: usize,
    /// Upper bound (inclusive) of the value domain `[1, value_bound]`
    pub value_bound: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::medium()
    }
}

impl GeneratorConfig {
    pub fn easy() -> Self {
        Self::for_difficulty(Difficulty::Easy)
    }

    pub fn medium() -> Self {
        Self::for_difficulty(Difficulty::Medium)
    }

    pub fn hard() -> Self {
        Self::for_difficulty(Difficulty::Hard)
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            node_count: difficulty.node_count(),
            max_depth: DEFAULT_MAX_DEPTH,
            value_bound: DEFAULT_VALUE_BOUND,
        }
    }
}

/// Puzzle generator: unique values, depth-bounded tree, shuffled pieces.
pub struct Generator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Generate a puzzle with the configured difficulty
    pub fn generate(
        &mut self,
        difficulty: Difficulty,
    ) -> Result<(Tree, Vec<PuzzlePiece>), GenerateError> {
        self.config = GeneratorConfig::for_difficulty(difficulty);
        self.generate_with_config()
    }

    /// Generate a puzzle with the current configuration.
    ///
    /// Construction is rejection-sampled: a fresh value sequence and tree
    /// are built from scratch until the depth bound holds. The loop has no
    /// iteration cap; the bound is a hard invariant of the output, so there
    /// is no fallback acceptance.
    pub fn generate_with_config(&mut self) -> Result<(Tree, Vec<PuzzlePiece>), GenerateError> {
        let GeneratorConfig {
            node_count,
            max_depth,
            value_bound,
        } = self.config.clone();

        if node_count > value_bound as usize {
            return Err(GenerateError::ConstraintUnsatisfiable {
                requested: node_count,
                bound: value_bound as usize,
            });
        }
        let capacity = slot_capacity(max_depth);
        if node_count > capacity {
            return Err(GenerateError::DepthUnsatisfiable {
                requested: node_count,
                max_depth,
                capacity,
            });
        }

        let mut attempts = 0usize;
        let mut tree = loop {
            attempts += 1;
            let values = self.unique_values(node_count, value_bound);
            let tree = Tree::from_values(&values);
            match tree.max_depth() {
                Some(depth) if depth > max_depth => {
                    trace!(attempts, depth, max_depth, "depth bound exceeded, rebuilding");
                }
                _ => break tree,
            }
        };

        tree.assign_slots();
        let pieces = self.shuffled_pieces(&tree);
        debug!(
            attempts,
            nodes = tree.node_count(),
            "generated depth-bounded puzzle"
        );
        Ok((tree, pieces))
    }

    /// Draw `count` distinct values uniformly from `[1, bound]`.
    ///
    /// Sequence order matters: it drives BST insertion order downstream.
    fn unique_values(&mut self, count: usize, bound: u8) -> Vec<u8> {
        let mut values = Vec::with_capacity(count);
        while values.len() < count {
            let candidate = (self.rng.next_usize(bound as usize) + 1) as u8;
            if !values.contains(&candidate) {
                values.push(candidate);
            }
        }
        values
    }

    /// Derive one piece per node, in uniformly random order.
    ///
    /// Rejection-based permutation: draw positions into the pre-order node
    /// list until every position has been taken once. Every ordering of the
    /// n pieces is equally likely.
    fn shuffled_pieces(&mut self, tree: &Tree) -> Vec<PuzzlePiece> {
        let nodes = tree.nodes();
        let n = nodes.len();
        let mut taken = vec![false; n];
        let mut pieces = Vec::with_capacity(n);
        while pieces.len() < n {
            let pos = self.rng.next_usize(n);
            if !taken[pos] {
                taken[pos] = true;
                pieces.push(PuzzlePiece::new(nodes[pos].value(), nodes[pos].slot()));
            }
        }
        pieces
    }
}

/// Simple PRNG for no-std compatibility
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        // Use getrandom for WASM-compatible random seeding
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        let seed = u64::from_le_bytes(seed_bytes);
        Self::with_seed(seed)
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // PCG-like PRNG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generate_easy_counts() {
        let mut generator = Generator::with_seed(42);
        let (tree, pieces) = generator.generate(Difficulty::Easy).unwrap();

        assert_eq!(tree.node_count(), 11);
        assert_eq!(pieces.len(), 11);

        let mut values: Vec<u8> = pieces.iter().map(|p| p.value).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), 11, "piece values must be distinct");
    }

    #[test]
    fn test_generated_trees_respect_invariants() {
        let mut generator = Generator::with_seed(7);
        for difficulty in Difficulty::all_levels() {
            for _ in 0..10 {
                let (tree, pieces) = generator.generate(*difficulty).unwrap();

                assert!(tree.max_depth().unwrap() <= DEFAULT_MAX_DEPTH);
                assert_eq!(tree.node_count(), difficulty.node_count());
                assert_eq!(pieces.len(), difficulty.node_count());

                let in_order = tree.in_order_values();
                let mut sorted = in_order.clone();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(in_order, sorted, "BST ordering or uniqueness broken");
                assert!(in_order.iter().all(|&v| (1..=100).contains(&v)));
            }
        }
    }

    #[test]
    fn test_pieces_mirror_tree_slots() {
        let mut generator = Generator::with_seed(11);
        let (tree, pieces) = generator.generate(Difficulty::Medium).unwrap();

        let mut tree_slots: Vec<(usize, u8)> =
            tree.nodes().iter().map(|n| (n.slot(), n.value())).collect();
        let mut piece_slots: Vec<(usize, u8)> =
            pieces.iter().map(|p| (p.original_slot, p.value)).collect();
        tree_slots.sort_unstable();
        piece_slots.sort_unstable();
        assert_eq!(tree_slots, piece_slots);
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let mut a = Generator::with_seed(1234);
        let mut b = Generator::with_seed(1234);
        let (tree_a, pieces_a) = a.generate(Difficulty::Hard).unwrap();
        let (tree_b, pieces_b) = b.generate(Difficulty::Hard).unwrap();

        assert_eq!(tree_a.in_order_values(), tree_b.in_order_values());
        assert_eq!(pieces_a, pieces_b);
    }

    #[test]
    fn test_constraint_unsatisfiable() {
        let mut generator = Generator::with_config(GeneratorConfig {
            node_count: 12,
            max_depth: 4,
            value_bound: 10,
        });
        assert_eq!(
            generator.generate_with_config(),
            Err(GenerateError::ConstraintUnsatisfiable {
                requested: 12,
                bound: 10,
            })
        );
    }

    #[test]
    fn test_depth_unsatisfiable() {
        let mut generator = Generator::with_config(GeneratorConfig {
            node_count: 32,
            max_depth: 4,
            value_bound: 100,
        });
        assert_eq!(
            generator.generate_with_config(),
            Err(GenerateError::DepthUnsatisfiable {
                requested: 32,
                max_depth: 4,
                capacity: 31,
            })
        );
    }

    #[test]
    fn test_zero_and_single_node_puzzles() {
        let mut generator = Generator::with_config(GeneratorConfig {
            node_count: 0,
            max_depth: 4,
            value_bound: 100,
        });
        let (tree, pieces) = generator.generate_with_config().unwrap();
        assert!(tree.is_empty());
        assert!(pieces.is_empty());

        generator.config.node_count = 1;
        let (tree, pieces) = generator.generate_with_config().unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].original_slot, 0);
    }

    /// Frequency test over all 3! orderings of a 3-node puzzle. With 600
    /// samples each ordering has mean 100 and standard deviation ~9, so the
    /// 50..150 window only trips on a badly biased shuffle.
    #[test]
    fn test_shuffle_is_approximately_uniform() {
        let mut generator = Generator::with_seed(99);
        generator.config = GeneratorConfig {
            node_count: 3,
            max_depth: 4,
            value_bound: 100,
        };

        let mut counts: HashMap<[usize; 3], usize> = HashMap::new();
        for _ in 0..600 {
            let (_, pieces) = generator.generate_with_config().unwrap();

            // Rank each piece's value within the puzzle to name the ordering
            let mut sorted: Vec<u8> = pieces.iter().map(|p| p.value).collect();
            sorted.sort_unstable();
            let mut perm = [0usize; 3];
            for (i, piece) in pieces.iter().enumerate() {
                perm[i] = sorted.iter().position(|&v| v == piece.value).unwrap();
            }
            *counts.entry(perm).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 6, "every ordering should occur");
        for (perm, count) in &counts {
            assert!(
                (50..=150).contains(count),
                "ordering {:?} occurred {} times",
                perm,
                count
            );
        }
    }
}
