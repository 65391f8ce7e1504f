use super::loader::StaticResolver;
use super::model::{ProblemRecord, Snapshot};

/// (title, difficulty, topics, base acceptance)
const CATALOGUE: &[(&str, &str, &str, f64)] = &[
    ("Two Sum", "EASY", "Array, Hash Table", 0.55),
    ("Valid Parentheses", "EASY", "String, Stack", 0.42),
    ("Merge Two Sorted Lists", "EASY", "Linked List, Recursion", 0.66),
    ("Best Time to Buy and Sell Stock", "EASY", "Array, Dynamic Programming", 0.54),
    ("Valid Anagram", "EASY", "Hash Table, String, Sorting", 0.65),
    ("Binary Search", "EASY", "Array, Binary Search", 0.58),
    ("Climbing Stairs", "EASY", "Math, Dynamic Programming, Memoization", 0.53),
    (
        "Invert Binary Tree",
        "EASY",
        "Tree, Depth-First Search, Breadth-First Search, Binary Tree",
        0.78,
    ),
    (
        "Longest Substring Without Repeating Characters",
        "MEDIUM",
        "Hash Table, String, Sliding Window",
        0.36,
    ),
    ("Merge Intervals", "MEDIUM", "Array, Sorting", 0.48),
    ("Group Anagrams", "MEDIUM", "Array, Hash Table, String, Sorting", 0.69),
    (
        "Top K Frequent Elements",
        "MEDIUM",
        "Array, Hash Table, Divide and Conquer, Sorting, Heap (Priority Queue), Bucket Sort, Counting, Quickselect",
        0.63,
    ),
    ("Product of Array Except Self", "MEDIUM", "Array, Prefix Sum", 0.66),
    (
        "Number of Islands",
        "MEDIUM",
        "Array, Depth-First Search, Breadth-First Search, Union Find, Matrix",
        0.60,
    ),
    ("LRU Cache", "MEDIUM", "Hash Table, Linked List, Design, Doubly-Linked List", 0.43),
    (
        "Course Schedule",
        "MEDIUM",
        "Depth-First Search, Breadth-First Search, Graph, Topological Sort",
        0.48,
    ),
    ("Coin Change", "MEDIUM", "Array, Dynamic Programming, Breadth-First Search", 0.44),
    ("Search in Rotated Sorted Array", "MEDIUM", "Array, Binary Search", 0.41),
    (
        "Meeting Rooms II",
        "MEDIUM",
        "Array, Two Pointers, Greedy, Sorting, Heap (Priority Queue), Prefix Sum",
        0.51,
    ),
    ("Word Search", "MEDIUM", "Array, String, Backtracking, Depth-First Search, Matrix", 0.43),
    (
        "Trapping Rain Water",
        "HARD",
        "Array, Two Pointers, Dynamic Programming, Stack, Monotonic Stack",
        0.63,
    ),
    ("Median of Two Sorted Arrays", "HARD", "Array, Binary Search, Divide and Conquer", 0.41),
    (
        "Merge k Sorted Lists",
        "HARD",
        "Linked List, Divide and Conquer, Heap (Priority Queue), Merge Sort",
        0.54,
    ),
    ("Word Ladder", "HARD", "Hash Table, String, Breadth-First Search", 0.41),
    ("Minimum Window Substring", "HARD", "Hash Table, String, Sliding Window", 0.44),
    (
        "Serialize and Deserialize Binary Tree",
        "HARD",
        "String, Tree, Depth-First Search, Breadth-First Search, Design, Binary Tree",
        0.58,
    ),
];

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn slug(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Deterministic demo records for one snapshot.
///
/// Shorter windows see a subset of the catalogue; longer windows see more
/// problems with flatter frequencies.
pub fn generate_snapshot(snapshot: Snapshot) -> Vec<ProblemRecord> {
    let (seed, keep, spread) = match snapshot {
        Snapshot::ThirtyDays => (30, 0.55, 100.0),
        Snapshot::ThreeMonths => (90, 0.8, 80.0),
        Snapshot::SixMonths => (180, 1.0, 65.0),
    };
    let mut rng = SimpleRng::new(seed);

    CATALOGUE
        .iter()
        .filter_map(|&(title, difficulty, topics, acceptance)| {
            let roll = rng.next_f64();
            let frequency = (rng.next_f64() * spread * 10.0).round() / 10.0;
            let jitter = (rng.next_f64() - 0.5) * 0.04;
            if roll >= keep {
                return None;
            }
            Some(ProblemRecord {
                title: title.to_string(),
                difficulty: difficulty.to_string(),
                frequency,
                acceptance_rate: ((acceptance + jitter) * 1000.0).round() / 1000.0,
                topics: topics.to_string(),
                link: format!("https://leetcode.com/problems/{}", slug(title)),
            })
        })
        .collect()
}

/// All three demo snapshots behind an in-memory resolver.
pub fn demo_resolver() -> StaticResolver {
    Snapshot::ALL
        .into_iter()
        .fold(StaticResolver::new(), |resolver, snapshot| {
            resolver.with_snapshot(snapshot, generate_snapshot(snapshot))
        })
}
