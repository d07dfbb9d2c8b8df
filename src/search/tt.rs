//! Transposition table for caching search results
//!
//! The table stores negamax results indexed by position hash. It is
//! lock-free so root-parallel workers can share it through `&self`.
//!
//! An entry is only reused at exactly the remaining depth it was computed
//! for. Shallower and deeper results are ignored, which keeps every search
//! returning the same score with the table enabled or disabled.
//!
//! # Example
//!
//! ```
//! use othello::board::Pos;
//! use othello::search::{EntryType, TranspositionTable};
//!
//! let tt = TranspositionTable::new(1); // 1 MB
//!
//! let hash = 0x1234_5678_9ABC_DEF0;
//! tt.store(hash, 5, 100, EntryType::Exact, Some(Pos::new(2, 3)));
//!
//! assert_eq!(tt.probe(hash, 5, -1000, 1000), Some(100));
//! assert_eq!(tt.probe(hash, 4, -1000, 1000), None);
//! assert_eq!(tt.best_move(hash), Some(Pos::new(2, 3)));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::Pos;

/// Entry type for score interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Exact score - the search completed inside the window
    Exact,
    /// Lower bound - score >= stored value (beta cutoff)
    LowerBound,
    /// Upper bound - score <= stored value (alpha fail-low)
    UpperBound,
}

/// Unpacked transposition table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: i8,
    pub score: i32,
    pub entry_type: EntryType,
    pub best_move: Option<Pos>,
}

const SCORE_BITS: u32 = 24;
const SCORE_OFFSET: i64 = 1 << (SCORE_BITS - 1);
const SCORE_MASK: u64 = (1 << SCORE_BITS) - 1;

/// Pack an entry into a u64 for atomic storage.
///
/// Layout (43 bits used):
/// ```text
/// bits [0..7]   depth (i8 -> u8: +128 offset)       8 bits
/// bits [8..31]  score (i32 -> u24: +8_388_608)     24 bits
/// bits [32..33] entry_type (0=Exact,1=LB,2=UB)      2 bits
/// bits [34]     has_move                            1 bit
/// bits [35..38] row                                 4 bits
/// bits [39..42] col                                 4 bits
/// ```
#[allow(clippy::cast_sign_loss)]
fn pack_entry(entry: &TTEntry) -> u64 {
    let d = (i16::from(entry.depth) + 128) as u64 & 0xFF;
    let clamped = i64::from(entry.score).clamp(-SCORE_OFFSET + 1, SCORE_OFFSET - 1);
    let s = (clamped + SCORE_OFFSET) as u64 & SCORE_MASK;
    let t = match entry.entry_type {
        EntryType::Exact => 0u64,
        EntryType::LowerBound => 1u64,
        EntryType::UpperBound => 2u64,
    };
    let (has_move, row, col) = match entry.best_move {
        Some(p) => (1u64, u64::from(p.row), u64::from(p.col)),
        None => (0, 0, 0),
    };
    d | (s << 8) | (t << 32) | (has_move << 34) | ((row & 0xF) << 35) | ((col & 0xF) << 39)
}

/// Unpack a u64 back into an entry. Returns `None` for bit patterns no
/// call to [`pack_entry`] can produce.
#[allow(clippy::cast_possible_truncation)]
fn unpack_entry(data: u64) -> Option<TTEntry> {
    if data >> 43 != 0 {
        return None;
    }
    let depth = ((data & 0xFF) as i16 - 128) as i8;
    let score = (((data >> 8) & SCORE_MASK) as i64 - SCORE_OFFSET) as i32;
    let entry_type = match (data >> 32) & 0x3 {
        0 => EntryType::Exact,
        1 => EntryType::LowerBound,
        2 => EntryType::UpperBound,
        _ => return None,
    };
    let best_move = if (data >> 34) & 1 != 0 {
        Some(Pos::new(((data >> 35) & 0xF) as u8, ((data >> 39) & 0xF) as u8))
    } else {
        None
    };
    Some(TTEntry {
        depth,
        score,
        entry_type,
        best_move,
    })
}

/// Lock-free transposition table.
///
/// Uses the XOR trick (Hyatt 1994): each slot stores `(key, data)` where
/// `key = hash ^ data`. On probe, validity is checked via `key ^ data == hash`.
/// Torn reads from concurrent writers fail the check and count as misses.
pub struct TranspositionTable {
    keys: Vec<AtomicU64>,
    data: Vec<AtomicU64>,
    size: usize,
}

impl TranspositionTable {
    /// Create a table with the given size in megabytes (at least 1024 slots).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        // Each slot = 2 x AtomicU64 = 16 bytes
        let slot_size = 16usize;
        let size = ((size_mb * 1024 * 1024) / slot_size).max(1024);

        let keys = (0..size).map(|_| AtomicU64::new(0)).collect();
        let data = (0..size).map(|_| AtomicU64::new(0)).collect();

        Self { keys, data, size }
    }

    /// Number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.size
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn index(&self, hash: u64) -> usize {
        (hash % self.size as u64) as usize
    }

    /// Read and verify the entry for `hash`
    fn load(&self, hash: u64) -> Option<TTEntry> {
        let idx = self.index(hash);
        let key = self.keys[idx].load(Ordering::Relaxed);
        let raw = self.data[idx].load(Ordering::Relaxed);

        if key == 0 && raw == 0 {
            return None;
        }
        // Torn or foreign entry
        if key ^ raw != hash {
            return None;
        }
        unpack_entry(raw)
    }

    /// Probe the table for a usable score.
    ///
    /// The stored depth must equal `depth`. Exact entries are always usable;
    /// bounds only when they fall outside the `(alpha, beta)` window.
    #[must_use]
    pub fn probe(&self, hash: u64, depth: i8, alpha: i32, beta: i32) -> Option<i32> {
        let entry = self.load(hash)?;
        if entry.depth != depth {
            return None;
        }
        match entry.entry_type {
            EntryType::Exact => Some(entry.score),
            EntryType::LowerBound if entry.score >= beta => Some(entry.score),
            EntryType::UpperBound if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    /// Best move stored for `hash`, at any depth. Only used for ordering.
    #[must_use]
    pub fn best_move(&self, hash: u64) -> Option<Pos> {
        self.load(hash).and_then(|e| e.best_move)
    }

    /// Store a result (`&self`, safe under concurrent access).
    ///
    /// Depth-preferred replacement: a slot holding a different position is
    /// only overwritten by a result at least as deep.
    pub fn store(
        &self,
        hash: u64,
        depth: i8,
        score: i32,
        entry_type: EntryType,
        best_move: Option<Pos>,
    ) {
        let idx = self.index(hash);

        let existing_key = self.keys[idx].load(Ordering::Relaxed);
        let existing_data = self.data[idx].load(Ordering::Relaxed);
        if existing_key != 0 || existing_data != 0 {
            if let Some(existing) = unpack_entry(existing_data) {
                if existing_key ^ existing_data != hash && depth < existing.depth {
                    return;
                }
            }
        }

        let packed = pack_entry(&TTEntry {
            depth,
            score,
            entry_type,
            best_move,
        });
        // Data first, then key: a concurrent reader either sees a matching
        // pair or fails the hash check.
        self.data[idx].store(packed, Ordering::Relaxed);
        self.keys[idx].store(hash ^ packed, Ordering::Relaxed);
    }

    /// Clear all entries
    pub fn clear(&self) {
        for i in 0..self.size {
            self.keys[i].store(0, Ordering::Relaxed);
            self.data[i].store(0, Ordering::Relaxed);
        }
    }

    /// Approximate usage statistics
    #[must_use]
    pub fn stats(&self) -> TTStats {
        // Sample every 64th slot on large tables
        let step = if self.size > 65536 { 64 } else { 1 };
        let mut used = 0usize;
        let mut sampled = 0usize;
        for i in (0..self.size).step_by(step) {
            sampled += 1;
            let k = self.keys[i].load(Ordering::Relaxed);
            let d = self.data[i].load(Ordering::Relaxed);
            if k != 0 || d != 0 {
                used += 1;
            }
        }
        let used = if step > 1 {
            used * self.size / sampled
        } else {
            used
        };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        TTStats {
            size: self.size,
            used,
            usage_percent: (used as f64 / self.size as f64 * 100.0) as u8,
        }
    }
}

/// Statistics about transposition table usage.
#[derive(Debug, Clone, Copy)]
pub struct TTStats {
    /// Total number of slots in the table
    pub size: usize,
    /// Number of slots currently occupied
    pub used: usize,
    /// Percentage of table in use (0-100)
    pub usage_percent: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const HASH: u64 = 0x1234_5678_9ABC_DEF0;

    #[test]
    fn test_tt_store_probe_exact() {
        let tt = TranspositionTable::new(1);
        tt.store(HASH, 5, 100, EntryType::Exact, Some(Pos::new(2, 3)));

        assert_eq!(tt.probe(HASH, 5, -1000, 1000), Some(100));
        assert_eq!(tt.best_move(HASH), Some(Pos::new(2, 3)));
    }

    #[test]
    fn test_tt_depth_must_match() {
        let tt = TranspositionTable::new(1);
        tt.store(HASH, 3, 100, EntryType::Exact, Some(Pos::new(5, 5)));

        // Neither a deeper nor a shallower probe may use the score
        assert_eq!(tt.probe(HASH, 5, -1000, 1000), None);
        assert_eq!(tt.probe(HASH, 2, -1000, 1000), None);
        // The move is still there for ordering
        assert_eq!(tt.best_move(HASH), Some(Pos::new(5, 5)));
    }

    #[test]
    fn test_tt_lower_bound_cutoff() {
        let tt = TranspositionTable::new(1);
        tt.store(HASH, 5, 200, EntryType::LowerBound, None);

        assert_eq!(tt.probe(HASH, 5, -1000, 150), Some(200));
        assert_eq!(tt.probe(HASH, 5, -1000, 300), None);
    }

    #[test]
    fn test_tt_upper_bound_cutoff() {
        let tt = TranspositionTable::new(1);
        tt.store(HASH, 5, 50, EntryType::UpperBound, None);

        assert_eq!(tt.probe(HASH, 5, 100, 1000), Some(50));
        assert_eq!(tt.probe(HASH, 5, 0, 1000), None);
    }

    #[test]
    fn test_tt_hash_mismatch() {
        let tt = TranspositionTable::new(1);
        tt.store(HASH, 5, 100, EntryType::Exact, None);
        // Same slot, different position
        let other = HASH + tt.capacity() as u64;
        assert_eq!(tt.probe(other, 5, -1000, 1000), None);
    }

    #[test]
    fn test_tt_replacement_policy() {
        let tt = TranspositionTable::new(1);
        let other = HASH + tt.capacity() as u64;

        tt.store(HASH, 5, 100, EntryType::Exact, None);
        // Shallower result for another position does not evict
        tt.store(other, 3, 7, EntryType::Exact, None);
        assert_eq!(tt.probe(HASH, 5, -1000, 1000), Some(100));

        // Deeper one does
        tt.store(other, 6, 7, EntryType::Exact, None);
        assert_eq!(tt.probe(HASH, 5, -1000, 1000), None);
        assert_eq!(tt.probe(other, 6, -1000, 1000), Some(7));

        // Same position always overwrites
        tt.store(other, 2, 9, EntryType::Exact, None);
        assert_eq!(tt.probe(other, 2, -1000, 1000), Some(9));
    }

    #[test]
    fn test_tt_terminal_scores_fit() {
        let tt = TranspositionTable::new(1);
        let win = 1_000_000 + 1_000 * 256;
        tt.store(HASH, -3, -win, EntryType::Exact, Some(Pos::new(15, 15)));
        assert_eq!(tt.probe(HASH, -3, -1, 1), Some(-win));
        assert_eq!(tt.best_move(HASH), Some(Pos::new(15, 15)));
    }

    #[test]
    fn test_corrupted_entry_is_a_miss() {
        let tt = TranspositionTable::new(1);
        let idx = tt.index(HASH);
        // Entry type 3 cannot be produced by pack_entry
        let bogus = 3u64 << 32;
        tt.data[idx].store(bogus, Ordering::Relaxed);
        tt.keys[idx].store(HASH ^ bogus, Ordering::Relaxed);
        assert_eq!(tt.probe(HASH, 0, -1000, 1000), None);
        assert_eq!(tt.best_move(HASH), None);
    }

    #[test]
    fn test_tt_clear_and_stats() {
        let tt = TranspositionTable::new(1);
        for i in 0..100u64 {
            tt.store(i * 7919 + 1, 1, 0, EntryType::Exact, None);
        }
        assert!(tt.stats().used > 0);
        tt.clear();
        assert_eq!(tt.stats().used, 0);
        assert_eq!(tt.probe(1, 1, -1, 1), None);
    }

    #[test]
    fn test_tt_minimum_size() {
        let tt = TranspositionTable::new(0);
        assert_eq!(tt.capacity(), 1024);
    }

    #[test]
    fn test_tt_concurrent_safety() {
        let tt = Arc::new(TranspositionTable::new(1));
        std::thread::scope(|s| {
            for t in 0..4u64 {
                let tt = Arc::clone(&tt);
                s.spawn(move || {
                    for i in 0..1000u64 {
                        let hash = (t << 32) | (i + 1);
                        tt.store(hash, 4, i32::try_from(i).unwrap_or(0), EntryType::Exact, None);
                        if let Some(score) = tt.probe(hash, 4, -1, 1) {
                            assert_eq!(i64::from(score), i64::try_from(i).unwrap_or(0));
                        }
                    }
                });
            }
        });
    }
}
