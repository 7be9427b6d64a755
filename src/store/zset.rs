use std::cmp::Ordering;
use std::collections::HashMap;

use super::resolve_range;

/// An ordered-by-(score, member) sequence plus a member-to-score index, kept
/// consistent with each other at all times. Insertion binary-searches for the
/// slot and shifts in place; fine at the scale this store targets, a balanced
/// tree would be the upgrade path if it ever is not.
///
/// Mutated only while the outer store lock is held, so there is no locking
/// here.
pub struct SortedSet {
    entries: Vec<ZEntry>,
    index: HashMap<String, f64>,
}

struct ZEntry {
    member: String,
    score: f64,
}

impl SortedSet {
    pub fn new() -> SortedSet {
        SortedSet {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or re-scores `member`. Returns true when the member is new or
    /// its score changed, false when the score was already exactly `score`.
    pub fn insert(&mut self, member: String, score: f64) -> bool {
        if let Some(&old) = self.index.get(&member) {
            if old == score {
                return false;
            }
            // Re-insert to keep the sequence ordering correct.
            self.remove(&member);
        }

        let at = self.entries.partition_point(|entry| {
            match entry.score.total_cmp(&score) {
                Ordering::Less => true,
                Ordering::Equal => entry.member < member,
                Ordering::Greater => false,
            }
        });
        self.index.insert(member.clone(), score);
        self.entries.insert(at, ZEntry { member, score });
        true
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.index.get(member).copied()
    }

    /// Removes `member` from both the sequence and the index. Returns whether
    /// it was present.
    pub fn remove(&mut self, member: &str) -> bool {
        if self.index.remove(member).is_none() {
            return false;
        }
        if let Some(at) = self.entries.iter().position(|entry| entry.member == member) {
            self.entries.remove(at);
        }
        true
    }

    /// Members with their scores, in rank order, between `start` and `stop`
    /// inclusive with Redis-style negative index resolution.
    pub fn range(&self, start: i64, stop: i64) -> Vec<(String, f64)> {
        match resolve_range(self.entries.len(), start, stop) {
            None => Vec::new(),
            Some((start, stop)) => self.entries[start..=stop]
                .iter()
                .map(|entry| (entry.member.clone(), entry.score))
                .collect(),
        }
    }
}

impl Default for SortedSet {
    fn default() -> Self {
        Self::new()
    }
}
