//! Ranked result sets.
//!
//! A `Matches` is produced by one search and shares ownership of the trie it
//! was drawn from, so selection feedback can never dangle. Each `Match`
//! carries the path that identifies its node; `select` re-resolves the path
//! against the live trie, so entries removed after the search degrade to a
//! logged no-op instead of touching the wrong node.

use std::sync::{Arc, PoisonError, RwLock};

use crate::dict::node::Node;
use crate::score::Score;
use crate::settings::settings;

#[derive(Debug, Clone)]
pub struct Match<T> {
    path: Vec<String>,
    userdata: T,
    score: Score,
    echelon: u32,
    select_count: u32,
}

impl<T> Match<T> {
    pub(crate) fn new(
        path: Vec<String>,
        userdata: T,
        score: Score,
        echelon: u32,
        select_count: u32,
    ) -> Self {
        Self {
            path,
            userdata,
            score,
            echelon,
            select_count,
        }
    }

    /// Segments leading from the root to the matched node.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn userdata(&self) -> &T {
        &self.userdata
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn echelon(&self) -> u32 {
        self.echelon
    }

    /// Selection count captured at search time.
    pub fn select_count(&self) -> u32 {
        self.select_count
    }
}

pub struct Matches<T> {
    root: Arc<RwLock<Node<T>>>,
    hits: Vec<Match<T>>,
}

impl<T: Clone> Clone for Matches<T> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            hits: self.hits.clone(),
        }
    }
}

impl<T> Matches<T> {
    pub(crate) fn from_hits(root: Arc<RwLock<Node<T>>>, hits: Vec<Match<T>>) -> Self {
        Self { root, hits }
    }

    /// Rank by echelon, then selection count, then score, all descending.
    /// The sort is stable; ties beyond the composite key keep trie order.
    pub(crate) fn sort(&mut self) {
        self.hits.sort_by(|a, b| {
            b.echelon
                .cmp(&a.echelon)
                .then_with(|| b.select_count.cmp(&a.select_count))
                .then_with(|| b.score.cmp(&a.score))
        });
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Match<T>> {
        self.hits.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match<T>> {
        self.hits.iter()
    }

    /// Userdata of the match at `index`, or `None` with a diagnostic when
    /// out of range.
    pub fn userdata(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        match self.hits.get(index) {
            Some(m) => Some(m.userdata.clone()),
            None => {
                tracing::warn!(
                    index,
                    size = self.hits.len(),
                    "Matches::userdata: index out of range"
                );
                None
            }
        }
    }

    /// Copy userdatas in rank order into `out`; returns the count copied.
    pub fn userdatas_into(&self, out: &mut [T]) -> usize
    where
        T: Clone,
    {
        let count = out.len().min(self.hits.len());
        for (slot, m) in out.iter_mut().zip(&self.hits) {
            *slot = m.userdata.clone();
        }
        count
    }

    /// Record that the user picked the match at `index`, bumping the node's
    /// selection count so it ranks higher next time.
    pub fn select(&self, index: usize) {
        let Some(m) = self.hits.get(index) else {
            tracing::warn!(
                index,
                size = self.hits.len(),
                "Matches::select: index out of range"
            );
            return;
        };
        let mut root = self.root.write().unwrap_or_else(PoisonError::into_inner);
        match root.node_at_mut(&m.path) {
            Some(node) => node.inc_select_count(),
            None => tracing::warn!(
                path = ?m.path,
                "Matches::select: node no longer in dictionary"
            ),
        }
    }

    /// Truncate to at most `count` entries.
    pub fn keep_first(&mut self, count: usize) {
        self.hits.truncate(count);
    }

    /// Log the top entries at debug level, capped by
    /// `settings().search.dump_limit`.
    pub fn dump(&self) {
        for (index, m) in self.hits.iter().take(settings().search.dump_limit).enumerate() {
            tracing::debug!(
                index,
                points = m.score.points,
                penalty = m.score.penalty,
                echelon = m.echelon,
                select_count = m.select_count,
                path = ?m.path,
                "match"
            );
        }
    }
}

impl<'a, T> IntoIterator for &'a Matches<T> {
    type Item = &'a Match<T>;
    type IntoIter = std::slice::Iter<'a, Match<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn empty_root() -> Arc<RwLock<Node<u32>>> {
        Arc::new(RwLock::new(Node::new(None, 0, 0)))
    }

    fn match_with(key: (u32, u32, u64, u64), userdata: u32) -> Match<u32> {
        Match::new(
            vec!["seg".to_string()],
            userdata,
            Score::new(key.2, key.3),
            key.0,
            key.1,
        )
    }

    fn matches_of(keys: &[(u32, u32, u64, u64)]) -> Matches<u32> {
        let hits = keys
            .iter()
            .enumerate()
            .map(|(i, &key)| match_with(key, i as u32 + 1))
            .collect();
        Matches::from_hits(empty_root(), hits)
    }

    #[test]
    fn test_sort_echelon_first() {
        let mut matches = matches_of(&[(0, 9, 100, 0), (1, 0, 1, 50)]);
        matches.sort();
        assert_eq!(*matches.get(0).unwrap().userdata(), 2);
    }

    #[test]
    fn test_sort_select_count_breaks_echelon_tie() {
        let mut matches = matches_of(&[(1, 0, 100, 0), (1, 3, 1, 50)]);
        matches.sort();
        assert_eq!(*matches.get(0).unwrap().userdata(), 2);
    }

    #[test]
    fn test_sort_score_breaks_remaining_tie() {
        let mut matches = matches_of(&[(1, 1, 9, 13), (1, 1, 17, 14), (1, 1, 17, 2)]);
        matches.sort();
        let order: Vec<u32> = matches.iter().map(|m| *m.userdata()).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_keep_first() {
        let mut matches = matches_of(&[
            (0, 0, 0, 0),
            (0, 0, 1, 0),
            (0, 0, 2, 0),
            (0, 0, 3, 0),
            (0, 0, 4, 0),
        ]);
        matches.keep_first(2);
        assert_eq!(matches.len(), 2);
        // Larger than size is a no-op.
        matches.keep_first(10);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_userdata_out_of_range() {
        let matches = matches_of(&[]);
        assert_eq!(matches.userdata(0), None);
    }

    #[test]
    fn test_userdatas_into_partial_buffer() {
        let mut matches = matches_of(&[
            (0, 0, 10, 0),
            (0, 0, 9, 0),
            (0, 0, 8, 0),
            (0, 0, 7, 0),
        ]);
        matches.sort();
        let mut out = [0u32; 2];
        assert_eq!(matches.userdatas_into(&mut out), 2);
        assert_eq!(out, [1, 2]);

        let mut wide = [99u32; 8];
        assert_eq!(matches.userdatas_into(&mut wide), 4);
        assert_eq!(&wide[..4], &[1, 2, 3, 4]);
        assert_eq!(wide[4], 99);
    }

    #[test]
    fn test_select_out_of_range_is_noop() {
        let matches = matches_of(&[]);
        matches.select(3);
    }

    #[test]
    fn test_dump_populated_set() {
        let mut matches = matches_of(&[(1, 0, 9, 1), (0, 2, 4, 2), (0, 0, 1, 30)]);
        matches.sort();
        matches.dump();
        // Also fine on more entries than the dump limit shows.
        let mut big = matches_of(&vec![(0, 0, 1, 1); 40]);
        big.sort();
        big.dump();
    }

    proptest! {
        #[test]
        fn prop_sorted_keys_descending(
            keys in proptest::collection::vec(
                (0..4u32, 0..4u32, 0..50u64, 0..50u64),
                0..24
            )
        ) {
            let mut matches = matches_of(&keys);
            matches.sort();
            for pair in matches.hits.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let a_key = (a.echelon(), a.select_count(), a.score());
                let b_key = (b.echelon(), b.select_count(), b.score());
                prop_assert!(a_key >= b_key);
            }
        }
    }
}
