//! Reverse-greedy subsequence scoring.
//!
//! `rev_match` finds the best way to place a query fragment against the tail
//! of a single segment name. `score_match` chains it across a trail of
//! segment names, halving ancestor contributions so hits near the leaf
//! dominate. Comparison is byte-wise with ASCII case folding.

use crate::score::Score;

/// Largest `k` such that the last `k` bytes of `lhs` and `rhs` agree under
/// ASCII case folding.
fn common_suffix_length(lhs: &[u8], rhs: &[u8]) -> usize {
    let mut length = 0;
    while length < lhs.len()
        && length < rhs.len()
        && lhs[lhs.len() - length - 1].to_ascii_lowercase()
            == rhs[rhs.len() - length - 1].to_ascii_lowercase()
    {
        length += 1;
    }
    length
}

fn sq(x: u64) -> u64 {
    x.wrapping_mul(x)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct RevMatchResult {
    /// Bytes consumed from the suffix of the needle.
    pub(crate) size: usize,
    pub(crate) score: Score,
}

impl RevMatchResult {
    fn accumulate(&mut self, that: RevMatchResult) {
        self.size += that.size;
        self.score += that.score;
    }
}

/// Best reverse subsequence match of `needle` against `haystack`.
///
/// Contiguous suffix hits earn quadratic points; bytes left on either side of
/// the matched region cost `(head + 1)^2 + tail` penalty. The remaining
/// prefix pair is matched recursively so the needle can chain across several
/// clusters.
pub(crate) fn rev_match(haystack: &[u8], needle: &[u8]) -> RevMatchResult {
    let mut best = RevMatchResult {
        size: 0,
        score: Score::new(0, sq(haystack.len() as u64 + 1)),
    };
    let mut h = haystack;
    let mut tail = 0u64;
    while !h.is_empty() {
        let size = common_suffix_length(h, needle);
        if size > 0 {
            let head = (h.len() - size) as u64;
            let mut this = RevMatchResult {
                size,
                score: Score::new(sq(size as u64), sq(head + 1).wrapping_add(tail)),
            };
            if size < h.len() && size < needle.len() {
                this.accumulate(rev_match(
                    &h[..h.len() - size],
                    &needle[..needle.len() - size],
                ));
            }
            if this.score > best.score {
                best = this;
            }
        }
        h = &h[..h.len() - 1];
        tail += 1;
    }
    best
}

/// Score a query (`needle`) against the segment names leading to a node
/// (`prefixes`), deepest segment last.
///
/// Every needle byte must find a home; otherwise the result is
/// [`Score::INVALID`]. Ancestor contributions are halved per step.
pub(crate) fn score_match(prefixes: &[&[u8]], needle: &[&[u8]]) -> Score {
    let Some((&last_needle, needle_rest)) = needle.split_last() else {
        return Score::INVALID;
    };
    let Some((&last_prefix, prefixes_rest)) = prefixes.split_last() else {
        return Score::INVALID;
    };

    let rev = rev_match(last_prefix, last_needle);
    let residual = &last_needle[..last_needle.len() - rev.size];

    let sub_score = if !needle_rest.is_empty() || !residual.is_empty() {
        if prefixes_rest.is_empty() {
            Score::INVALID
        } else {
            let mut sub_needle: Vec<&[u8]> = needle_rest.to_vec();
            if !residual.is_empty() {
                sub_needle.push(residual);
            }
            score_match(prefixes_rest, &sub_needle)
        }
    } else {
        Score::ZERO
    };

    if sub_score.is_valid() {
        Score::new(
            rev.score.points.wrapping_add(sub_score.points / 2),
            rev.score.penalty.wrapping_add(sub_score.penalty / 2),
        )
    } else {
        Score::INVALID
    }
}
