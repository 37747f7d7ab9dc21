//! Sorted-run bigram multisets (the recommended representation).
use std::cmp::Ordering;
use std::fmt;

use crate::bigram::Bigram;
use crate::gram::Gram;
use crate::multiset::BigramMultiset;

/// A bigram multiset stored as sorted `(bigram, count)` runs.
///
/// Runs are strictly ascending by bigram with no duplicates, so the union
/// and the intersection cardinality are two-cursor merges in O(|A| + |B|)
/// time. Construction from `n` code units is O(n log n).
///
/// # Examples
///
/// ```
/// use sorensen_dice::{BigramMultiset, Bigrams};
///
/// let abcd = Bigrams::<u8>::from_text("abcd");
/// let bcd = Bigrams::<u8>::from_text("bcd");
///
/// assert_eq!(abcd.len(), 3);
/// assert_eq!(Bigrams::intersect_size(&abcd, &bcd), 2);
/// assert_eq!(Bigrams::sorensen_dice(&abcd, &bcd), 0.8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bigrams<G> {
    runs: Vec<(Bigram<G>, usize)>,
    len: usize,
}

impl<G> Default for Bigrams<G> {
    fn default() -> Self {
        Self {
            runs: vec![],
            len: 0,
        }
    }
}

impl<G: Gram> Bigrams<G> {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates the `(bigram, count)` runs in ascending bigram order.
    pub fn iter(&self) -> impl Iterator<Item = (Bigram<G>, usize)> + '_ {
        self.runs.iter().copied()
    }
}

impl<G: Gram> BigramMultiset for Bigrams<G> {
    type Gram = G;

    fn from_units(units: &[G]) -> Self {
        if units.len() < 2 {
            return Self::default();
        }
        let mut bigrams = Vec::with_capacity(units.len() - 1);
        for pair in units.windows(2) {
            bigrams.push(Bigram(pair[0], pair[1]));
        }
        bigrams.sort_unstable();

        let mut runs: Vec<(Bigram<G>, usize)> = vec![];
        for bigram in bigrams {
            match runs.last_mut() {
                Some((last, count)) if *last == bigram => *count += 1,
                _ => runs.push((bigram, 1)),
            }
        }
        Self {
            runs,
            len: units.len() - 1,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn merge(&mut self, other: &Self) {
        if other.len == 0 {
            return;
        }
        if self.len == 0 {
            self.clone_from(other);
            return;
        }

        // Merging into a fresh vector keeps this linear; splicing into the
        // middle of a Vec would be linear per inserted run.
        let mut merged = Vec::with_capacity(self.runs.len() + other.runs.len());
        let mut lhs = std::mem::take(&mut self.runs).into_iter().peekable();
        let mut rhs = other.runs.iter().copied().peekable();

        while let (Some(&l), Some(&r)) = (lhs.peek(), rhs.peek()) {
            match l.0.cmp(&r.0) {
                Ordering::Less => {
                    merged.push(l);
                    lhs.next();
                }
                Ordering::Equal => {
                    merged.push((l.0, l.1 + r.1));
                    lhs.next();
                    rhs.next();
                }
                Ordering::Greater => {
                    merged.push(r);
                    rhs.next();
                }
            }
        }
        merged.extend(lhs);
        merged.extend(rhs);

        self.runs = merged;
        self.len += other.len;
    }

    fn intersect_size(lhs: &Self, rhs: &Self) -> usize {
        let mut size = 0;
        let (mut i, mut j) = (0, 0);
        while i < lhs.runs.len() && j < rhs.runs.len() {
            let (lb, lc) = lhs.runs[i];
            let (rb, rc) = rhs.runs[j];
            match lb.cmp(&rb) {
                Ordering::Less => i += 1,
                Ordering::Equal => {
                    size += lc.min(rc);
                    i += 1;
                    j += 1;
                }
                Ordering::Greater => j += 1,
            }
        }
        size
    }

    fn runs(&self) -> Vec<(Bigram<G>, usize)> {
        self.runs.clone()
    }
}

impl<G: Gram> fmt::Display for Bigrams<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bigrams(size: {}, {{", G::PREFIX, self.len)?;
        let mut separator = "";
        for (bigram, count) in &self.runs {
            write!(f, "{separator}{bigram}: {count}")?;
            separator = ", ";
        }
        write!(f, "}})")
    }
}
