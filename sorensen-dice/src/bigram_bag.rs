//! Hash-bag bigram multisets (the comparison baseline).
use std::cmp::Ordering;
use std::fmt;
use std::hash::{BuildHasher, Hasher};
use std::marker::PhantomData;

use hashbrown::HashMap;

use crate::bigram::Bigram;
use crate::gram::Gram;
use crate::multiset::BigramMultiset;

const MIX_CONSTANT: u64 = 0x9E37_79B9;

/// Hasher for bigram keys.
///
/// Both code units fit a single word when `2 * BITS <= 64`, so the hash is
/// just their concatenated bit patterns. Wider units fall back to combining
/// the two unit hashes with the Boost `hash_combine` mixing step.
struct BigramHasher<G> {
    units: [u64; 2],
    filled: usize,
    _gram: PhantomData<G>,
}

impl<G: Gram> Hasher for BigramHasher<G> {
    fn write(&mut self, _bytes: &[u8]) {
        unreachable!("bigram keys hash through write_u64");
    }

    fn write_u64(&mut self, unit: u64) {
        debug_assert!(self.filled < 2);
        self.units[self.filled] = unit;
        self.filled += 1;
    }

    fn finish(&self) -> u64 {
        debug_assert_eq!(self.filled, 2);
        let (h1, h2) = (self.units[0], self.units[1]);
        if 2 * G::BITS <= 64 {
            (h2 << G::BITS) | h1
        } else {
            h1 ^ h2
                .wrapping_mul(MIX_CONSTANT)
                .wrapping_add(h1 << 6)
                .wrapping_add(h1 >> 2)
        }
    }
}

struct BigramHashBuilder<G>(PhantomData<G>);

impl<G> Default for BigramHashBuilder<G> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<G> Clone for BigramHashBuilder<G> {
    fn clone(&self) -> Self {
        Self(PhantomData)
    }
}

impl<G: Gram> BuildHasher for BigramHashBuilder<G> {
    type Hasher = BigramHasher<G>;

    fn build_hasher(&self) -> Self::Hasher {
        BigramHasher {
            units: [0; 2],
            filled: 0,
            _gram: PhantomData,
        }
    }
}

/// A bigram multiset stored as an unordered bag of counts.
///
/// Externally equivalent to [`Bigrams`](crate::Bigrams); kept as a reference
/// implementation and benchmark baseline. The intersection cardinality works
/// over sorted snapshots of both bags so that counts are respected and the
/// result does not depend on bucket order.
#[derive(Clone, Debug)]
pub struct BigramBag<G> {
    bag: HashMap<Bigram<G>, usize, BigramHashBuilder<G>>,
    len: usize,
}

impl<G: Gram> PartialEq for BigramBag<G> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.bag == other.bag
    }
}

impl<G: Gram> Eq for BigramBag<G> {}

impl<G> Default for BigramBag<G> {
    fn default() -> Self {
        Self {
            bag: HashMap::default(),
            len: 0,
        }
    }
}

impl<G: Gram> BigramBag<G> {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: Gram> BigramMultiset for BigramBag<G> {
    type Gram = G;

    fn from_units(units: &[G]) -> Self {
        let mut this = Self::default();
        if units.len() < 2 {
            return this;
        }
        this.bag.reserve(units.len() - 1);
        for pair in units.windows(2) {
            *this.bag.entry(Bigram(pair[0], pair[1])).or_insert(0) += 1;
        }
        this.len = units.len() - 1;
        this
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
        for (&bigram, &count) in &other.bag {
            *self.bag.entry(bigram).or_insert(0) += count;
        }
        self.len += other.len;
    }

    fn intersect_size(lhs: &Self, rhs: &Self) -> usize {
        let lruns = lhs.runs();
        let rruns = rhs.runs();
        let mut size = 0;
        let (mut i, mut j) = (0, 0);
        while i < lruns.len() && j < rruns.len() {
            let (lb, lc) = lruns[i];
            let (rb, rc) = rruns[j];
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
        let mut runs: Vec<_> = self.bag.iter().map(|(&bigram, &count)| (bigram, count)).collect();
        runs.sort_unstable_by_key(|&(bigram, _)| bigram);
        runs
    }
}

impl<G: Gram> fmt::Display for BigramBag<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bigram_bag(size: {}, {{", G::PREFIX, self.len)?;
        let mut separator = "";
        for (bigram, count) in self.runs() {
            write!(f, "{separator}{bigram}: {count}")?;
            separator = ", ";
        }
        write!(f, "}})")
    }
}
