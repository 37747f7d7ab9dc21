//! Trait of bigram multiset representations.
use crate::bigram::Bigram;
use crate::gram::Gram;

/// Trait of a multiset of bigrams extracted from a string.
///
/// Two representations implement it with identical observable semantics:
/// [`Bigrams`](crate::Bigrams) (sorted runs, recommended) and
/// [`BigramBag`](crate::BigramBag) (hash bag, the comparison baseline).
/// Consumers generic over this trait are agnostic to the representation.
pub trait BigramMultiset: Clone + Default + std::fmt::Display {
    /// Code-unit type the bigrams are drawn from.
    type Gram: Gram;

    /// Builds the multiset of adjacent-unit pairs of `units`.
    ///
    /// Fewer than 2 units produce the empty multiset; `n >= 2` units produce
    /// exactly `n - 1` bigrams (with multiplicity).
    fn from_units(units: &[Self::Gram]) -> Self;

    /// Builds the multiset from the code units of `text`.
    fn from_text(text: &str) -> Self {
        Self::from_units(&Self::Gram::units(text))
    }

    /// Gets the cardinality (total bigram count with multiplicity).
    fn len(&self) -> usize;

    /// Checks if the multiset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds all of `other`'s bigrams to `self` (in-place multiset union).
    fn merge(&mut self, other: &Self);

    /// Gets the multiset union of `self` and `other`.
    fn union(&self, other: &Self) -> Self {
        let mut union = self.clone();
        union.merge(other);
        union
    }

    /// Gets the union of any number of multisets.
    ///
    /// Union is commutative and associative with the empty multiset as
    /// identity, so the fold order does not affect the result.
    fn unite<'a, I>(sets: I) -> Self
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        let mut union = Self::default();
        for set in sets {
            union.merge(set);
        }
        union
    }

    /// Gets the cardinality of the intersection of two multisets, without
    /// materializing the intersection.
    fn intersect_size(lhs: &Self, rhs: &Self) -> usize;

    /// Gets the Sørensen–Dice coefficient `2|A ∩ B| / (|A| + |B|)` of two
    /// multisets, in `[0, 1]`.
    ///
    /// An empty intersection yields `0.0`, including the case where both
    /// multisets are empty. Single-character strings produce no bigrams at
    /// all, so their similarity to anything is `0.0`; callers wanting such
    /// strings to participate should pad them to at least 2 characters.
    fn sorensen_dice(lhs: &Self, rhs: &Self) -> f64 {
        let isect_size = Self::intersect_size(lhs, rhs);
        if isect_size == 0 {
            return 0.0;
        }
        2.0 * isect_size as f64 / (lhs.len() + rhs.len()) as f64
    }

    /// Gets the `(bigram, count)` runs in ascending bigram order.
    fn runs(&self) -> Vec<(Bigram<Self::Gram>, usize)>;
}
