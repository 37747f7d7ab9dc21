//! Bigram multisets scored by the [Sørensen–Dice coefficient](https://en.wikipedia.org/wiki/S%C3%B8rensen%E2%80%93Dice_coefficient).
//!
//! A string of `n >= 2` code units yields the multiset of its `n - 1`
//! adjacent-unit pairs. Similarity of two strings is then
//! `SDC(A, B) = 2|A ∩ B| / (|A| + |B|)`. Bigrams retain local string
//! structure while the multiset cardinality is known without building
//! anything, which is what makes the pruning in the `seqmatch` crate work.
#![deny(missing_docs)]

pub mod bigram;
pub mod bigram_bag;
pub mod bigrams;
pub mod gram;
pub mod multiset;

pub use bigram::Bigram;
pub use bigram_bag::BigramBag;
pub use bigrams::Bigrams;
pub use gram::Gram;
pub use multiset::BigramMultiset;
