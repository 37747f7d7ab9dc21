//! Fuzzy matching of a query string against contiguous sub-sequences of a
//! tokenized text, scored by the Sørensen–Dice coefficient over bigram
//! multisets. A building block for typo-tolerant entity extraction from
//! noisy text.
//!
//! Tokenization is up to the caller: feed tokens to a
//! [`SequenceMatcher`] (flagging delimiters and stopwords as *strip*
//! tokens), then stream matches above an SDC threshold. The matcher is
//! generic over the [`BigramMultiset`](sorensen_dice::BigramMultiset)
//! representation.
#![deny(missing_docs)]

mod cell;
mod matrix;
pub mod matcher;

pub use matcher::{Match, Matches, SequenceMatcher};
