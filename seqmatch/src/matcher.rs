//! Fuzzy matching of a query against contiguous sub-sequences of a token
//! sequence.
use std::fmt;

use hashbrown::HashSet;
use sorensen_dice::BigramMultiset;

use crate::matrix::TriangularMatrix;

/// Searcher for sub-sequences of a token sequence that are similar to a
/// query, scored by the Sørensen–Dice coefficient of bigram multisets.
///
/// Tokens are appended one by one, optionally flagged as *strip* tokens
/// (typically whitespace and punctuation) that may appear inside a match but
/// never at its boundary. [`SequenceMatcher::matches`] then
/// lazily enumerates the sub-sequences whose SDC against the query reaches a
/// threshold.
///
/// # Complexities
///
/// Candidate unions are memoized in an upper-triangular matrix filled by a
/// divide-and-combine recurrence, so every union is computed at most once
/// across all queries. Candidates are pruned on cardinality alone before any
/// union is materialized: `SDC(A, B) <= 2 min(|A|,|B|) / (|A|+|B|)`, so a
/// match at threshold `t` requires `max(|A|,|B|) / min(|A|,|B|) <= 2/t - 1`,
/// and cardinalities come from the same recurrence over plain sums.
///
/// # Examples
///
/// ```
/// use seqmatch::SequenceMatcher;
/// use sorensen_dice::{BigramMultiset, Bigrams};
///
/// let mut matcher = SequenceMatcher::<Bigrams<char>>::new();
/// matcher.emplace_back("Hello", false);
/// matcher.emplace_back("  ", true); // strip: never a match boundary
/// matcher.emplace_back("world", false);
///
/// let query = Bigrams::unite([
///     &Bigrams::from_text("Helo"),
///     &Bigrams::from_text("  "),
///     &Bigrams::from_text("wordl"),
/// ]);
/// let matches: Vec<_> = matcher.matches(&query, 0.7).collect();
///
/// assert_eq!(matches.len(), 1);
/// assert_eq!((matches[0].begin, matches[0].end), (0, 3));
/// assert!(matches[0].sdc > 0.7);
/// ```
#[derive(Default)]
pub struct SequenceMatcher<B> {
    matrix: TriangularMatrix<B>,
    strip_ixs: HashSet<usize>,
}

impl<B: BigramMultiset> SequenceMatcher<B> {
    /// Creates an empty matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves room for `len` tokens in total (a hint only).
    pub fn reserve(&mut self, len: usize) {
        self.matrix.reserve(len);
        self.strip_ixs.reserve(len.saturating_sub(self.len()));
    }

    /// Gets the number of tokens appended so far.
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    /// Checks if no token has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a token's bigram multiset to the sequence.
    ///
    /// A `strip` token (typically whitespace or punctuation) may appear
    /// inside a match but never begins or ends one.
    pub fn push_back(&mut self, bigrams: B, strip: bool) {
        if strip {
            self.strip_ixs.insert(self.len());
        }
        self.matrix.push(bigrams);
    }

    /// Builds the bigram multiset of `text` and appends it.
    pub fn emplace_back(&mut self, text: &str, strip: bool) {
        self.push_back(B::from_text(text), strip);
    }

    /// Gets the bigram union of the token range `[begin, end)`, computing
    /// and memoizing it if necessary.
    ///
    /// # Panics
    ///
    /// Panics unless `begin < end <= self.len()`.
    pub fn subsequence_bigrams(&mut self, begin: usize, end: usize) -> &B {
        assert!(begin < end && end <= self.len());
        self.matrix.union_bigrams(end - begin - 1, begin)
    }

    /// Lazily enumerates sub-sequences whose SDC against `query` is at least
    /// `threshold`, in ascending (begin, length) lexicographic order.
    ///
    /// Sub-sequences beginning or ending on a strip token are never
    /// reported. A query with an empty multiset matches nothing (its SDC
    /// against anything is 0). The stream is restarted by calling `matches`
    /// again.
    ///
    /// # Panics
    ///
    /// Panics unless `threshold` is within `(0, 1]`.
    pub fn matches<'a>(&'a mut self, query: &'a B, threshold: f64) -> Matches<'a, B> {
        assert!(
            0.0 < threshold && threshold <= 1.0,
            "threshold must be within (0, 1]"
        );
        let exhausted = query.is_empty();
        let len = self.len();
        Matches {
            matcher: self,
            query,
            sdc_threshold: threshold,
            ratio_threshold: 2.0 / threshold - 1.0,
            i: 0,
            j: if exhausted { len } else { 0 },
        }
    }
}

/// A reported sub-sequence match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Index of the first token of the sub-sequence.
    pub begin: usize,
    /// Just-past-the-last token index.
    pub end: usize,
    /// The Sørensen–Dice coefficient against the query.
    pub sdc: f64,
}

impl Match {
    /// Gets the number of tokens in the sub-sequence.
    pub const fn len(&self) -> usize {
        self.end - self.begin
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "match(begin: {}, end: {}, size: {}, SDC: {})",
            self.begin,
            self.end,
            self.len(),
            self.sdc
        )
    }
}

/// Lazy stream of [`Match`]es, in ascending (begin, length) order.
///
/// Borrows the matcher mutably for its whole lifetime: advancing may fill
/// matrix cells in place.
pub struct Matches<'a, B> {
    matcher: &'a mut SequenceMatcher<B>,
    query: &'a B,
    sdc_threshold: f64,
    ratio_threshold: f64,
    i: usize,
    j: usize,
}

impl<B: BigramMultiset> Iterator for Matches<'_, B> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let len = self.matcher.len();
        let query_len = self.query.len();

        while self.j < len {
            // Sub-sequences may not begin with a strip token.
            if self.matcher.strip_ixs.contains(&self.j) {
                self.i = 0;
                self.j += 1;
                continue;
            }
            while self.i < len - self.j {
                let (i, j) = (self.i, self.j);
                // Nor end with one.
                if self.matcher.strip_ixs.contains(&(j + i)) {
                    self.i += 1;
                    continue;
                }

                let sub_len = self.matcher.matrix.union_len(i, j);
                let (small, large) = if sub_len < query_len {
                    (sub_len, query_len)
                } else {
                    (query_len, sub_len)
                };
                if small == 0 || large as f64 / small as f64 > self.ratio_threshold {
                    // The SDC upper bound cannot reach the threshold here.
                    if sub_len < query_len {
                        self.i += 1; // a longer sub-sequence may still catch up
                        continue;
                    }
                    break; // extending only grows the ratio further
                }

                let sdc =
                    B::sorensen_dice(self.matcher.matrix.union_bigrams(i, j), self.query);
                self.i += 1; // resume just past this cell
                if sdc >= self.sdc_threshold {
                    return Some(Match {
                        begin: j,
                        end: j + i + 1,
                        sdc,
                    });
                }
            }
            self.i = 0;
            self.j += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sorensen_dice::{BigramBag, Bigrams};

    /// Exhaustive enumeration with explicit SDC, for checking the pruned,
    /// memoized path.
    fn naive_matches<B: BigramMultiset>(
        tokens: &[B],
        strip_ixs: &HashSet<usize>,
        query: &B,
        threshold: f64,
    ) -> Vec<(usize, usize, f64)> {
        let mut results = vec![];
        for j in 0..tokens.len() {
            if strip_ixs.contains(&j) {
                continue;
            }
            for i in 0..tokens.len() - j {
                if strip_ixs.contains(&(j + i)) {
                    continue;
                }
                let union = B::unite(&tokens[j..=j + i]);
                let sdc = B::sorensen_dice(&union, query);
                if sdc >= threshold && B::intersect_size(&union, query) > 0 {
                    results.push((j, j + i + 1, sdc));
                }
            }
        }
        results
    }

    fn example_matcher<B: BigramMultiset>() -> SequenceMatcher<B> {
        let mut matcher = SequenceMatcher::new();
        matcher.reserve(9);
        matcher.emplace_back("Prologue", false);
        matcher.emplace_back(" .", true);
        matcher.emplace_back("  ", true);
        matcher.emplace_back("Hello", false);
        matcher.emplace_back("  ", true);
        matcher.emplace_back("world", false);
        matcher.emplace_back(" !", true);
        matcher.emplace_back("Epilogue", false);
        matcher.emplace_back(" .", true);
        matcher
    }

    fn example_query<B: BigramMultiset>() -> B {
        B::unite([
            &B::from_text("Helo"),
            &B::from_text("  "),
            &B::from_text("wordl"),
        ])
    }

    #[test]
    fn test_empty_matcher() {
        let mut matcher = SequenceMatcher::<Bigrams<char>>::new();
        let query = Bigrams::from_text("Hello");
        assert_eq!(matcher.matches(&query, 0.1).next(), None);
    }

    #[test]
    fn test_empty_query() {
        let mut matcher = example_matcher::<Bigrams<char>>();
        let query = Bigrams::new();
        assert_eq!(matcher.matches(&query, 0.5).next(), None);
    }

    #[test]
    fn test_hello_world() {
        let mut matcher = example_matcher::<Bigrams<char>>();
        let query = example_query();

        let mut matches = matcher.matches(&query, 0.7);
        let m = matches.next().expect("matched");
        assert_eq!(m.begin, 3, "match begins with \"Hello\"");
        assert_eq!(m.end, 6, "match ends past \"world\"");
        assert_eq!(m.len(), 3, "match is 3 tokens long");
        assert!(m.sdc > 0.7, "matches with SDC above threshold");
        assert_eq!(matches.next(), None, "no more matches");
    }

    #[test]
    fn test_hello_world_bag_variant() {
        let mut matcher = example_matcher::<BigramBag<char>>();
        let query = example_query();

        let matches: Vec<_> = matcher.matches(&query, 0.7).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].begin, matches[0].end), (3, 6));
    }

    #[test]
    fn test_restartable() {
        let mut matcher = example_matcher::<Bigrams<char>>();
        let query = example_query();

        let first: Vec<_> = matcher.matches(&query, 0.7).collect();
        // The second pass runs over fully memoized cells.
        let second: Vec<_> = matcher.matches(&query, 0.7).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_match_display() {
        let mut matcher = SequenceMatcher::<Bigrams<char>>::new();
        matcher.emplace_back("abcd", false);
        let query = Bigrams::from_text("abcd");
        let m = matcher.matches(&query, 1.0).next().unwrap();
        assert_eq!(m.to_string(), "match(begin: 0, end: 1, size: 1, SDC: 1)");
    }

    #[test]
    fn test_strip_never_a_boundary() {
        let mut matcher = SequenceMatcher::<Bigrams<char>>::new();
        matcher.emplace_back("ab", true);
        matcher.emplace_back("ab", false);
        matcher.emplace_back("ab", true);
        let query = Bigrams::from_text("ab");

        let matches: Vec<_> = matcher.matches(&query, 0.1).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].begin, matches[0].end), (1, 2));
    }

    #[test]
    fn test_subsequence_bigrams() {
        let mut matcher = example_matcher::<Bigrams<char>>();
        let expected = Bigrams::unite([
            &Bigrams::from_text("Hello"),
            &Bigrams::from_text("  "),
            &Bigrams::from_text("world"),
        ]);
        assert_eq!(matcher.subsequence_bigrams(3, 6).runs(), expected.runs());
    }

    #[test]
    fn test_matches_naive_reference() {
        let tokens: Vec<Bigrams<char>> = ["Prologue", " .", "  ", "Hello", "  ", "world", " !", "Epilogue", " ."]
            .iter()
            .map(|text| Bigrams::from_text(text))
            .collect();
        let strip_ixs: HashSet<usize> = [1, 2, 4, 6, 8].into_iter().collect();
        let query = example_query::<Bigrams<char>>();

        let mut matcher = SequenceMatcher::new();
        for (ix, token) in tokens.iter().enumerate() {
            matcher.push_back(token.clone(), strip_ixs.contains(&ix));
        }

        for threshold in [0.1, 0.3, 0.5, 0.7, 0.9, 1.0] {
            let expected = naive_matches(&tokens, &strip_ixs, &query, threshold);
            let results: Vec<_> = matcher
                .matches(&query, threshold)
                .map(|m| (m.begin, m.end, m.sdc))
                .collect();
            assert_eq!(results, expected, "threshold {threshold}");
        }
    }

    #[test]
    #[should_panic(expected = "threshold must be within (0, 1]")]
    fn test_zero_threshold() {
        let mut matcher = example_matcher::<Bigrams<char>>();
        let query = example_query::<Bigrams<char>>();
        let _ = matcher.matches(&query, 0.0);
    }

    proptest! {
        #[test]
        fn prop_matches_naive_reference(
            texts in prop::collection::vec("[ab ]{0,5}", 0..8),
            strips in prop::collection::vec(any::<bool>(), 8),
            query_text in "[ab ]{0,8}",
            threshold in 0.05f64..=1.0,
        ) {
            let tokens: Vec<Bigrams<char>> =
                texts.iter().map(|text| Bigrams::from_text(text)).collect();
            let strip_ixs: HashSet<usize> = (0..tokens.len())
                .filter(|&ix| strips[ix])
                .collect();
            let query = Bigrams::<char>::from_text(&query_text);

            let mut matcher = SequenceMatcher::new();
            for (ix, token) in tokens.iter().enumerate() {
                matcher.push_back(token.clone(), strip_ixs.contains(&ix));
            }

            let expected = if query.is_empty() {
                vec![]
            } else {
                naive_matches(&tokens, &strip_ixs, &query, threshold)
            };
            let results: Vec<_> = matcher
                .matches(&query, threshold)
                .map(|m| (m.begin, m.end, m.sdc))
                .collect();
            prop_assert_eq!(results, expected);
        }
    }
}
