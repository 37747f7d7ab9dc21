use sorensen_dice::BigramMultiset;

use crate::cell::MatrixCell;

/// Upper-triangular matrix of sub-sequence bigram unions.
///
/// Row `i` of column `j` covers the `i + 1` tokens starting at `j`; row 0 is
/// seeded with the per-token multisets on append, everything above is filled
/// lazily by the divide-and-combine recurrence
/// `B[i][j] = B[i/2][j] + B[i - i/2 - 1][j + i/2 + 1]`.
pub(crate) struct TriangularMatrix<B> {
    rows: Vec<Vec<MatrixCell<B>>>,
}

impl<B> Default for TriangularMatrix<B> {
    fn default() -> Self {
        Self { rows: vec![] }
    }
}

impl<B: BigramMultiset> TriangularMatrix<B> {
    /// Number of tokens appended so far.
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    /// Reserves room for `len` tokens in total.
    pub(crate) fn reserve(&mut self, len: usize) {
        self.rows.reserve(len.saturating_sub(self.rows.len()));
    }

    /// Appends a token: every existing row grows by one `Empty` cell, a new
    /// single-cell row appears, and row 0's new cell is seeded with the
    /// token's multiset.
    pub(crate) fn push(&mut self, bigrams: B) {
        let back = self.rows.len();
        // A reserved matrix passes its remaining width on to new rows.
        let capacity = self.rows.capacity();
        let row = if capacity > back {
            Vec::with_capacity(capacity - back)
        } else {
            vec![]
        };
        self.rows.push(row);
        self.rows[0].push(MatrixCell::Bigrams(bigrams));
        for i in 1..self.rows.len() {
            self.rows[i].push(MatrixCell::Empty);
        }
    }

    /// Sub-cell indices combining to cell `(i, j)`: the left child covers
    /// tokens `[j, j + i/2]`, the right child the rest of `[j, j + i]`.
    const fn children(i: usize, j: usize) -> ((usize, usize), (usize, usize)) {
        let k = i / 2;
        ((k, j), (i - k - 1, j + k + 1))
    }

    /// Cardinality of the union at `(i, j)`, computed without materializing
    /// any multiset and memoized as `Size`.
    pub(crate) fn union_len(&mut self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows.len());
        debug_assert!(j < self.rows[i].len());
        if let Some(len) = self.rows[i][j].known_size() {
            return len;
        }
        let ((i1, j1), (i2, j2)) = Self::children(i, j);
        let len = self.union_len(i1, j1) + self.union_len(i2, j2);
        self.rows[i][j].record_size(len);
        len
    }

    /// Union multiset at `(i, j)`, materialized on demand and memoized.
    pub(crate) fn union_bigrams(&mut self, i: usize, j: usize) -> &B {
        debug_assert!(i < self.rows.len());
        debug_assert!(j < self.rows[i].len());
        if !self.rows[i][j].has_bigrams() {
            let ((i1, j1), (i2, j2)) = Self::children(i, j);
            self.union_bigrams(i1, j1);
            self.union_bigrams(i2, j2);
            let union = self.rows[i1][j1]
                .bigrams()
                .union(self.rows[i2][j2].bigrams());
            self.rows[i][j].record_bigrams(union);
        }
        self.rows[i][j].bigrams()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sorensen_dice::Bigrams;

    fn example_tokens() -> Vec<Bigrams<u8>> {
        ["abc", "cde", "xy", "q", "zzz"]
            .iter()
            .map(|text| Bigrams::from_text(text))
            .collect()
    }

    fn filled(tokens: &[Bigrams<u8>]) -> TriangularMatrix<Bigrams<u8>> {
        let mut matrix = TriangularMatrix::default();
        for token in tokens {
            matrix.push(token.clone());
        }
        matrix
    }

    #[test]
    fn test_dp_matches_flat_unite() {
        let tokens = example_tokens();
        let mut matrix = filled(&tokens);
        for j in 0..tokens.len() {
            for i in 0..tokens.len() - j {
                let expected = Bigrams::unite(&tokens[j..=j + i]);
                assert_eq!(matrix.union_len(i, j), expected.len());
                assert_eq!(matrix.union_bigrams(i, j).runs(), expected.runs());
            }
        }
    }

    #[test]
    fn test_memoization_order_independent() {
        let tokens = example_tokens();

        // Sizes first, then unions.
        let mut size_first = filled(&tokens);
        for j in 0..tokens.len() {
            for i in 0..tokens.len() - j {
                size_first.union_len(i, j);
            }
        }

        // Unions straight away, starting from the widest cell.
        let mut union_first = filled(&tokens);
        union_first.union_bigrams(tokens.len() - 1, 0);

        for j in 0..tokens.len() {
            for i in 0..tokens.len() - j {
                assert_eq!(
                    size_first.union_bigrams(i, j).runs(),
                    union_first.union_bigrams(i, j).runs(),
                );
            }
        }
    }

    #[test]
    fn test_row_lengths() {
        let tokens = example_tokens();
        let matrix = filled(&tokens);
        for (i, row) in matrix.rows.iter().enumerate() {
            assert_eq!(row.len(), tokens.len() - i);
        }
    }
}
