use sorensen_dice::BigramMultiset;

/// A lazily computed cell of the sub-sequence union matrix.
///
/// States are monotone: `Empty -> Size -> Bigrams` or `Empty -> Bigrams`,
/// never downgraded.
pub(crate) enum MatrixCell<B> {
    /// Not computed yet.
    Empty,
    /// Only the cardinality of the union at this cell is known.
    Size(usize),
    /// The union multiset is materialized.
    Bigrams(B),
}

impl<B: BigramMultiset> MatrixCell<B> {
    pub(crate) fn known_size(&self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::Size(size) => Some(*size),
            Self::Bigrams(bigrams) => Some(bigrams.len()),
        }
    }

    pub(crate) fn record_size(&mut self, size: usize) {
        debug_assert!(matches!(self, Self::Empty));
        *self = Self::Size(size);
    }

    pub(crate) fn has_bigrams(&self) -> bool {
        matches!(self, Self::Bigrams(_))
    }

    pub(crate) fn record_bigrams(&mut self, bigrams: B) {
        debug_assert!(!self.has_bigrams());
        *self = Self::Bigrams(bigrams);
    }

    pub(crate) fn bigrams(&self) -> &B {
        match self {
            Self::Bigrams(bigrams) => bigrams,
            _ => unreachable!("cell is materialized before access"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sorensen_dice::Bigrams;

    #[test]
    fn test_size_then_bigrams() {
        let mut cell = MatrixCell::<Bigrams<u8>>::Empty;
        assert_eq!(cell.known_size(), None);
        assert!(!cell.has_bigrams());

        cell.record_size(3);
        assert_eq!(cell.known_size(), Some(3));
        assert!(!cell.has_bigrams());

        cell.record_bigrams(Bigrams::from_text("abcd"));
        assert_eq!(cell.known_size(), Some(3));
        assert!(cell.has_bigrams());
        assert_eq!(cell.bigrams().len(), 3);
    }

    #[test]
    fn test_bigrams_directly() {
        let mut cell = MatrixCell::<Bigrams<u8>>::Empty;
        cell.record_bigrams(Bigrams::from_text("abcd"));
        assert_eq!(cell.known_size(), Some(3));
    }
}
