/// One search string tried against the geocoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryVariant {
    /// 0 for the full query, increasing as trailing tokens are dropped
    pub level: usize,
    /// Tokens joined by single spaces
    pub text: String,
}

/// Iterator over progressively broader query variants.
///
/// For N tokens it yields N variants: all N tokens, then N-1, down to the
/// first token alone. Nothing is yielded for an empty token list.
#[derive(Debug, Clone)]
pub struct Relaxation<'a> {
    tokens: &'a [String],
    level: usize,
}

impl<'a> Relaxation<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens, level: 0 }
    }
}

impl Iterator for Relaxation<'_> {
    type Item = QueryVariant;

    fn next(&mut self) -> Option<Self::Item> {
        let keep = self.tokens.len().checked_sub(self.level)?;
        if keep == 0 {
            return None;
        }
        let variant = QueryVariant {
            level: self.level,
            text: self.tokens[..keep].join(" "),
        };
        self.level += 1;
        Some(variant)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tokens.len().saturating_sub(self.level);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Relaxation<'_> {}

/// Collects every variant of `tokens`, most specific first.
pub fn relax(tokens: &[String]) -> Vec<QueryVariant> {
    Relaxation::new(tokens).collect()
}
