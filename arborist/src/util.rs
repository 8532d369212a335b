use std::borrow::Borrow;
use std::collections::HashSet;

/// LabelSet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LabelSet {
    /// Variant used for positive matching.
    Positive(HashSet<String>),
    /// Variant used for negative matching.
    Negative(HashSet<String>),
}

impl LabelSet {
    /// Returns whether the query matched the `LabelSet`.
    ///
    /// If `self` is `LabelSet::Positive`, `true` is returned if the query was found, `false`
    /// otherwise. If `self` is `LabelSet::Negative`, `true` is returned if the query was not foud.
    pub fn matches(&self, q: impl Borrow<str>) -> bool {
        match self {
            LabelSet::Positive(ref set) => set.contains(q.borrow()),
            LabelSet::Negative(ref set) => !set.contains(q.borrow()),
        }
    }
}

impl Default for LabelSet {
    /// Returns a `LabelSet` that matches nothing.
    fn default() -> Self {
        LabelSet::Positive(HashSet::new())
    }
}

impl<S> std::iter::FromIterator<S> for LabelSet
where
    S: Into<String>,
{
    /// Collects into a `LabelSet::Positive`.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        LabelSet::Positive(iter.into_iter().map(Into::into).collect())
    }
}
