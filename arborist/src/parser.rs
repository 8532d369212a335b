use failure::Error;

use crate::corpus::Sentence;
use crate::Tree;

/// Trait for constituency parsers.
///
/// Implementors wrap a parser and return its analysis of a raw sentence as a `Tree`. Output
/// wrapped in an additional root, e.g. `(ROOT (S ...))`, can be unwrapped with
/// `TreeOps::strip_root`.
pub trait Parse {
    /// Parse a single sentence.
    fn parse(&self, text: &str) -> Result<Tree, Error>;

    /// Parse the text of each sentence.
    ///
    /// Trees are returned in the order of `sentences`, the first failure aborts parsing.
    fn parse_multiple(&self, sentences: &[Sentence]) -> Result<Vec<Tree>, Error> {
        sentences
            .iter()
            .map(|sentence| self.parse(sentence.text()))
            .collect()
    }
}
