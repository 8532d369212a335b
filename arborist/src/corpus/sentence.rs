use std::fmt;
use std::sync::Arc;

use failure::Error;

use crate::io::{PTBFormat, ReadTree};
use crate::tree_modification::AnnotatePOS;
use crate::Tree;

/// Token of a gold-standard sentence.
///
/// The token carries its form, base form and two part-of-speech tags.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    form: String,
    lemma: String,
    universal_pos: String,
    ptb_pos: String,
}

impl Token {
    pub fn new(
        form: impl Into<String>,
        lemma: impl Into<String>,
        universal_pos: impl Into<String>,
        ptb_pos: impl Into<String>,
    ) -> Self {
        Token {
            form: form.into(),
            lemma: lemma.into(),
            universal_pos: universal_pos.into(),
            ptb_pos: ptb_pos.into(),
        }
    }

    /// Return the surface form.
    pub fn form(&self) -> &str {
        &self.form
    }

    /// Return the base form.
    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    /// Return the universal part-of-speech tag.
    pub fn universal_pos(&self) -> &str {
        &self.universal_pos
    }

    /// Return the treebank-specific part-of-speech tag.
    pub fn ptb_pos(&self) -> &str {
        &self.ptb_pos
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.form, self.lemma, self.universal_pos, self.ptb_pos
        )
    }
}

/// Constituency parse of a gold-standard sentence.
///
/// Keeps the bracketed string it was read from next to the `Tree`. The leaves of the tree are
/// annotated with part-of-speech tags once the parse becomes part of a `Sentence`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstituencyParse {
    bracketed: String,
    tree: Tree,
    annotated: bool,
}

impl ConstituencyParse {
    /// Construct a parse from a bracketed string.
    ///
    /// Leaves may appear directly below any labeled node, e.g. `(S (NP cat) (VP sat))`.
    pub fn new(bracketed: impl Into<String>) -> Result<Self, Error> {
        let bracketed = bracketed.into();
        let tree = PTBFormat::Simple.string_to_tree(&bracketed)?;
        Ok(ConstituencyParse {
            bracketed,
            tree,
            annotated: false,
        })
    }

    /// Return the original bracketed representation.
    pub fn bracketed(&self) -> &str {
        &self.bracketed
    }

    /// Return the tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns whether the leaves are annotated with part-of-speech tags.
    pub fn is_annotated(&self) -> bool {
        self.annotated
    }

    fn annotate_leaves(&mut self, tokens: &[Token]) -> Result<(), Error> {
        if self.annotated {
            return Err(format_err!(
                "Leaves of {:?} are already annotated.",
                self.bracketed
            ));
        }
        self.tree
            .annotate_pos(tokens.iter().map(|token| token.universal_pos()))?;
        self.annotated = true;
        Ok(())
    }
}

impl fmt::Display for ConstituencyParse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.bracketed)
    }
}

/// Labeled dependency arc.
///
/// Token indices are 1-based, a head of `0` refers to the virtual root.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DependencyArc {
    dependent: usize,
    form: String,
    relation: String,
    head: usize,
}

impl DependencyArc {
    pub fn new(
        dependent: usize,
        form: impl Into<String>,
        relation: impl Into<String>,
        head: usize,
    ) -> Self {
        DependencyArc {
            dependent,
            form: form.into(),
            relation: relation.into(),
            head,
        }
    }

    /// Return the 1-based index of the dependent.
    pub fn dependent(&self) -> usize {
        self.dependent
    }

    /// Return the form of the dependent.
    pub fn form(&self) -> &str {
        &self.form
    }

    /// Return the grammatical relation.
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Return the 1-based index of the head.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns whether the arc attaches its dependent to the root.
    ///
    /// That is the case if the head is the virtual root or the relation is `ROOT`.
    pub fn is_root(&self) -> bool {
        self.head == 0 || self.relation == "ROOT"
    }
}

impl fmt::Display for DependencyArc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} to {} ({})", self.head, self.dependent, self.relation)
    }
}

/// Dependency parse of a gold-standard sentence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DependencyParse {
    arcs: Vec<DependencyArc>,
    tokens: Arc<[Token]>,
}

impl DependencyParse {
    pub fn new(tokens: Arc<[Token]>, arcs: Vec<DependencyArc>) -> Self {
        DependencyParse { arcs, tokens }
    }

    /// Return the arcs in the order they were annotated.
    pub fn arcs(&self) -> &[DependencyArc] {
        &self.arcs
    }

    /// Return the tokens the arcs refer to.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Get an iterator over the arcs attaching to the root.
    pub fn root_arcs<'a>(&'a self) -> impl Iterator<Item = &'a DependencyArc> + 'a {
        self.arcs.iter().filter(|arc| arc.is_root())
    }
}

impl fmt::Display for DependencyParse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let arcs = self
            .arcs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(f, "[{}]", arcs.join(", "))
    }
}

/// Gold-standard sentence.
#[derive(Clone, Debug, PartialEq)]
pub struct Sentence {
    ordinal: usize,
    text: String,
    tokens: Arc<[Token]>,
    constituency_parse: ConstituencyParse,
    dependency_parse: DependencyParse,
}

impl Sentence {
    /// Construct a new `Sentence`.
    ///
    /// The leaves of `constituency_parse` are annotated with the universal part-of-speech tags
    /// of `tokens`, each leaf is placed below a new node labeled with its tag. This brings the
    /// tree in line with parser output, where leaves are always part-of-speech tagged.
    ///
    /// Returns `Error` if the number of tokens differs from the number of leaves or if the
    /// leaves of `constituency_parse` are already annotated.
    pub fn new(
        ordinal: usize,
        text: impl Into<String>,
        tokens: Vec<Token>,
        mut constituency_parse: ConstituencyParse,
        arcs: Vec<DependencyArc>,
    ) -> Result<Self, Error> {
        let tokens: Arc<[Token]> = tokens.into();
        constituency_parse.annotate_leaves(&tokens)?;
        let dependency_parse = DependencyParse::new(tokens.clone(), arcs);
        Ok(Sentence {
            ordinal,
            text: text.into(),
            tokens,
            constituency_parse,
            dependency_parse,
        })
    }

    /// Return the sentence's ordinal in the corpus.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Return the sentence text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Return the tokens.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Return the constituency parse.
    ///
    /// The leaves of its tree are annotated with part-of-speech tags.
    pub fn constituency_parse(&self) -> &ConstituencyParse {
        &self.constituency_parse
    }

    /// Return the dependency parse.
    pub fn dependency_parse(&self) -> &DependencyParse {
        &self.dependency_parse
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tokens = self
            .tokens
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        writeln!(f, "{}. {}", self.ordinal, self.text)?;
        writeln!(f, "tokens: {}", tokens.join(" "))?;
        writeln!(f, "constituency: {}", self.constituency_parse)?;
        write!(f, "dependency: {}", self.dependency_parse)
    }
}
