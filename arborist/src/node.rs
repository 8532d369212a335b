use std::fmt;

use crate::Span;

/// Enum representing Nodes in a constituency tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    /// Nonterminal Node.
    NonTerminal(NonTerminal),
    /// Terminal Node.
    Terminal(Terminal),
}

impl Node {
    /// Returns whether a `self` is `Terminal`.
    pub fn is_terminal(&self) -> bool {
        match self {
            Node::Terminal(_) => true,
            Node::NonTerminal(_) => false,
        }
    }

    /// Get a `Option<&Terminal>`.
    ///
    /// Returns `None` if `self` is a `Node::NonTerminal`.
    pub fn terminal(&self) -> Option<&Terminal> {
        match self {
            Node::Terminal(terminal) => Some(terminal),
            Node::NonTerminal(_) => None,
        }
    }

    /// Get a `Option<&NonTerminal>`.
    ///
    /// Returns `None` if `self` is a `Node::Terminal`.
    pub fn nonterminal(&self) -> Option<&NonTerminal> {
        match self {
            Node::Terminal(_) => None,
            Node::NonTerminal(inner) => Some(inner),
        }
    }

    /// Get a `Node`'s span.
    pub fn span(&self) -> Span {
        match self {
            Node::Terminal(terminal) => terminal.span,
            Node::NonTerminal(inner) => inner.span,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Terminal(terminal) => write!(f, "{}", terminal),
            Node::NonTerminal(nt) => write!(f, "{}", nt),
        }
    }
}

/// Struct representing a non terminal tree node.
///
/// `NonTerminal`s are defined by their `label`, optional `annotation` and their covered `span`.
/// Preterminals, the part-of-speech level directly above a terminal, are `NonTerminal`s too.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NonTerminal {
    label: String,
    annotation: Option<String>,
    span: Span,
}

impl NonTerminal {
    pub(crate) fn new(label: impl Into<String>, span: impl Into<Span>) -> Self {
        NonTerminal {
            label: label.into(),
            annotation: None,
            span: span.into(),
        }
    }

    pub(crate) fn new_with_annotation(
        label: impl Into<String>,
        annotation: Option<impl Into<String>>,
        span: impl Into<Span>,
    ) -> Self {
        NonTerminal {
            label: label.into(),
            annotation: annotation.map(Into::into),
            span: span.into(),
        }
    }

    /// Get the `NonTerminal`'s span.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Return the label of the `NonTerminal`.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Return annotation if present.
    ///
    /// Annotations are functional tags split off the label, e.g. `SBJ` in `NP-SBJ`.
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_ref().map(String::as_str)
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Struct representing a Terminal.
///
/// `Terminal`s are leaves of the tree, they carry the word form and their position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Terminal {
    form: String,
    span: Span,
}

impl Terminal {
    pub(crate) fn new(form: impl Into<String>, idx: usize) -> Self {
        Terminal {
            form: form.into(),
            span: idx.into(),
        }
    }

    /// Returns the `Terminal`'s span.
    ///
    /// A `Terminal`'s span is defined as a tuple `(n, n+1)` where `n` is the 0-based position of
    /// the `Terminal` in the sentence.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Return the `Terminal`s form.
    pub fn form(&self) -> &str {
        self.form.as_str()
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.form)
    }
}
