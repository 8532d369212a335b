use failure::Error;

use crate::{Node, NonTerminal, Tree};

/// Trait to annotate Part of Speech tags.
///
/// A preterminal labeled with the part of speech is inserted above each terminal, in sentence
/// order. Calling this on an annotated tree nests another level, it is only applied while
/// constructing a `Sentence`.
///
/// Returns:
/// * `Error` if length of `self` and `pos_iter` don't match, the tree is left unchanged.
/// * `Ok` otherwise.
pub(crate) trait AnnotatePOS {
    fn annotate_pos<S>(&mut self, pos_iter: impl IntoIterator<Item = S>) -> Result<(), Error>
    where
        S: Into<String>;
}

impl AnnotatePOS for Tree {
    fn annotate_pos<S>(&mut self, pos_iter: impl IntoIterator<Item = S>) -> Result<(), Error>
    where
        S: Into<String>,
    {
        let terminals = self.terminals();
        let tags = pos_iter.into_iter().map(Into::into).collect::<Vec<String>>();
        if tags.len() < terminals.len() {
            return Err(format_err!("Not enough POS tags were provided"));
        } else if tags.len() > terminals.len() {
            return Err(format_err!(
                "Number of POS tags is greater than number of terminals."
            ));
        }

        for (terminal, tag) in terminals.into_iter().zip(tags) {
            let span = self[terminal].span();
            let preterminal = self
                .graph_mut()
                .add_node(Node::NonTerminal(NonTerminal::new(tag, span)));
            match self.parent(terminal) {
                Some((parent, edge_id)) => {
                    self.graph_mut().remove_edge(edge_id);
                    self.graph_mut().add_edge(parent, preterminal, ());
                }
                None => self.set_root(preterminal),
            }
            self.graph_mut().add_edge(preterminal, terminal, ());
        }
        Ok(())
    }
}

/// Trait specifying methods to modify tree structure.
pub trait TreeOps {
    /// Remove the root node.
    ///
    /// Parsers wrap their output in an additional root, e.g. `(ROOT (S ...))` or `( (S ...))`.
    /// The root is removed if it immediately dominates exactly one non-terminal, which becomes
    /// the new root. Returns `Error` for any other tree shape.
    fn strip_root(&mut self) -> Result<(), Error>;
}

impl TreeOps for Tree {
    fn strip_root(&mut self) -> Result<(), Error> {
        let root = self.root();
        let children = self.children(root);
        if children.len() != 1 {
            return Err(format_err!(
                "Can't strip root {:?} with {} children.",
                self[root].to_string(),
                children.len()
            ));
        }
        let child = children[0];
        if self[child].is_terminal() {
            return Err(format_err!(
                "Can't strip root {:?} above terminal {:?}.",
                self[root].to_string(),
                self[child].to_string()
            ));
        }
        self.graph_mut().remove_node(root);
        self.set_root(child);
        Ok(())
    }
}
