use std::cmp::Ordering;
use std::ops::Index;

use petgraph::prelude::{Direction, EdgeIndex, EdgeRef, NodeIndex, StableGraph};

use crate::Node;

/// `Tree`
///
/// `Tree`s represent constituency trees and consist of `Node`s. The nodes are either
/// `Terminal`s or `NonTerminal`s. The tree owns all of its nodes, dominance is expressed
/// through unlabeled edges from parent to child.
#[derive(Debug, Clone)]
pub struct Tree {
    graph: StableGraph<Node, ()>,
    n_terminals: usize,
    root: NodeIndex,
}

impl Tree {
    pub(crate) fn new(graph: StableGraph<Node, ()>, n_terminals: usize, root: NodeIndex) -> Self {
        Tree {
            graph,
            n_terminals,
            root,
        }
    }

    /// Get the number of terminals in the tree.
    pub fn n_terminals(&self) -> usize {
        self.n_terminals
    }

    /// Get the index of the root of the tree.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: NodeIndex) {
        self.root = root;
    }

    /// Get the terminals in the constituency tree.
    ///
    /// Terminals are ordered by their position in the sentence.
    pub fn terminals(&self) -> Vec<NodeIndex> {
        let mut terminals = self
            .graph
            .node_indices()
            .filter(|idx| self.graph[*idx].is_terminal())
            .collect::<Vec<_>>();
        terminals.sort_by_key(|idx| self.graph[*idx].span());
        terminals
    }

    /// Get an iterator over the nonterminal indices in the constituency tree.
    pub fn nonterminals<'a>(&'a self) -> impl Iterator<Item = NodeIndex> + 'a {
        self.graph
            .node_indices()
            .filter(move |idx| !self.graph[*idx].is_terminal())
    }

    /// Get the forms of the terminals in sentence order.
    pub fn leaves(&self) -> Vec<&str> {
        self.terminals()
            .into_iter()
            .filter_map(|idx| self.graph[idx].terminal().map(|t| t.form()))
            .collect()
    }

    /// Get the parent and corresponding edge of a tree node.
    ///
    /// * Returns `NodeIndex` of immediately dominating node and corresponding `EdgeIndex`.
    /// * Returns `None` if `node` doesn't exist or doesn't have incoming edges.
    pub fn parent(&self, node: NodeIndex) -> Option<(NodeIndex, EdgeIndex)> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge_ref| (edge_ref.source(), edge_ref.id()))
    }

    /// Get `node`'s children, ordered by their spans.
    pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut children = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge_ref| edge_ref.target())
            .collect::<Vec<_>>();
        children.sort_by_key(|idx| self.graph[*idx].span());
        children
    }

    /// Get a mutable reference to the underlying `StableGraph`.
    pub(crate) fn graph_mut(&mut self) -> &mut StableGraph<Node, ()> {
        &mut self.graph
    }

    // helper method to sort a vec of node indices
    // order is determined by:
    // 1. lower bound of span (starting point of span)
    // 2. upper bound of span (end point of span)
    // 3. Inner nodes before terminal nodes
    // 4. alphabetical order
    fn sort_indices(&self, indices: &mut Vec<NodeIndex>) {
        indices.sort_by(
            |node1, node2| match self[*node1].span().cmp(&self[*node2].span()) {
                Ordering::Equal => match (&self[*node1], &self[*node2]) {
                    (Node::NonTerminal(_), Node::Terminal(_)) => Ordering::Greater,
                    (Node::Terminal(_), Node::NonTerminal(_)) => Ordering::Less,
                    (Node::NonTerminal(nt1), Node::NonTerminal(nt2)) => {
                        nt1.label().cmp(nt2.label())
                    }
                    (Node::Terminal(t1), Node::Terminal(t2)) => t1.form().cmp(t2.form()),
                },
                ordering => ordering,
            },
        );
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Tree) -> bool {
        // cheap checks first, node count and number of terminals
        if self.n_terminals != other.n_terminals {
            return false;
        };
        if self.graph.node_count() != other.graph.node_count() {
            return false;
        };

        // sort indices by criteria defined above
        let mut nodes1 = self.graph.node_indices().collect::<Vec<_>>();
        self.sort_indices(&mut nodes1);
        let mut nodes2 = other.graph.node_indices().collect::<Vec<_>>();
        other.sort_indices(&mut nodes2);

        // two trees are equal iff after sorting for all node pairs (node1, node2) it holds that
        // node1 == node2 and parent(node1) == parent(node2)
        for (node1, node2) in nodes1.into_iter().zip(nodes2) {
            if self[node1] != other[node2] {
                return false;
            }
            let p1 = self.parent(node1).map(|(parent_id, _)| &self[parent_id]);
            let p2 = other.parent(node2).map(|(parent_id, _)| &other[parent_id]);
            if p1 != p2 {
                return false;
            }
        }
        true
    }
}

impl Index<NodeIndex> for Tree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &<Self as Index<NodeIndex>>::Output {
        &self.graph[index]
    }
}

#[cfg(test)]
mod tests {
    use petgraph::prelude::StableGraph;

    use crate::io::{PTBFormat, ReadTree};
    use crate::{Node, NonTerminal, Span, Terminal, Tree};

    #[test]
    fn terminals() {
        let tree = some_tree();
        let terminals = tree
            .terminals()
            .into_iter()
            .map(|terminal| tree[terminal].terminal().unwrap().form())
            .collect::<Vec<_>>();
        assert_eq!(vec!["t1", "t2", "t3", "t4", "t5"], terminals);
        assert_eq!(tree.leaves(), terminals);
        assert_eq!(tree.nonterminals().count(), 3);
    }

    #[test]
    fn children_in_order() {
        let tree = some_tree();
        let children = tree
            .children(tree.root())
            .into_iter()
            .map(|child| tree[child].to_string())
            .collect::<Vec<_>>();
        assert_eq!(children, vec!["FIRST", "t3", "SECOND", "t5"]);
        assert!(tree.parent(tree.root()).is_none());
    }

    #[test]
    fn equality() {
        //(ROOT (FIRST t1 t2) t3 (SECOND t4) t5)
        let mut g = StableGraph::new();
        let term1 = Terminal::new("t1", 0);
        let term2 = Terminal::new("t2", 1);
        let root = NonTerminal::new("ROOT", Span::new(0, 5));
        let first = NonTerminal::new("FIRST", Span::new(0, 2));
        let second = NonTerminal::new("SECOND", Span::new(3, 4));
        let term4 = Terminal::new("t4", 3);
        let term5 = Terminal::new("t5", 4);
        let term3 = Terminal::new("t3", 2);
        let term1_idx = g.add_node(Node::Terminal(term1));
        let term3_idx = g.add_node(Node::Terminal(term3));
        let term2_idx = g.add_node(Node::Terminal(term2.clone()));
        let first_idx = g.add_node(Node::NonTerminal(first));
        let term4_idx = g.add_node(Node::Terminal(term4));
        let root_idx = g.add_node(Node::NonTerminal(root));
        let second_idx = g.add_node(Node::NonTerminal(second));
        let term5_idx = g.add_node(Node::Terminal(term5));
        g.add_edge(root_idx, second_idx, ());
        g.add_edge(first_idx, term2_idx, ());
        g.add_edge(root_idx, term3_idx, ());
        g.add_edge(first_idx, term1_idx, ());
        g.add_edge(root_idx, term5_idx, ());
        g.add_edge(second_idx, term4_idx, ());
        g.add_edge(root_idx, first_idx, ());
        let some_tree = some_tree();
        let other_tree = Tree::new(g.clone(), 5, root_idx);
        assert_eq!(some_tree, other_tree);
        let relabeled = PTBFormat::Simple
            .string_to_tree("(ROOT (OTHER t1 t2) t3 (SECOND t4) t5)")
            .unwrap();
        assert_ne!(some_tree, relabeled);
        g.remove_node(term2_idx);
        let other_tree = Tree::new(g.clone(), 4, root_idx);
        assert_ne!(some_tree, other_tree);
        let new_t2_idx = g.add_node(Node::Terminal(term2));
        g.add_edge(first_idx, new_t2_idx, ());
        let other_tree = Tree::new(g.clone(), 5, root_idx);
        assert_eq!(some_tree, other_tree);
    }

    fn some_tree() -> Tree {
        //(ROOT (FIRST t1 t2) t3 (SECOND t4) t5)
        let mut g = StableGraph::new();
        let root = NonTerminal::new("ROOT", Span::new(0, 5));
        let first = NonTerminal::new("FIRST", Span::new(0, 2));
        let term1 = Terminal::new("t1", 0);
        let term2 = Terminal::new("t2", 1);
        let term3 = Terminal::new("t3", 2);
        let second = NonTerminal::new("SECOND", Span::new(3, 4));
        let term4 = Terminal::new("t4", 3);
        let term5 = Terminal::new("t5", 4);
        let root_idx = g.add_node(Node::NonTerminal(root));
        let first_idx = g.add_node(Node::NonTerminal(first));
        let term1_idx = g.add_node(Node::Terminal(term1));
        let term2_idx = g.add_node(Node::Terminal(term2));
        g.add_edge(root_idx, first_idx, ());
        g.add_edge(first_idx, term1_idx, ());
        g.add_edge(first_idx, term2_idx, ());
        let term3_idx = g.add_node(Node::Terminal(term3));
        g.add_edge(root_idx, term3_idx, ());
        let second_idx = g.add_node(Node::NonTerminal(second));
        g.add_edge(root_idx, second_idx, ());
        let term4_idx = g.add_node(Node::Terminal(term4));
        g.add_edge(second_idx, term4_idx, ());
        let term5_idx = g.add_node(Node::Terminal(term5));
        g.add_edge(root_idx, term5_idx, ());

        Tree::new(g, 5, root_idx)
    }
}
