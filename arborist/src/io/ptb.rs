use std::io::{BufRead, Lines, Write};

use failure::Error;
use pest::iterators::Pair;
use pest::Parser;
use petgraph::prelude::{NodeIndex, StableGraph};

use crate::io::{ReadTree, WriteTree};
use crate::{Node, NonTerminal, Span, Terminal, Tree};

/// `PTBFormat`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PTBFormat {
    /// PTB V2 Format.
    ///
    /// Some nodes contain additional functional tags. Node labels are split on the first `"-"`
    /// or `"="` that is not the first character of the label, the remainder is put into the
    /// `annotation` field. Labels like `-NONE-` or `-LRB-` are kept intact.
    ///
    /// E.g. `"(NP-SBJ-1 (DT the) (NN cat))"` results in a non-terminal with:
    /// * `label == "NP"`
    /// * `annotation == Some("SBJ-1")`
    PTB,
    /// Simple Format.
    ///
    /// Assumes trees don't include any annotations, labels are taken verbatim.
    ///
    /// E.g. `"(NP-SBJ (DT the) (NN cat))"` results in a non-terminal with:
    /// * `label == "NP-SBJ"`
    /// * `annotation == None`
    Simple,
}

// dummy struct required by pest
#[derive(Parser)]
#[grammar = "io/ptb.pest"]
struct PTBParser;

impl ReadTree for PTBFormat {
    fn string_to_tree(&self, string: &str) -> Result<Tree, Error> {
        let mut graph = StableGraph::new();
        let mut n_terminals = 0;
        let mut parsed_line = PTBParser::parse(Rule::tree, string)?;
        let pair = parsed_line
            .next()
            .ok_or_else(|| format_err!("Empty bracket string."))?;
        let (_, root) = self.parse_value(pair, &mut graph, &mut n_terminals)?;
        Ok(Tree::new(graph, n_terminals, root))
    }
}

impl PTBFormat {
    pub fn try_from_str(s: &str) -> Result<PTBFormat, Error> {
        let s = s.to_lowercase();
        match s.as_str() {
            "ptb" => Ok(PTBFormat::PTB),
            "simple" => Ok(PTBFormat::Simple),
            _ => Err(format_err!("Unknown format: {}", s)),
        }
    }

    /// Returns the linearized (bracketed) representation of a `Tree`.
    ///
    /// Parentheses `"("` and `")"` in labels and forms are replaced by `"LBR"` and `"RBR"`.
    pub fn tree_to_string(&self, tree: &Tree) -> String {
        self.format_sub_tree(tree, tree.root())
    }

    fn format_sub_tree(&self, tree: &Tree, position: NodeIndex) -> String {
        match &tree[position] {
            Node::Terminal(terminal) => escape(terminal.form()),
            Node::NonTerminal(nt) => {
                let children = tree.children(position);
                let mut sub_tree_rep = Vec::with_capacity(children.len() + 1);
                let label = self.fmt_inner(nt);
                if !label.is_empty() {
                    sub_tree_rep.push(label);
                }
                sub_tree_rep.extend(
                    children
                        .into_iter()
                        .map(|child| self.format_sub_tree(tree, child)),
                );
                format!("({})", sub_tree_rep.join(" "))
            }
        }
    }

    fn fmt_inner(&self, nt: &NonTerminal) -> String {
        let mut representation = escape(nt.label());
        if let (PTBFormat::PTB, Some(annotation)) = (self, nt.annotation()) {
            representation.push('-');
            representation.push_str(annotation);
        }
        representation
    }

    // this method traverses the linearized tree and builds a StableGraph
    fn parse_value(
        &self,
        pair: Pair<Rule>,
        g: &mut StableGraph<Node, ()>,
        terminals: &mut usize,
    ) -> Result<(Span, NodeIndex), Error> {
        match pair.as_rule() {
            Rule::nonterminal => {
                let mut pairs = pair.into_inner().peekable();
                // the label is optional, e.g. the unlabeled root "( (S ...))"
                let label = match pairs.peek() {
                    Some(label) if label.as_rule() == Rule::node_label => {
                        let label = label.as_str();
                        pairs.next();
                        label
                    }
                    _ => "",
                };
                let (label, annotation) = self.process_label(label);

                // collect children
                let mut children = Vec::new();
                let mut lower = None;
                let mut upper = 0;
                for inner_pair in pairs {
                    let (span, child_idx) = self.parse_value(inner_pair, g, terminals)?;
                    lower.get_or_insert(span.start);
                    upper = span.end;
                    children.push(child_idx);
                }
                let lower = lower.ok_or_else(|| format_err!("Nonterminal without children."))?;
                let span = Span::new(lower, upper);
                let nt = NonTerminal::new_with_annotation(label, annotation, span);
                let nt_idx = g.add_node(Node::NonTerminal(nt));
                for child_idx in children {
                    g.add_edge(nt_idx, child_idx, ());
                }
                Ok((span, nt_idx))
            }
            Rule::terminal => {
                let term_idx = g.add_node(Node::Terminal(Terminal::new(pair.as_str(), *terminals)));
                let span = Span::from(*terminals);
                *terminals += 1;
                Ok((span, term_idx))
            }
            rule => Err(format_err!("Unexpected rule: {:?}", rule)),
        }
    }

    // Splits functional annotations off node labels.
    fn process_label<'a>(&self, label: &'a str) -> (&'a str, Option<&'a str>) {
        match self {
            PTBFormat::PTB => {
                match label
                    .char_indices()
                    .skip(1)
                    .find(|(_, c)| *c == '-' || *c == '=')
                {
                    Some((idx, _)) if idx + 1 < label.len() => {
                        (&label[..idx], Some(&label[idx + 1..]))
                    }
                    _ => (label, None),
                }
            }
            PTBFormat::Simple => (label, None),
        }
    }
}

fn escape(s: &str) -> String {
    s.replace("(", "LBR").replace(")", "RBR")
}

/// `PTBLineFormat`.
///
/// This enum specifies whether the trees are encoded in single-line or multi-line format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PTBLineFormat {
    SingleLine,
    MultiLine,
}

/// Iterator over trees in PTB format file.
pub struct PTBReader<R> {
    inner: Lines<R>,
    line_format: PTBLineFormat,
    format: PTBFormat,
}

impl<R> Iterator for PTBReader<R>
where
    R: BufRead,
{
    type Item = Result<Tree, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let PTBLineFormat::SingleLine = self.line_format {
            while let Some(line) = self.inner.next() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => return Some(Err(err.into())),
                };
                if line.starts_with('%') || line.trim().is_empty() {
                    continue;
                }
                return Some(self.format.string_to_tree(&line));
            }
            None
        } else {
            let mut buffer = String::new();
            let mut open = 0;
            while let Some(line) = self.inner.next() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => return Some(Err(err.into())),
                };
                if (line.starts_with('%') && buffer.is_empty()) || line.trim().is_empty() {
                    continue;
                }
                open += count_pars(&line);
                buffer.push_str(line.as_str());
                if open <= 0 {
                    return Some(self.format.string_to_tree(&buffer));
                }
            }
            if buffer.is_empty() {
                None
            } else {
                Some(Err(format_err!("Unbalanced parentheses at end of input.")))
            }
        }
    }
}

impl<R> PTBReader<R>
where
    R: BufRead,
{
    /// Constructs a new tree reader.
    pub fn new(read: R, format: PTBFormat, line_format: PTBLineFormat) -> Self {
        PTBReader {
            inner: read.lines(),
            format,
            line_format,
        }
    }
}

/// Writer for bracketed trees, one tree per line.
pub struct PTBWriter<W> {
    writer: W,
    format: PTBFormat,
}

impl<W> PTBWriter<W>
where
    W: Write,
{
    pub fn new(writer: W, format: PTBFormat) -> Self {
        PTBWriter { writer, format }
    }
}

impl<W> WriteTree for PTBWriter<W>
where
    W: Write,
{
    fn write_tree(&mut self, tree: &Tree) -> Result<(), Error> {
        writeln!(self.writer, "{}", self.format.tree_to_string(tree))?;
        Ok(())
    }
}

/// Returns the balance of opening and closing parentheses on a line.
///
/// Positive values indicate more opening than closing parentheses.
pub(crate) fn count_pars(line: &str) -> isize {
    line.chars().fold(0, |open, c| match c {
        '(' => open + 1,
        ')' => open - 1,
        _ => open,
    })
}
