//! PARSEVAL scoring of constituency trees.
//!
//! Trees are compared through their labeled brackets. A bracket is the label of a
//! non-terminal together with the span of terminals it covers. Two brackets match iff both
//! label and span are identical.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use tracing::warn;

use crate::errors::ScoreError;
use crate::util::LabelSet;
use crate::{Span, Tree};

/// Labeled bracket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Bracket<'a> {
    pub span: Span,
    pub label: &'a str,
}

/// Policy for pairs of trees whose recall and precision are both `0`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DegeneratePolicy {
    /// Return `ScoreError::DegenerateScore`.
    Fail,
    /// Score the pair with recall, precision and F-score `0`.
    Zero,
}

/// Scoring configuration.
#[derive(Clone, Debug)]
pub struct ScoreConfig {
    /// Whether preterminals, non-terminals immediately dominating a single terminal, count as
    /// brackets. EVALB doesn't count them.
    pub count_preterminals: bool,
    /// Brackets with a label matched by this set are not counted.
    pub ignore: LabelSet,
    pub degenerate: DegeneratePolicy,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        ScoreConfig {
            count_preterminals: true,
            ignore: LabelSet::default(),
            degenerate: DegeneratePolicy::Fail,
        }
    }
}

/// Get the brackets of a tree.
///
/// Brackets are sorted by span and label. The tree is only read.
pub fn brackets<'a>(tree: &'a Tree, config: &ScoreConfig) -> Vec<Bracket<'a>> {
    let mut brackets = tree
        .nonterminals()
        .filter(|&idx| config.count_preterminals || !is_preterminal(tree, idx))
        .filter_map(|idx| tree[idx].nonterminal())
        .filter(|nt| !config.ignore.matches(nt.label()))
        .map(|nt| Bracket {
            span: nt.span(),
            label: nt.label(),
        })
        .collect::<Vec<_>>();
    brackets.sort();
    brackets
}

fn is_preterminal(tree: &Tree, idx: petgraph::prelude::NodeIndex) -> bool {
    let children = tree.children(idx);
    children.len() == 1 && tree[children[0]].is_terminal()
}

/// Result of scoring a hypothesis against a reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParseScore {
    recall: f64,
    precision: f64,
    f_score: f64,
}

impl ParseScore {
    /// Construct a score from recall and precision.
    ///
    /// Returns `None` if both are `0`, the F-score is undefined in that case.
    pub fn new(recall: f64, precision: f64) -> Option<Self> {
        if recall + precision == 0. {
            return None;
        }
        Some(ParseScore {
            recall,
            precision,
            f_score: 2. * recall * precision / (recall + precision),
        })
    }

    /// Score of a tree compared to itself.
    pub fn perfect() -> Self {
        ParseScore {
            recall: 1.,
            precision: 1.,
            f_score: 1.,
        }
    }

    /// Score of trees without any matching brackets.
    pub fn zero() -> Self {
        ParseScore {
            recall: 0.,
            precision: 0.,
            f_score: 0.,
        }
    }

    /// Fraction of the reference brackets found in the hypothesis.
    pub fn recall(&self) -> f64 {
        self.recall
    }

    /// Fraction of the hypothesis brackets found in the reference.
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Harmonic mean of recall and precision.
    pub fn f_score(&self) -> f64 {
        self.f_score
    }
}

impl fmt::Display for ParseScore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2})",
            self.recall, self.precision, self.f_score
        )
    }
}

/// All-pairs scores of a list of trees.
///
/// The entry at `(i, j)` scores tree `i` as hypothesis against tree `j` as reference.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMatrix {
    scores: Vec<Vec<ParseScore>>,
}

impl ScoreMatrix {
    /// Number of scored trees.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, hypothesis: usize, reference: usize) -> Option<&ParseScore> {
        self.scores.get(hypothesis).and_then(|row| row.get(reference))
    }

    /// Get an iterator over the rows, one row per hypothesis.
    pub fn rows<'a>(&'a self) -> impl Iterator<Item = &'a [ParseScore]> + 'a {
        self.scores.iter().map(Vec::as_slice)
    }
}

impl Index<(usize, usize)> for ScoreMatrix {
    type Output = ParseScore;

    fn index(&self, (hypothesis, reference): (usize, usize)) -> &ParseScore {
        &self.scores[hypothesis][reference]
    }
}

impl fmt::Display for ScoreMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.scores {
            let row = row.iter().map(ToString::to_string).collect::<Vec<_>>();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

/// Score `hypothesis` against `reference`.
///
/// The trees are expected to cover the same sentence. Every call runs the matching, a tree
/// scored against itself gets recall and precision `1` by the matching itself.
pub fn score(
    hypothesis: &Tree,
    reference: &Tree,
    config: &ScoreConfig,
) -> Result<ParseScore, ScoreError> {
    check_terminals(hypothesis, 0)?;
    check_terminals(reference, 1)?;
    let hyp = count_brackets(brackets(hypothesis, config));
    let refs = count_brackets(brackets(reference, config));
    score_brackets(&hyp, &refs, (0, hypothesis), (1, reference), config)
}

/// Score all pairs of `trees`.
///
/// Diagonal entries are perfect scores without running the matching.
pub fn score_matrix<T>(trees: &[T], config: &ScoreConfig) -> Result<ScoreMatrix, ScoreError>
where
    T: Borrow<Tree>,
{
    for (idx, tree) in trees.iter().enumerate() {
        check_terminals(tree.borrow(), idx)?;
    }
    let counts = trees
        .iter()
        .map(|tree| count_brackets(brackets(tree.borrow(), config)))
        .collect::<Vec<_>>();

    let mut scores = Vec::with_capacity(trees.len());
    for (i, hyp) in trees.iter().enumerate() {
        let mut row = Vec::with_capacity(trees.len());
        for (j, reference) in trees.iter().enumerate() {
            if i == j {
                row.push(ParseScore::perfect());
                continue;
            }
            row.push(score_brackets(
                &counts[i],
                &counts[j],
                (i, hyp.borrow()),
                (j, reference.borrow()),
                config,
            )?);
        }
        scores.push(row);
    }
    Ok(ScoreMatrix { scores })
}

fn check_terminals(tree: &Tree, index: usize) -> Result<(), ScoreError> {
    if tree.n_terminals() == 0 {
        Err(ScoreError::EmptyTree { index })
    } else {
        Ok(())
    }
}

fn count_brackets(brackets: Vec<Bracket>) -> HashMap<Bracket, usize> {
    let mut counts = HashMap::new();
    for bracket in brackets {
        *counts.entry(bracket).or_insert(0) += 1;
    }
    counts
}

fn score_brackets(
    hyp: &HashMap<Bracket, usize>,
    refs: &HashMap<Bracket, usize>,
    (hyp_idx, hyp_tree): (usize, &Tree),
    (ref_idx, ref_tree): (usize, &Tree),
    config: &ScoreConfig,
) -> Result<ParseScore, ScoreError> {
    if hyp_tree.n_terminals() != ref_tree.n_terminals() {
        warn!(
            "Hypothesis {} has {} terminals, reference {} has {}",
            hyp_idx,
            hyp_tree.n_terminals(),
            ref_idx,
            ref_tree.n_terminals()
        );
    }

    let n_hyp = hyp.values().sum::<usize>();
    let n_ref = refs.values().sum::<usize>();
    // trees without brackets agree with each other
    if n_hyp == 0 && n_ref == 0 {
        return Ok(ParseScore::perfect());
    }

    // duplicate brackets match at most as often as they occur in both trees
    let matching = hyp
        .iter()
        .map(|(bracket, &count)| refs.get(bracket).map(|&c| c.min(count)).unwrap_or(0))
        .sum::<usize>();
    let recall = ratio(matching, n_ref);
    let precision = ratio(matching, n_hyp);

    match (ParseScore::new(recall, precision), config.degenerate) {
        (Some(score), _) => Ok(score),
        (None, DegeneratePolicy::Zero) => Ok(ParseScore::zero()),
        (None, DegeneratePolicy::Fail) => Err(ScoreError::DegenerateScore {
            hypothesis: hyp_idx,
            reference: ref_idx,
        }),
    }
}

fn ratio(matching: usize, total: usize) -> f64 {
    if total == 0 {
        0.
    } else {
        matching as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use petgraph::prelude::StableGraph;

    use super::{
        brackets, score, score_matrix, Bracket, DegeneratePolicy, ParseScore, ScoreConfig,
    };
    use crate::errors::ScoreError;
    use crate::io::{PTBFormat, ReadTree};
    use crate::util::LabelSet;
    use crate::{Node, NonTerminal, Span, Tree};

    static A: &str = "(S (NP (DET the) (NN cat)) (VP (VERB sat)))";
    // VP mislabeled as NP
    static B: &str = "(S (NP (DET the) (NN cat)) (NP (VERB sat)))";
    // flat, without the subject NP
    static C: &str = "(S (DET the) (NN cat) (VP (VERB sat)))";

    fn tree(s: &str) -> Tree {
        PTBFormat::Simple.string_to_tree(s).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn tree_brackets() {
        let a = tree(A);
        let brackets = brackets(&a, &ScoreConfig::default());
        assert_eq!(
            brackets,
            vec![
                Bracket {
                    span: Span::from(0),
                    label: "DET"
                },
                Bracket {
                    span: Span::new(0, 2),
                    label: "NP"
                },
                Bracket {
                    span: Span::new(0, 3),
                    label: "S"
                },
                Bracket {
                    span: Span::from(1),
                    label: "NN"
                },
                Bracket {
                    span: Span::from(2),
                    label: "VERB"
                },
                Bracket {
                    span: Span::from(2),
                    label: "VP"
                },
            ]
        );
    }

    #[test]
    fn evalb_brackets() {
        let a = tree(A);
        let config = ScoreConfig {
            count_preterminals: false,
            ignore: vec!["S"].into_iter().collect::<LabelSet>(),
            ..ScoreConfig::default()
        };
        let labels = brackets(&a, &config)
            .into_iter()
            .map(|bracket| bracket.label)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["NP", "VP"]);
    }

    #[test]
    fn reflexive() {
        let config = ScoreConfig::default();
        for s in &[A, B, C, "(X a)"] {
            let t = tree(s);
            assert_eq!(score(&t, &t, &config).unwrap(), ParseScore::perfect());
        }
    }

    #[test]
    fn label_sensitive() {
        let a = tree(A);
        let b = tree(B);
        let result = score(&a, &b, &ScoreConfig::default()).unwrap();
        assert_close(result.recall(), 5. / 6.);
        assert_close(result.precision(), 5. / 6.);
        assert_close(result.f_score(), 5. / 6.);
        assert!(result.f_score() < 1.);
    }

    #[test]
    fn direction_sensitive() {
        let a = tree(A);
        let c = tree(C);
        let config = ScoreConfig::default();
        let a_c = score(&a, &c, &config).unwrap();
        let c_a = score(&c, &a, &config).unwrap();
        assert_close(a_c.recall(), 1.);
        assert_close(a_c.precision(), 5. / 6.);
        assert_close(c_a.recall(), 5. / 6.);
        assert_close(c_a.precision(), 1.);
        assert_eq!(a_c.recall(), c_a.precision());
        assert_eq!(a_c.precision(), c_a.recall());
        assert_close(a_c.f_score(), 10. / 11.);
    }

    #[test]
    fn duplicate_brackets() {
        let chain = tree("(NP (NP (NN cats)))");
        let single = tree("(NP (NN cats))");
        let config = ScoreConfig::default();
        let result = score(&single, &chain, &config).unwrap();
        assert_close(result.recall(), 2. / 3.);
        assert_close(result.precision(), 1.);
    }

    #[test]
    fn matrix() {
        let trees = vec![tree(A), tree(A), tree(B)];
        let matrix = score_matrix(&trees, &ScoreConfig::default()).unwrap();
        assert_eq!(matrix.len(), 3);
        for i in 0..3 {
            assert_eq!(matrix[(i, i)], ParseScore::perfect());
        }
        assert_eq!(matrix[(0, 1)], ParseScore::perfect());
        assert_eq!(matrix[(1, 0)], ParseScore::perfect());
        assert_eq!(matrix[(0, 2)], matrix[(1, 2)]);
        assert_eq!(matrix[(2, 0)], matrix[(2, 1)]);
        assert_close(matrix[(0, 2)].recall(), 5. / 6.);
        assert_eq!(matrix.get(3, 0), None);
        assert_eq!(matrix.rows().count(), 3);
        assert_eq!(
            matrix.to_string().lines().next().unwrap(),
            "(1.00, 1.00, 1.00) (1.00, 1.00, 1.00) (0.83, 0.83, 0.83)"
        );
    }

    #[test]
    fn matrix_of_references() {
        let a = tree(A);
        let c = tree(C);
        let matrix = score_matrix(&[&a, &c], &ScoreConfig::default()).unwrap();
        assert_eq!(
            matrix[(0, 1)],
            score(&a, &c, &ScoreConfig::default()).unwrap()
        );
        assert!(score_matrix::<Tree>(&[], &ScoreConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn degenerate() {
        let a = tree("(S (NP cats) (VP sleep))");
        let b = tree("(X (Y cats) (Z sleep))");
        let config = ScoreConfig::default();
        assert_eq!(
            score(&a, &b, &config),
            Err(ScoreError::DegenerateScore {
                hypothesis: 0,
                reference: 1
            })
        );
        assert_eq!(
            score_matrix(&[a.clone(), a.clone(), b.clone()], &config),
            Err(ScoreError::DegenerateScore {
                hypothesis: 0,
                reference: 2
            })
        );
        let config = ScoreConfig {
            degenerate: DegeneratePolicy::Zero,
            ..ScoreConfig::default()
        };
        assert_eq!(score(&a, &b, &config).unwrap(), ParseScore::zero());
        assert_eq!(ParseScore::new(0., 0.), None);
    }

    #[test]
    fn without_brackets() {
        let config = ScoreConfig {
            count_preterminals: false,
            ..ScoreConfig::default()
        };
        let single = tree("(X a)");
        let other = tree("(Y a)");
        assert_eq!(score(&single, &other, &config).unwrap(), ParseScore::perfect());
        let bracketed = tree("(S (X a) (Y b))");
        assert!(score(&single, &bracketed, &config).is_err());
        let zero = ScoreConfig {
            degenerate: DegeneratePolicy::Zero,
            ..config
        };
        assert_eq!(
            score(&single, &bracketed, &zero).unwrap(),
            ParseScore::zero()
        );
    }

    #[test]
    fn empty_tree() {
        let mut g = StableGraph::new();
        let root = g.add_node(Node::NonTerminal(NonTerminal::new("S", 0)));
        let empty = Tree::new(g, 0, root);
        let a = tree(A);
        assert_eq!(
            score(&a, &empty, &ScoreConfig::default()),
            Err(ScoreError::EmptyTree { index: 1 })
        );
        assert_eq!(
            score_matrix(&[&a, &a, &empty], &ScoreConfig::default()),
            Err(ScoreError::EmptyTree { index: 2 })
        );
    }

    #[test]
    fn concurrent_scoring() {
        let trees = vec![tree(A), tree(B), tree(C)];
        let config = ScoreConfig::default();
        let expected = score_matrix(&trees, &config).unwrap();
        thread::scope(|scope| {
            let handles = (0..4)
                .map(|_| scope.spawn(|| score_matrix(&trees, &config).unwrap()))
                .collect::<Vec<_>>();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
        assert_eq!(trees[0], tree(A));
    }

    #[test]
    fn display() {
        let result = ParseScore::new(0.5, 1.).unwrap();
        assert_eq!(result.to_string(), "(0.50, 1.00, 0.67)");
    }
}
