use conllx::graph::{DepTriple, Sentence as ConllxSentence};
use conllx::token::{Token as ConllxToken, TokenBuilder};
use failure::Error;

use crate::corpus::{Sentence, Token};

/// Conversion Trait to CONLLX.
///
/// Creates a `conllx::token::Token` for each `Token` of the sentence and attaches the
/// dependency arcs. The universal part-of-speech tag becomes the coarse tag, the treebank tag
/// the fine-grained tag.
pub trait ToConllx {
    fn to_conllx(&self) -> Result<ConllxSentence, Error>;
}

impl ToConllx for Sentence {
    fn to_conllx(&self) -> Result<ConllxSentence, Error> {
        let mut sentence = ConllxSentence::new();
        for token in self.tokens() {
            sentence.push(token.into());
        }

        let n_tokens = self.tokens().len();
        for arc in self.dependency_parse().arcs() {
            if arc.dependent() == 0 || arc.dependent() > n_tokens {
                return Err(format_err!(
                    "Dependent {} of sentence {} is out of range.",
                    arc.dependent(),
                    self.ordinal()
                ));
            }
            // root arcs don't always point to the virtual root
            let head = if arc.is_root() { 0 } else { arc.head() };
            if head > n_tokens {
                return Err(format_err!(
                    "Head {} of sentence {} is out of range.",
                    head,
                    self.ordinal()
                ));
            }
            sentence.dep_graph_mut().add_deprel(DepTriple::new(
                head,
                Some(arc.relation()),
                arc.dependent(),
            ));
        }
        Ok(sentence)
    }
}

impl<'a> From<&'a Token> for ConllxToken {
    fn from(token: &Token) -> Self {
        TokenBuilder::new(token.form())
            .lemma(token.lemma())
            .cpos(token.universal_pos())
            .pos(token.ptb_pos())
            .into()
    }
}

#[cfg(test)]
mod tests {
    use conllx::graph::Node;
    use conllx::token::{Token as ConllxToken, TokenBuilder};

    use crate::corpus::{ConstituencyParse, DependencyArc, GoldReader, Sentence, Token};
    use crate::io::conllx::ToConllx;

    #[test]
    fn to_conllx() {
        let corpus = GoldReader::default()
            .read(std::io::BufReader::new(
                std::fs::File::open("testdata/gold_standard.txt").unwrap(),
            ))
            .unwrap();
        let conll_sentence = corpus[0].to_conllx().unwrap();
        assert_eq!(
            conll_sentence.iter().filter_map(Node::token).count(),
            corpus[0].tokens().len()
        );
        let first = &corpus[0].tokens()[0];
        assert_eq!(
            &ConllxToken::from(
                TokenBuilder::new(first.form())
                    .lemma(first.lemma())
                    .cpos(first.universal_pos())
                    .pos(first.ptb_pos())
            ),
            conll_sentence[1].token().unwrap()
        );
        for arc in corpus[0].dependency_parse().arcs() {
            let triple = conll_sentence.dep_graph().head(arc.dependent()).unwrap();
            assert_eq!(triple.relation(), Some(arc.relation()));
            if arc.is_root() {
                assert_eq!(triple.head(), 0);
            } else {
                assert_eq!(triple.head(), arc.head());
            }
        }

        // "2 bark ROOT 2" attaches to the virtual root
        let conll_sentence = corpus[1].to_conllx().unwrap();
        let triple = conll_sentence.dep_graph().head(2).unwrap();
        assert_eq!(triple.head(), 0);
        assert_eq!(triple.relation(), Some("ROOT"));
    }

    #[test]
    fn out_of_range() {
        let tokens = vec![
            Token::new("Dogs", "dog", "NOUN", "NNS"),
            Token::new("bark", "bark", "VERB", "VBP"),
        ];
        let parse = ConstituencyParse::new("(S (NP Dogs) (VP bark))").unwrap();
        let arcs = vec![
            DependencyArc::new(1, "Dogs", "nsubj", 3),
            DependencyArc::new(2, "bark", "ROOT", 0),
        ];
        let sentence = Sentence::new(1, "Dogs bark", tokens.clone(), parse.clone(), arcs).unwrap();
        assert!(sentence.to_conllx().is_err());

        let arcs = vec![DependencyArc::new(3, "bark", "ROOT", 0)];
        let sentence = Sentence::new(1, "Dogs bark", tokens, parse, arcs).unwrap();
        assert!(sentence.to_conllx().is_err());
    }
}
