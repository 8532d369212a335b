use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::{debug, info};

use crate::corpus::{ConstituencyParse, DependencyArc, Sentence, Token};
use crate::errors::LoadError;
use crate::io::count_pars;

/// Reader for gold-standard corpora.
///
/// A corpus consists of sentence blocks, each block is a run of lines:
///
/// 1. `<ordinal>. <text>`
/// 2. tab-separated token annotations `form\lemma\upos\ptb`
/// 3. a bracketed constituency tree, possibly spanning multiple lines
/// 4. tab-separated dependency arcs `dependent form relation head`
///
/// A new block starts at every line that starts with an ordinal. Loading is all-or-nothing,
/// the first malformed block fails the whole corpus.
pub struct GoldReader {
    ordinal: Regex,
}

impl Default for GoldReader {
    fn default() -> Self {
        GoldReader::new()
    }
}

impl GoldReader {
    pub fn new() -> Self {
        let ordinal = Regex::new(r"^(\d+)\.\s").unwrap();
        GoldReader { ordinal }
    }

    /// Read all sentences from `read`.
    pub fn read<R>(&self, read: R) -> Result<Vec<Sentence>, LoadError>
    where
        R: BufRead,
    {
        let lines = read.lines().collect::<Result<Vec<_>, _>>()?;
        self.parse_lines(&lines)
    }

    /// Read all sentences from a string.
    pub fn parse_str(&self, corpus: &str) -> Result<Vec<Sentence>, LoadError> {
        let lines = corpus.lines().collect::<Vec<_>>();
        self.parse_lines(&lines)
    }

    fn parse_lines<S>(&self, lines: &[S]) -> Result<Vec<Sentence>, LoadError>
    where
        S: AsRef<str>,
    {
        let blocks = self.split_blocks(lines);
        debug!("Found {} sentence blocks", blocks.len());
        blocks
            .into_iter()
            .enumerate()
            .map(|(idx, block)| self.parse_block(idx + 1, block))
            .collect()
    }

    // Blank lines before the first block are skipped, afterwards every line belongs to a block.
    fn split_blocks<'a, S>(&self, lines: &'a [S]) -> Vec<&'a [S]>
    where
        S: AsRef<str>,
    {
        let mut blocks = Vec::new();
        let mut start = None;
        for (idx, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            match start {
                None if line.trim().is_empty() => continue,
                None => start = Some(idx),
                Some(begin) => {
                    if self.ordinal.is_match(line) {
                        blocks.push(&lines[begin..idx]);
                        start = Some(idx);
                    }
                }
            }
        }
        if let Some(begin) = start {
            blocks.push(&lines[begin..]);
        }
        blocks
    }

    fn parse_block<S>(&self, block: usize, lines: &[S]) -> Result<Sentence, LoadError>
    where
        S: AsRef<str>,
    {
        let header = lines[0].as_ref();
        let (ordinal, text) = self.parse_header(block, header)?;

        let annotations = lines
            .get(1)
            .map(AsRef::as_ref)
            .ok_or_else(|| LoadError::MalformedAnnotation {
                block,
                field: String::new(),
            })?;
        let tokens = parse_annotations(block, annotations)?;

        let tree_end = tree_end(block, lines)?;
        let bracketed = lines[2..tree_end]
            .iter()
            .map(AsRef::as_ref)
            .collect::<String>();
        let constituency_parse =
            ConstituencyParse::new(bracketed).map_err(|err| LoadError::MalformedTree {
                block,
                reason: err.to_string(),
            })?;
        let leaves = constituency_parse.tree().n_terminals();
        if leaves != tokens.len() {
            return Err(LoadError::TokenCountMismatch {
                block,
                tokens: tokens.len(),
                leaves,
            });
        }

        let arcs = lines[tree_end..]
            .iter()
            .map(AsRef::as_ref)
            .filter(|line| !line.trim().is_empty())
            .map(|line| parse_dependency(block, line))
            .collect::<Result<Vec<_>, _>>()?;

        Sentence::new(ordinal, text, tokens, constituency_parse, arcs).map_err(|err| {
            LoadError::LeafAnnotation {
                block,
                reason: err.to_string(),
            }
        })
    }

    fn parse_header<'a>(&self, block: usize, header: &'a str) -> Result<(usize, &'a str), LoadError> {
        let malformed = || LoadError::MalformedHeader {
            block,
            line: header.to_owned(),
        };
        let captures = self.ordinal.captures(header).ok_or_else(malformed)?;
        let ordinal = captures[1].parse::<usize>().map_err(|_| malformed())?;
        Ok((ordinal, &header[captures[0].len()..]))
    }
}

/// Read a gold-standard corpus from the file at `path`.
pub fn read_corpus(path: impl AsRef<Path>) -> Result<Vec<Sentence>, LoadError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let sentences = GoldReader::new().read(reader)?;
    info!("Loaded {} sentences from {}", sentences.len(), path.display());
    Ok(sentences)
}

fn parse_annotations(block: usize, line: &str) -> Result<Vec<Token>, LoadError> {
    line.split('\t')
        .map(|field| {
            let parts = field.split('\\').collect::<Vec<_>>();
            if parts.len() != 4 {
                return Err(LoadError::MalformedAnnotation {
                    block,
                    field: field.to_owned(),
                });
            }
            // the corpus tags are read from the last field for both tag sets
            Ok(Token::new(parts[0], parts[1], parts[3], parts[3]))
        })
        .collect()
}

// Returns the exclusive end of the tree lines, trees start on the third line of a block and
// end on the line that balances all parentheses.
fn tree_end<S>(block: usize, lines: &[S]) -> Result<usize, LoadError>
where
    S: AsRef<str>,
{
    let mut open = 0;
    for (idx, line) in lines.iter().enumerate().skip(2) {
        open += count_pars(line.as_ref());
        if open < 0 {
            return Err(LoadError::MalformedTree {
                block,
                reason: format!("Closing parenthesis without opening one: {:?}", line.as_ref()),
            });
        }
        if open == 0 {
            return Ok(idx + 1);
        }
    }

    if lines.len() <= 2 {
        Err(LoadError::MalformedTree {
            block,
            reason: "Missing tree.".to_owned(),
        })
    } else {
        Err(LoadError::MalformedTree {
            block,
            reason: format!("{} unclosed parentheses at end of block.", open),
        })
    }
}

fn parse_dependency(block: usize, line: &str) -> Result<DependencyArc, LoadError> {
    let malformed = || LoadError::MalformedDependency {
        block,
        line: line.to_owned(),
    };
    let fields = line.split('\t').collect::<Vec<_>>();
    if fields.len() != 4 {
        return Err(malformed());
    }
    let dependent = fields[0].trim().parse::<usize>().map_err(|_| malformed())?;
    let head = fields[3].trim().parse::<usize>().map_err(|_| malformed())?;
    Ok(DependencyArc::new(dependent, fields[1], fields[2], head))
}
