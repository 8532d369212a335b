use std::io;

#[derive(Debug, Fail)]
pub enum LoadError {
    #[fail(display = "Io error while reading corpus")]
    Io(#[cause] io::Error),
    #[fail(display = "Sentence block {} does not start with an ordinal: {:?}", block, line)]
    MalformedHeader { block: usize, line: String },
    #[fail(display = "Malformed tree in sentence block {}: {}", block, reason)]
    MalformedTree { block: usize, reason: String },
    #[fail(display = "Malformed token annotation in sentence block {}: {:?}", block, field)]
    MalformedAnnotation { block: usize, field: String },
    #[fail(display = "Malformed dependency in sentence block {}: {:?}", block, line)]
    MalformedDependency { block: usize, line: String },
    #[fail(
        display = "Sentence block {} has {} tokens but its tree has {} leaves",
        block, tokens, leaves
    )]
    TokenCountMismatch {
        block: usize,
        tokens: usize,
        leaves: usize,
    },
    #[fail(display = "Can't annotate leaves in sentence block {}: {}", block, reason)]
    LeafAnnotation { block: usize, reason: String },
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

#[derive(Debug, Fail, Clone, PartialEq)]
pub enum ScoreError {
    #[fail(display = "Tree {} has no leaves", index)]
    EmptyTree { index: usize },
    #[fail(
        display = "F-score undefined, hypothesis {} and reference {} share no brackets",
        hypothesis, reference
    )]
    DegenerateScore { hypothesis: usize, reference: usize },
}
