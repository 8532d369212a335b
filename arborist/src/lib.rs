#[macro_use]
extern crate failure;

#[macro_use]
extern crate pest_derive;

pub mod corpus;
pub use corpus::{read_corpus, GoldReader, Sentence};

pub mod errors;
pub use errors::{LoadError, ScoreError};

pub mod eval;
pub use eval::{score, score_matrix, ParseScore, ScoreConfig, ScoreMatrix};

pub mod io;
pub use io::{PTBReader, PTBWriter, WriteTree};

pub mod parser;
pub use parser::Parse;

mod tree;
pub use tree::Tree;

mod node;
pub use node::{Node, NonTerminal, Terminal};

mod span;
pub use span::Span;

mod tree_modification;
pub use tree_modification::TreeOps;

pub mod util;
