//! Gold-standard corpus.
//!
//! Sentences of the gold standard carry tokens with part-of-speech annotations, a constituency
//! tree and a dependency parse.

mod reader;
pub use self::reader::{read_corpus, GoldReader};

mod sentence;
pub use self::sentence::{ConstituencyParse, DependencyArc, DependencyParse, Sentence, Token};
