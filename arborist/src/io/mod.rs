mod conllx;
pub use crate::io::conllx::ToConllx;
mod ptb;
pub use crate::io::ptb::{PTBFormat, PTBLineFormat, PTBReader, PTBWriter};
pub(crate) use crate::io::ptb::count_pars;

use crate::tree::Tree;

use failure::Error;

/// Trait to read a `Tree` from its string representation.
pub trait ReadTree {
    fn string_to_tree(&self, string: &str) -> Result<Tree, Error>;
}

/// Trait to write a `Tree`.
pub trait WriteTree {
    fn write_tree(&mut self, tree: &Tree) -> Result<(), Error>;
}
