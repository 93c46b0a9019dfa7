//! Source handling for hashindent.
//!
//! This crate stands in for a full Ruby parser. It indexes lines, tokenizes just enough of the
//! language to find hash literals and the construct each one sits in, and loads source files
//! tolerantly: a file that cannot be read is reported, not fatal.

pub mod lexer;
mod load;
pub mod scan;
pub mod source;
pub mod tree;

pub use load::{LoadedSource, SourceLoadError, load_sources};
pub use scan::scan_hashes;
pub use source::SourceFile;
pub use tree::{Braces, Enclosing, HashLiteral, PairNode, TokenRef};
