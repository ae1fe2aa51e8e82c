//! Mapping file model: parsing, path resolution and instruction generation.
//!
//! A mapping file lists one `source  target  [pattern]` entry per line.
//! Fields are separated by two or more whitespace characters or by tabs, so
//! single spaces may appear inside paths. Lines whose first non-blank
//! character is `#` are comments.
//!
//! ```text
//! # bash
//! bashrc          ~/.bashrc
//! config/*        $XDG_CONFIG_HOME
//! scripts         ~/bin           \.sh$
//! ```
//!
//! [`PathMap::load`] reads a file, [`PathMap::reversed`] flips it for
//! import, and [`PathMap::instructions`] expands it into concrete
//! [`Instruction`]s.

mod entry;
mod instruction;
mod map;
mod resolver;

pub use entry::PathMapEntry;
pub use instruction::Instruction;
pub use map::{InstructionSet, LoadedMap, PathMap};
pub use resolver::{Environment, PathResolver, SourceSpec, TargetSpec};
