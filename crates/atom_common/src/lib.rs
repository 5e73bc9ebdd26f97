//! Shared foundational types for the atom netlist.
//!
//! This crate provides the string interner used for every block, port, and net
//! name, and the three-valued logic symbols that make up block truth tables.

#![warn(missing_docs)]

pub mod ident;
pub mod logic;

pub use ident::{Interner, StringId};
pub use logic::{LogicValue, TruthTable};
