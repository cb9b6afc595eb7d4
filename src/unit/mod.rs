//! Compilation-unit extraction.
//!
//! A unit is the self-contained description of one function: everything the
//! backend needs to generate code without consulting the host again. Index
//! spaces (constants, names) are frozen at extraction time; globals and
//! closure cells stay live handles into host storage.

mod extract;

pub use extract::*;
