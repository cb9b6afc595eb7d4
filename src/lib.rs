//! Fallback-safe JIT bridge for a bytecode-interpreted host.
//!
//! The crate sits between a host interpreter's function-definition facility
//! and a native code-generation backend: it decides which functions are
//! eligible for compilation, extracts a self-contained compilation unit from
//! them, and substitutes a dispatching wrapper that lazily drives the backend
//! and falls back to the original callable on every failure path.

pub mod backend;
pub mod func;
pub mod isa;
pub mod ns;
pub mod val;

// Static eligibility analysis over host function metadata
pub mod analysis;

// Compilation-unit extraction
pub mod unit;

// Mode selection and the call-time dispatch state machine
pub mod dispatch;
