//! Mode selection and the call-time dispatch state machine.

mod options;
mod wrapper;

pub use options::*;
pub use wrapper::*;
