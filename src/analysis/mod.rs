//! Static eligibility analysis over host function metadata.

mod eligibility;

pub use eligibility::*;

#[cfg(test)]
mod eligibility_test;
