//! Shared utilities.
//!
//! Filesystem walking used when collecting artifact files, plus test doubles.

pub mod walk;

#[cfg(test)]
pub mod testutil;
