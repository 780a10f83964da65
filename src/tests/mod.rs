//! Cross-module test suite
//!
//! Unit tests live next to the code they cover. The suites here exercise
//! several modules together: catalog and tree, generation end to end, the
//! runner against generated programs, and the editor session workflows.

#[cfg(test)]
mod core_tests;
