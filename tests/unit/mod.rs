//! Integration test entry point: end-to-end scenarios and the core
//! matching properties, exercised against the public crate surface
//! rather than `#[cfg(test)]` internals.

mod invariants;
mod proptest_conservation;
mod scenarios;
