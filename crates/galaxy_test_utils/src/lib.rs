//! # Galaxy Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fixture builders for sectors, boards and games
//! - A scripted [`galaxy_core::random::RandomSource`]
//! - Determinism test harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod scripted;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
