//! # Galaxy Development Tools
//!
//! Command-line tools for development:
//! - Catalog validation
//! - Starting layout preview
//! - Sector generation samples

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod preview;
pub mod validate;
