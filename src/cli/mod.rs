//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the logic for one subcommand and returns an exit
//! code.

mod compare;
mod extract;
mod matching;

pub use compare::{CompareFormat, run_compare};
pub use extract::run_extract;
pub use matching::{MatchPaths, run_match};
