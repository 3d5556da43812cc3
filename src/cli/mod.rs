//! CLI module for rag-chain
//!
//! Handles command-line argument parsing and settings overrides.

pub mod args;

pub use args::{bind_addr, Args, Verbosity};
