//! # sreg-cli — Command-Line Interface for the Student Registry
//!
//! Provides the `sreg` binary. Registry state lives in a sealed JSON state
//! file (default `.sreg/ledger.json`); every invocation loads it, applies one
//! subcommand, and writes it back when the subcommand changed something.
//!
//! ## Subcommands
//!
//! - Setup: `deploy`, `fund`, `reject-value`.
//! - Student flow: `pay-fee`, `register`.
//! - Owner flow: `authorize`, `remove`, `transfer`, `withdraw`, `modify-owner`.
//! - Queries: `student`, `lookup`, `list`, `owner`, `balance`, `events`.

pub mod commands;
pub mod config;
pub mod store;
