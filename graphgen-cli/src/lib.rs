//! Support library for the `graphgen` binary.
//!
//! Exposes argument parsing, command execution and rendering so tests can
//! drive the whole pipeline without spawning a subprocess.

pub mod cli;
pub mod logging;
