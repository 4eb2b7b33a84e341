//! Command-line front end
//!
//! Argument parsing lives in `main.rs`; the logic it dispatches to is in
//! [commands], which is usable without clap.

pub mod commands;
