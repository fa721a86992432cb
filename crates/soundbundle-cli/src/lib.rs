//! Sound bundler CLI library.
//!
//! Command implementations behind the `soundbundle` binary.

pub mod commands;
