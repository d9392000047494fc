//! # ecdiff
//!
//! Differential-testing oracle for the alt_bn128 precompiles. Every command
//! decodes a hex input, runs the precompile and prints a single JSON line
//! that a harness compares against other implementations.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod cli;
pub mod cmd;
pub mod decode;
pub mod output;
