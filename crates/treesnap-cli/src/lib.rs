//! Command-line interface for treesnap.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
