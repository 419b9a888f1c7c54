//! Command-line front end for the feature viewer.

pub mod cli;
pub mod commands;
pub mod logging;
