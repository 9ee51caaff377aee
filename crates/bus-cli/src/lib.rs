//! Command-line front end for the bulk upload converter.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
