//! `nodry`: command-line admin panel for the No Dry Starts backend.

pub mod cli;
pub mod commands;
pub mod output;
