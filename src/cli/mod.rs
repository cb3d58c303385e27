//! CLI command handlers

pub mod commands;

pub use commands::{companions, export, load_schedule, parse, sheets, show};
