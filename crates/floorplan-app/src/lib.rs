//! Floorplan command-line shell
//!
//! Headless front end over `floorplan-core`: inspect and normalize domain
//! documents without a canvas.

mod cli;

pub use cli::{AppError, Cli, Command, InspectReport, run};
