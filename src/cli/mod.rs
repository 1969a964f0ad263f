//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes the command definitions and application driver, the interactive prompts,
//! the session state of the dashboard, and its rendering (status panel and charts).

mod charts;
mod commands;
mod prompts;
mod render;
mod session;

pub use charts::*;
pub use commands::*;
pub use render::*;
pub use session::*;
