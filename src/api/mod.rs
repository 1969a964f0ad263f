//! Provides clients for interacting with external services.
//!
//! Includes:
//! - `waqi`: Client for the WAQI air-quality feed.
//! - `directory`: Loader for the static city reference list.

mod directory;
mod waqi;

pub use directory::*;
pub use waqi::*;
