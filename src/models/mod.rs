//! Defines the data structures and models used throughout the application.
//!
//! Includes the provider response schema (`waqi`), the validated reading and table rows
//! derived from it (`reading`), and the city reference list (`directory`).

mod directory;
mod reading;
mod waqi;

pub use directory::*;
pub use reading::*;
pub use waqi::*;
