//! Domain logic: AQI severity classification and the table builders feeding the charts.

mod severity;
mod tables;

pub use severity::*;
pub use tables::*;
