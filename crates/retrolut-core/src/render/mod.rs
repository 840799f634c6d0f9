//! Rendering seam: shader properties, draw parameters and the command recorder.

pub mod draw;
pub mod property;
pub mod recorder;
