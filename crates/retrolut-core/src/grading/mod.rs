//! Grading settings and the volume stack that resolves them.

pub mod curve;
pub mod settings;
pub mod volume;
