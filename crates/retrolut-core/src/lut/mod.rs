//! LUT geometry and the generation pass.

pub mod geometry;
pub mod renderer;
