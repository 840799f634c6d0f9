//! Error type for the LUT pass.

#[derive(Debug, thiserror::Error)]
pub enum LutError {
    /// A shader program the pass depends on could not be found.
    #[error("missing shader resource: {name}")]
    MissingResource { name: String },
    /// LUT edge size outside `2..=MAX_LUT_SIZE`.
    #[error("invalid LUT edge size {edge_size}, expected 2..={max}", max = crate::lut::geometry::MAX_LUT_SIZE)]
    InvalidGeometry { edge_size: u32 },
    #[error("failed to parse volume profile: {0}")]
    Profile(#[from] serde_json::Error),
}
