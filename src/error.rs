//! Crate-level error type for build-time and I/O failures. Per-ray numerical
//! corner cases (TIR, degenerate triangles, zero pdfs) are never propagated
//! here — they are handled locally by the component that hits them and
//! never produce a `Result`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scene has no surfaces to build a BVH from")]
    EmptyScene,

    #[error("BVH tree depth exceeded the {max} node limit while splitting {remaining} surfaces")]
    BvhDepthExceeded { max: u32, remaining: usize },

    #[error("malformed scene description: {0}")]
    Parse(String),
}
