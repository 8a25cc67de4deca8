//! Water surface simulation: wave displacement and per-face foam.

mod displacement;
mod foam;
mod mesh;
mod system;
mod worker;

// Re-export public types
pub use displacement::{compute_heights, compute_heights_into, height_at};
pub use foam::{FaceState, FoamCounter, FoamField};
pub use mesh::{MeshTopology, WaterVertex};
pub use system::{WaterFrame, WaterSystem};
pub use worker::{HeightRequest, HeightResponse, HeightWorker};
