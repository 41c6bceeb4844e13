//! Crossway Mesh - text mesh loading
//!
//! Parses the line-oriented mesh format (`v` / `vn` / `vt` / `f` records)
//! into flat vertex attribute arrays ready for GPU upload. Vertices are
//! expanded per face corner rather than deduplicated, so the output can be
//! drawn directly without an index buffer.

mod obj;
mod types;

pub use obj::parse_mesh;
pub use types::{MeshBounds, MeshData};
