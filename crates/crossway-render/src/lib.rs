//! Crossway Render - wgpu renderer for the reconciled scene
//!
//! Draws the scene pool with a small lit pipeline: flat vertex colors
//! modulated by a per-entity Phong material, one directional light plus a
//! movable point light. Each entity kind shares one GPU mesh; the renderer
//! binds it once per kind and issues one draw per live entity.

mod camera;
mod context;
mod gpu_mesh;
mod pipeline;
mod primitives;
mod scene_renderer;

pub use camera::Camera;
pub use context::{ContextError, RenderContext};
pub use gpu_mesh::{GpuMesh, MeshCache, Vertex};
pub use pipeline::{LightSettings, LightUniforms, MaterialUniforms, ScenePipeline, TransformUniforms};
pub use primitives::create_box_mesh;
pub use scene_renderer::SceneRenderer;

#[cfg(test)]
mod tests {
    #[test]
    fn shader_wgsl_parses() {
        let source = include_str!("shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("shader.wgsl failed to parse");
    }
}
