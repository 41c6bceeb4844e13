//! GPU mesh cache - uploads parsed meshes to vertex buffers
//!
//! Meshes arrive pre-expanded (one vertex per face corner), so there is no
//! index buffer: each kind is a single flat vertex buffer drawn with
//! `draw(0..vertex_count)`.

use bytemuck::{Pod, Zeroable};
use crossway_mesh::MeshData;
use crossway_scene::EntityKind;
use std::collections::HashMap;
use wgpu::util::DeviceExt;

/// A vertex with position, normal, color, and UV coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
        3 => Float32x2,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A single GPU-resident mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

/// Flatten parsed mesh data into interleaved vertices
pub fn interleave(mesh: &MeshData) -> Vec<Vertex> {
    (0..mesh.vertex_count())
        .map(|i| Vertex {
            position: mesh.positions[i],
            normal: mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            color: mesh.colors.get(i).copied().unwrap_or([1.0, 1.0, 1.0, 1.0]),
            uv: mesh.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        })
        .collect()
}

/// Per-kind GPU meshes, uploaded once at startup
#[derive(Default)]
pub struct MeshCache {
    meshes: HashMap<EntityKind, GpuMesh>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload a parsed mesh as the shared geometry for one entity kind
    pub fn upload(&mut self, device: &wgpu::Device, kind: EntityKind, mesh: &MeshData) {
        let vertices = interleave(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", kind)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.meshes.insert(
            kind,
            GpuMesh {
                vertex_buffer,
                vertex_count: vertices.len() as u32,
            },
        );
    }

    pub fn get(&self, kind: EntityKind) -> Option<&GpuMesh> {
        self.meshes.get(&kind)
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        self.meshes.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_keeps_one_entry_per_corner() {
        let mesh = MeshData {
            positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            colors: vec![[0.5, 0.5, 0.5, 1.0]; 3],
            uvs: vec![[0.0, 0.0]; 3],
        };
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].color, [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn interleave_defaults_missing_attributes() {
        let mesh = MeshData {
            positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![],
            colors: vec![],
            uvs: vec![],
        };
        let vertices = interleave(&mesh);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[0].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn vertex_stride_matches_attribute_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), (3 + 3 + 4 + 2) * 4);
    }
}
