//! Procedural mesh primitives
//!
//! Static entity kinds (roads, buildings, destinations, traffic lights)
//! render as colored boxes; only vehicles and wheels use authored meshes.
//! Output matches the mesh loader's expanded layout: 36 vertices, no
//! index buffer, per-face normals.

use crossway_mesh::MeshData;

/// Create a box mesh centered on the origin with the given dimensions.
///
/// Emits 12 triangles as 36 expanded vertices so the result can share the
/// flat-vertex-buffer draw path with loaded meshes.
pub fn create_box_mesh(width: f32, height: f32, depth: f32, color: [f32; 4]) -> MeshData {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let hd = depth / 2.0;

    // Four corners + outward normal per face
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // back (-z)
        (
            [0.0, 0.0, -1.0],
            [[-hw, -hh, -hd], [hw, -hh, -hd], [hw, hh, -hd], [-hw, hh, -hd]],
        ),
        // front (+z)
        (
            [0.0, 0.0, 1.0],
            [[hw, -hh, hd], [-hw, -hh, hd], [-hw, hh, hd], [hw, hh, hd]],
        ),
        // left (-x)
        (
            [-1.0, 0.0, 0.0],
            [[-hw, -hh, hd], [-hw, -hh, -hd], [-hw, hh, -hd], [-hw, hh, hd]],
        ),
        // right (+x)
        (
            [1.0, 0.0, 0.0],
            [[hw, -hh, -hd], [hw, -hh, hd], [hw, hh, hd], [hw, hh, -hd]],
        ),
        // bottom (-y)
        (
            [0.0, -1.0, 0.0],
            [[-hw, -hh, hd], [hw, -hh, hd], [hw, -hh, -hd], [-hw, -hh, -hd]],
        ),
        // top (+y)
        (
            [0.0, 1.0, 0.0],
            [[-hw, hh, -hd], [hw, hh, -hd], [hw, hh, hd], [-hw, hh, hd]],
        ),
    ];

    let mut mesh = MeshData::default();
    for (normal, corners) in faces {
        for idx in [0, 1, 2, 0, 2, 3] {
            mesh.positions.push(corners[idx]);
            mesh.normals.push(normal);
            mesh.colors.push(color);
            mesh.uvs.push([0.0, 0.0]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_mesh_is_fully_expanded() {
        let mesh = create_box_mesh(1.0, 2.0, 3.0, [1.0; 4]);
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.normals.len(), 36);
        assert_eq!(mesh.colors.len(), 36);
    }

    #[test]
    fn box_mesh_bounds_match_dimensions() {
        let mesh = create_box_mesh(1.0, 2.0, 3.0, [1.0; 4]);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.size(), [1.0, 2.0, 3.0]);
        assert_eq!(bounds.min, [-0.5, -1.0, -1.5]);
    }

    #[test]
    fn box_normals_are_axis_aligned_units() {
        let mesh = create_box_mesh(1.0, 1.0, 1.0, [1.0; 4]);
        for n in &mesh.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-6);
            assert_eq!(n.iter().filter(|c| c.abs() > 0.5).count(), 1);
        }
    }
}
