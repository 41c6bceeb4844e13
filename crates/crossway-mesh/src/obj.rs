//! OBJ-subset parser
//!
//! Two passes over the source: the first collects raw positions, normals,
//! and texture coordinates; the second expands each face record into one
//! output vertex per corner. Indices in the source are 1-based.
//!
//! The parser is best-effort: a malformed line or a corner referencing an
//! out-of-range position index drops that line with a warning, never the
//! whole file. Faces must arrive pre-triangulated; records with more than
//! three corners are skipped.

use crate::types::MeshData;
use crossway_core::{CrosswayError, Result};

/// Default normal used when a corner has no usable normal reference
const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Parse mesh source text into expanded vertex arrays.
///
/// `default_color` is assigned to every emitted vertex; callers pick white
/// or a muted gray depending on the model.
pub fn parse_mesh(source: &str, default_color: [f32; 4]) -> Result<MeshData> {
    let mut raw_positions: Vec<[f32; 3]> = Vec::new();
    let mut raw_normals: Vec<[f32; 3]> = Vec::new();
    let mut raw_uvs: Vec<[f32; 2]> = Vec::new();

    // Pass 1: raw attribute records
    for (line_no, line) in source.lines().enumerate() {
        let tokens: Vec<&str> = line.trim().split_whitespace().collect();
        match tokens.first().copied() {
            Some("v") => match parse_floats::<3>(&tokens[1..]) {
                Some(v) => raw_positions.push(v),
                None => eprintln!("mesh: bad vertex on line {}, skipped", line_no + 1),
            },
            Some("vn") => match parse_floats::<3>(&tokens[1..]) {
                Some(n) => raw_normals.push(n),
                None => eprintln!("mesh: bad normal on line {}, skipped", line_no + 1),
            },
            Some("vt") => match parse_floats::<2>(&tokens[1..]) {
                Some(t) => raw_uvs.push(t),
                None => eprintln!("mesh: bad texcoord on line {}, skipped", line_no + 1),
            },
            _ => {}
        }
    }

    let mut mesh = MeshData::default();

    // Pass 2: expand face corners
    for (line_no, line) in source.lines().enumerate() {
        let tokens: Vec<&str> = line.trim().split_whitespace().collect();
        if tokens.first().copied() != Some("f") {
            continue;
        }

        let corners = &tokens[1..];
        if corners.len() < 3 {
            eprintln!("mesh: face with {} corners on line {}, skipped", corners.len(), line_no + 1);
            continue;
        }
        if corners.len() > 3 {
            // Input must be pre-triangulated; no fan triangulation here.
            eprintln!(
                "mesh: face with {} corners on line {} not triangulated, skipped",
                corners.len(),
                line_no + 1
            );
            continue;
        }

        let Some(parsed) = parse_face(corners, raw_positions.len()) else {
            eprintln!("mesh: unusable face on line {}, skipped", line_no + 1);
            continue;
        };

        for corner in parsed {
            mesh.positions.push(raw_positions[corner.position]);
            mesh.normals.push(
                corner
                    .normal
                    .and_then(|i| raw_normals.get(i).copied())
                    .unwrap_or(DEFAULT_NORMAL),
            );
            mesh.uvs.push(
                corner
                    .uv
                    .and_then(|i| raw_uvs.get(i).copied())
                    .unwrap_or([0.0, 0.0]),
            );
            mesh.colors.push(default_color);
        }
    }

    if mesh.positions.is_empty() {
        return Err(CrosswayError::MeshParseError(
            "source produced no triangles".to_string(),
        ));
    }

    // Length invariant: every position has a color, whatever pass 2 did.
    while mesh.colors.len() < mesh.positions.len() {
        mesh.colors.push(default_color);
    }

    Ok(mesh)
}

struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

/// Parse the three corner tokens of a face, converting 1-based indices to
/// 0-based. Returns None if any corner's position reference is missing or
/// out of range - faces are all-or-nothing so the output arrays stay in
/// groups of three.
fn parse_face(corners: &[&str], position_count: usize) -> Option<[Corner; 3]> {
    let mut out: Vec<Corner> = Vec::with_capacity(3);
    for token in corners {
        let mut refs = token.split('/');
        let position = parse_index(refs.next())?;
        if position >= position_count {
            return None;
        }
        let uv = parse_index(refs.next());
        let normal = parse_index(refs.next());
        out.push(Corner { position, uv, normal });
    }
    out.try_into().ok()
}

/// Parse a single 1-based index reference; empty or malformed yields None
fn parse_index(token: Option<&str>) -> Option<usize> {
    let raw: usize = token?.parse().ok()?;
    raw.checked_sub(1)
}

/// Parse exactly N float tokens
fn parse_floats<const N: usize>(tokens: &[&str]) -> Option<[f32; N]> {
    if tokens.len() < N {
        return None;
    }
    let mut out = [0.0f32; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = token.parse().ok()?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// A unit cube: 8 positions, 6 quad faces pre-triangulated into 12
    /// triangles referencing positions only (no normals or texcoords).
    fn cube_source() -> String {
        let mut src = String::new();
        for p in [
            "v 0 0 0", "v 1 0 0", "v 1 1 0", "v 0 1 0", "v 0 0 1", "v 1 0 1", "v 1 1 1", "v 0 1 1",
        ] {
            src.push_str(p);
            src.push('\n');
        }
        for f in [
            "f 1 2 3", "f 1 3 4", // back
            "f 5 7 6", "f 5 8 7", // front
            "f 1 5 6", "f 1 6 2", // bottom
            "f 4 3 7", "f 4 7 8", // top
            "f 1 4 8", "f 1 8 5", // left
            "f 2 6 7", "f 2 7 3", // right
        ] {
            src.push_str(f);
            src.push('\n');
        }
        src
    }

    #[test]
    fn cube_expands_to_36_vertices() {
        let mesh = parse_mesh(&cube_source(), WHITE).unwrap();
        assert_eq!(mesh.positions.len(), 36);
        assert_eq!(mesh.normals.len(), 36);
        assert_eq!(mesh.colors.len(), 36);
        assert_eq!(mesh.uvs.len(), 36);
    }

    #[test]
    fn missing_normals_default_to_up() {
        let mesh = parse_mesh(&cube_source(), WHITE).unwrap();
        assert!(mesh.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn full_corner_references_resolve() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";
        let mesh = parse_mesh(src, WHITE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.uvs[1], [1.0, 0.0]);
        assert_eq!(mesh.uvs[2], [0.0, 1.0]);
    }

    #[test]
    fn malformed_line_skips_only_that_line() {
        let src = "\
v 0 0 0
v oops 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        // The bad vertex is dropped, so indices 2/3 refer to the later
        // vertices and the face still resolves.
        let mesh = parse_mesh(src, WHITE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.positions[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn out_of_range_face_is_dropped_whole() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 9
f 1 2 3
";
        let mesh = parse_mesh(src, WHITE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn quad_face_is_skipped_not_triangulated() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
f 1 2 3
";
        let mesh = parse_mesh(src, WHITE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn out_of_range_normal_falls_back_to_default() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
f 1//1 2//1 3//9
";
        let mesh = parse_mesh(src, WHITE).unwrap();
        assert_eq!(mesh.normals[0], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.normals[2], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn color_length_always_matches_positions() {
        let gray = [0.4, 0.4, 0.4, 1.0];
        let mesh = parse_mesh(&cube_source(), gray).unwrap();
        assert_eq!(mesh.colors.len(), mesh.positions.len());
        assert!(mesh.colors.iter().all(|c| *c == gray));
    }

    #[test]
    fn empty_source_is_an_error() {
        assert!(parse_mesh("# nothing here\n", WHITE).is_err());
    }

    #[test]
    fn bounds_cover_the_cube() {
        let mesh = parse_mesh(&cube_source(), WHITE).unwrap();
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 1.0, 1.0]);
        assert_eq!(bounds.size(), [1.0, 1.0, 1.0]);
    }
}
