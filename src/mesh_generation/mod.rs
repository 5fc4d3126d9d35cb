//! Small reference meshes and structured tetrahedral boxes.

use crate::mesh::VolMesh;
use crate::mesh_error::{Result, VolMeshError};

/// Vertices of the canonical single-tetrahedron mesh.
pub const ONE_TET_VERTICES: [f64; 12] = [
    -1.0, 0.0, 0.0, //
    0.0, 0.0, -2.0, //
    1.0, 0.0, 0.0, //
    0.0, 2.0, -1.0,
];

pub const ONE_TET_ELEMENTS: [u32; 4] = [0, 1, 2, 3];

/// A single negatively wound tetrahedron: 4 nodes, 6 edges, 4 faces.
pub fn one_tet() -> Result<VolMesh> {
    VolMesh::build(&ONE_TET_VERTICES, &ONE_TET_ELEMENTS)
}

/// [`one_tet`] plus a mirrored second tetrahedron sharing face `0 1 2`,
/// wound the other way: 5 nodes, 9 edges, 7 faces, 2 cells.
pub fn two_tets() -> Result<VolMesh> {
    let mut vertices = ONE_TET_VERTICES.to_vec();
    vertices.extend_from_slice(&[0.0, -2.0, -1.0]);
    VolMesh::build(&vertices, &[0, 1, 2, 3, 0, 1, 2, 4])
}

/// Corners of the six Kuhn tetrahedra of a unit cube, as `(dx, dy, dz)`
/// offsets. All six share the `000-111` diagonal, so neighbouring cubes
/// split their common square along the same diagonal.
const KUHN_TETS: [[[usize; 3]; 4]; 6] = [
    [[0, 0, 0], [1, 0, 0], [1, 1, 0], [1, 1, 1]],
    [[0, 0, 0], [1, 0, 0], [1, 0, 1], [1, 1, 1]],
    [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 1, 1]],
    [[0, 0, 0], [0, 1, 0], [0, 1, 1], [1, 1, 1]],
    [[0, 0, 0], [0, 0, 1], [1, 0, 1], [1, 1, 1]],
    [[0, 0, 0], [0, 0, 1], [0, 1, 1], [1, 1, 1]],
];

/// Conforming tetrahedralization of an `nx`×`ny`×`nz` block of cubes with
/// edge length `spacing`, six tetrahedra per cube, origin at zero.
pub fn kuhn_box(nx: usize, ny: usize, nz: usize, spacing: f64) -> Result<VolMesh> {
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(VolMeshError::degenerate("nx, ny, and nz must be positive"));
    }
    if !(spacing > 0.0 && spacing.is_finite()) {
        return Err(VolMeshError::degenerate(format!("spacing {spacing} must be positive")));
    }

    let row_stride = nx + 1;
    let slab_stride = row_stride * (ny + 1);
    let mut vertices = Vec::with_capacity(3 * slab_stride * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                vertices.extend_from_slice(&[
                    spacing * i as f64,
                    spacing * j as f64,
                    spacing * k as f64,
                ]);
            }
        }
    }

    let vertex_id = |i: usize, j: usize, k: usize| -> Result<u32> {
        u32::try_from(k * slab_stride + j * row_stride + i)
            .map_err(|_| VolMeshError::degenerate("box has too many vertices"))
    };
    let mut elements = Vec::with_capacity(4 * 6 * nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                for tet in &KUHN_TETS {
                    for [dx, dy, dz] in tet {
                        elements.push(vertex_id(i + dx, j + dy, k + dz)?);
                    }
                }
            }
        }
    }

    VolMesh::build(&vertices, &elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_counts() {
        let mesh = one_tet().unwrap();
        assert_eq!(mesh.count_nodes(), 4);
        let mesh = two_tets().unwrap();
        assert_eq!(
            (mesh.count_nodes(), mesh.count_edges(), mesh.count_faces(), mesh.count_cells()),
            (5, 9, 7, 2)
        );
    }

    #[test]
    fn single_cube_counts() {
        let mesh = kuhn_box(1, 1, 1, 1.0).unwrap();
        assert_eq!(
            (mesh.count_nodes(), mesh.count_edges(), mesh.count_faces(), mesh.count_cells()),
            (8, 19, 18, 6)
        );
    }

    #[test]
    fn neighbouring_cubes_share_their_square() {
        let mesh = kuhn_box(2, 1, 1, 0.5).unwrap();
        assert_eq!(mesh.count_nodes(), 12);
        assert_eq!(mesh.count_cells(), 12);
        // 2 * 18 faces, minus the two triangles of the shared square
        assert_eq!(mesh.count_faces(), 34);
        // 2 * 19 edges, minus the shared square's 4 sides and diagonal
        assert_eq!(mesh.count_edges(), 33);
    }

    #[test]
    fn rejects_empty_boxes() {
        assert!(kuhn_box(0, 1, 1, 1.0).is_err());
        assert!(kuhn_box(1, 1, 1, 0.0).is_err());
    }
}
