//! Per-tetrahedron measures and whole-mesh quality statistics.

use super::{EPS, cross, dot, lerp, norm, sub};

/// Orientation determinant `(b - a) · ((c - a) × (d - a))`.
///
/// Six times the signed volume. The builder picks the positive local masks
/// when this is `>= 0`.
#[inline]
pub fn orientation_determinant(a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]) -> f64 {
    dot(sub(b, a), cross(sub(c, a), sub(d, a)))
}

/// Signed volume of the tetrahedron `abcd`.
#[inline]
pub fn signed_volume(a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]) -> f64 {
    orientation_determinant(a, b, c, d) / 6.0
}

/// Longest over shortest edge length of a tetrahedron.
///
/// Returns `f64::INFINITY` when two vertices coincide.
pub fn tet_aspect_ratio(p: &[[f64; 3]; 4]) -> f64 {
    let mut shortest = f64::INFINITY;
    let mut longest = 0.0_f64;
    for i in 0..4 {
        for j in (i + 1)..4 {
            let len = norm(sub(p[j], p[i]));
            shortest = shortest.min(len);
            longest = longest.max(len);
        }
    }
    if shortest <= EPS {
        f64::INFINITY
    } else {
        longest / shortest
    }
}

/// Euclidean distance from `p` to the closed segment `ab`.
pub fn point_segment_distance(p: [f64; 3], a: [f64; 3], b: [f64; 3]) -> f64 {
    let ab = sub(b, a);
    let len2 = dot(ab, ab);
    if len2 <= EPS * EPS {
        return norm(sub(p, a));
    }
    let t = (dot(sub(p, a), ab) / len2).clamp(0.0, 1.0);
    norm(sub(p, lerp(a, b, t)))
}

/// Quality summary over every cell and edge of a mesh.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshStats {
    pub cells: usize,
    pub edges: usize,
    /// Smallest unsigned cell volume.
    pub volume_min: f64,
    pub volume_max: f64,
    pub volume_total: f64,
    pub edge_len_min: f64,
    pub edge_len_max: f64,
    /// Best (smallest) longest/shortest edge ratio over all cells.
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
}

impl Default for MeshStats {
    fn default() -> Self {
        Self {
            cells: 0,
            edges: 0,
            volume_min: f64::INFINITY,
            volume_max: 0.0,
            volume_total: 0.0,
            edge_len_min: f64::INFINITY,
            edge_len_max: 0.0,
            min_aspect_ratio: f64::INFINITY,
            max_aspect_ratio: 0.0,
        }
    }
}

impl MeshStats {
    pub(crate) fn add_cell(&mut self, p: &[[f64; 3]; 4]) {
        let vol = signed_volume(p[0], p[1], p[2], p[3]).abs();
        let aspect = tet_aspect_ratio(p);
        self.cells += 1;
        self.volume_min = self.volume_min.min(vol);
        self.volume_max = self.volume_max.max(vol);
        self.volume_total += vol;
        self.min_aspect_ratio = self.min_aspect_ratio.min(aspect);
        self.max_aspect_ratio = self.max_aspect_ratio.max(aspect);
    }

    pub(crate) fn add_edge(&mut self, len: f64) {
        self.edges += 1;
        self.edge_len_min = self.edge_len_min.min(len);
        self.edge_len_max = self.edge_len_max.max(len);
    }

    /// Mean unsigned cell volume, `0` without cells.
    pub fn volume_mean(&self) -> f64 {
        if self.cells == 0 {
            0.0
        } else {
            self.volume_total / self.cells as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: [[f64; 3]; 4] = [
        [-1.0, 0.0, 0.0],
        [0.0, 0.0, -2.0],
        [1.0, 0.0, 0.0],
        [0.0, 2.0, -1.0],
    ];

    #[test]
    fn fixture_is_negatively_wound() {
        let [a, b, c, d] = FIXTURE;
        assert_eq!(orientation_determinant(a, b, c, d), -8.0);
        assert!((signed_volume(a, b, c, d) + 8.0 / 6.0).abs() < 1e-12);
        // swapping two vertices flips the sign
        assert_eq!(orientation_determinant(b, a, c, d), 8.0);
    }

    #[test]
    fn unit_right_tet_aspect() {
        let p = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        assert!((tet_aspect_ratio(&p) - 2f64.sqrt()).abs() < 1e-12);
        let collapsed = [p[0], p[0], p[2], p[3]];
        assert!(tet_aspect_ratio(&collapsed).is_infinite());
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = [0.0, 0.0, 0.0];
        let b = [2.0, 0.0, 0.0];
        assert_eq!(point_segment_distance([1.0, 3.0, 0.0], a, b), 3.0);
        assert_eq!(point_segment_distance([-3.0, 0.0, 4.0], a, b), 5.0);
        assert_eq!(point_segment_distance([5.0, 0.0, 0.0], a, b), 3.0);
        assert_eq!(point_segment_distance([0.0, 1.0, 0.0], a, a), 1.0);
    }

    #[test]
    fn stats_accumulate_extremes() {
        let mut stats = MeshStats::default();
        stats.add_cell(&FIXTURE);
        stats.add_edge(1.0);
        stats.add_edge(3.0);
        assert_eq!(stats.cells, 1);
        assert_eq!(stats.edges, 2);
        assert!((stats.volume_min - 8.0 / 6.0).abs() < 1e-12);
        assert_eq!(stats.volume_min, stats.volume_max);
        assert_eq!((stats.edge_len_min, stats.edge_len_max), (1.0, 3.0));
        assert!((stats.volume_mean() - 8.0 / 6.0).abs() < 1e-12);
    }
}
