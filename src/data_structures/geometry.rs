//! CPU-side mesh data and the normalization pass applied to every loaded part.
//!
//! Part meshes come out of CAD exports with their own pivot, usually without
//! texture coordinates and sometimes without an index list. Before a mesh can
//! be shaded with the clearcoat material (which needs tangent-space normal
//! mapping) it is recentered, given a fallback UV set, and gets fresh normals
//! and tangents. All of this happens on the CPU before any GPU upload, so it
//! is independent of a device and directly testable.

use cgmath::{InnerSpace, Vector2, Vector3};

/// Raw geometry of one drawable primitive as read from a glTF file.
///
/// `uvs` is `None` when the export carried no texture coordinates; `indices`
/// is `None` for unindexed triangle soups. Normals, tangents and bitangents
/// are recomputed by [`normalize`](Self::normalize) regardless of what the
/// file contained.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    pub indices: Option<Vec<u32>>,
}

impl MeshData {
    pub fn new(name: impl Into<String>, positions: Vec<[f32; 3]>) -> Self {
        let len = positions.len();
        Self {
            name: name.into(),
            positions,
            uvs: None,
            normals: vec![[0.0; 3]; len],
            tangents: vec![[0.0; 3]; len],
            bitangents: vec![[0.0; 3]; len],
            indices: None,
        }
    }

    /// Axis-aligned bounding box over the current positions, or `None` for an
    /// empty mesh.
    pub fn bounding_box(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.positions.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &self.positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some((min, max))
    }

    /// Translates all positions so the bounding-box center moves to the
    /// origin and returns the translation that was applied.
    ///
    /// The translation is relative to the current positions, so repeated
    /// application after other mutations is not idempotent in general.
    pub fn recenter(&mut self) -> Vector3<f32> {
        let Some((min, max)) = self.bounding_box() else {
            return Vector3::new(0.0, 0.0, 0.0);
        };
        let translation = Vector3::new(
            -(min[0] + max[0]) / 2.0,
            -(min[1] + max[1]) / 2.0,
            -(min[2] + max[2]) / 2.0,
        );
        for p in &mut self.positions {
            p[0] += translation.x;
            p[1] += translation.y;
            p[2] += translation.z;
        }
        translation
    }

    /// Emits a fallback UV set when the mesh carries none: a planar
    /// projection onto the X-Y plane, `((x + 0.1) / 2, (y + 0.1) / 2)`.
    ///
    /// This is no general unwrap. The offset and scale are tuned for the
    /// part exports this viewer ships with, which fit a unit-ish X/Y extent
    /// and show their relevant detail from +Z. An existing UV set is left
    /// untouched.
    pub fn synthesize_planar_uvs(&mut self) {
        if self.uvs.is_some() {
            return;
        }
        let uvs = self
            .positions
            .iter()
            .map(|p| [(p[0] + 0.1) / 2.0, (p[1] + 0.1) / 2.0])
            .collect();
        self.uvs = Some(uvs);
    }

    /// Recomputes smooth vertex normals from the current positions.
    ///
    /// Face normals are accumulated area-weighted (unnormalized cross
    /// product) per vertex and normalized at the end. Works for indexed and
    /// unindexed triangle lists.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3::new(0.0, 0.0, 0.0); self.positions.len()];
        for [a, b, c] in self.triangles() {
            let p0: Vector3<f32> = self.positions[a].into();
            let p1: Vector3<f32> = self.positions[b].into();
            let p2: Vector3<f32> = self.positions[c].into();
            let face = (p1 - p0).cross(p2 - p0);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals
            .into_iter()
            .map(|n| {
                if n.magnitude2() > 0.0 {
                    n.normalize().into()
                } else {
                    [0.0; 3]
                }
            })
            .collect();
    }

    /// Calculates per-vertex tangents and bitangents from the UV layout.
    ///
    /// Tangent generation walks indexed triangles, so a mesh without an index
    /// list only gets a warning and keeps its zeroed tangents. The part still
    /// renders, just without correct normal-map lighting.
    ///
    /// Returns whether tangents were computed.
    pub fn compute_tangents(&mut self) -> bool {
        let Some(indices) = &self.indices else {
            log::warn!(
                "mesh {:?} has no index list, skipping tangent generation",
                self.name
            );
            return false;
        };
        let Some(uvs) = &self.uvs else {
            log::warn!(
                "mesh {:?} has no texture coordinates, skipping tangent generation",
                self.name
            );
            return false;
        };

        let mut tangents = vec![Vector3::new(0.0, 0.0, 0.0); self.positions.len()];
        let mut bitangents = vec![Vector3::new(0.0, 0.0, 0.0); self.positions.len()];
        let mut triangles_included = vec![0u32; self.positions.len()];

        for c in indices.chunks_exact(3) {
            let (i0, i1, i2) = (c[0] as usize, c[1] as usize, c[2] as usize);

            let pos0: Vector3<f32> = self.positions[i0].into();
            let pos1: Vector3<f32> = self.positions[i1].into();
            let pos2: Vector3<f32> = self.positions[i2].into();

            let uv0: Vector2<f32> = uvs[i0].into();
            let uv1: Vector2<f32> = uvs[i1].into();
            let uv2: Vector2<f32> = uvs[i2].into();

            let delta_pos1 = pos1 - pos0;
            let delta_pos2 = pos2 - pos0;
            let delta_uv1 = uv1 - uv0;
            let delta_uv2 = uv2 - uv0;

            // Solving delta_pos = delta_uv.x * T + delta_uv.y * B for T and B.
            let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
            if det.abs() < f32::EPSILON {
                // Degenerate UV triangle, contributes nothing.
                continue;
            }
            let r = 1.0 / det;
            let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
            // Flipped bitangent for right-handed normal maps in the wgpu
            // texture coordinate system.
            let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

            for i in [i0, i1, i2] {
                tangents[i] += tangent;
                bitangents[i] += bitangent;
                triangles_included[i] += 1;
            }
        }

        // Average the per-triangle contributions.
        for (i, n) in triangles_included.into_iter().enumerate() {
            if n == 0 {
                continue;
            }
            let denom = 1.0 / n as f32;
            self.tangents[i] = (tangents[i] * denom).into();
            self.bitangents[i] = (bitangents[i] * denom).into();
        }
        true
    }

    /// Runs the full normalization contract in order: recenter, synthesize
    /// UVs if absent, recompute normals, compute tangents if indexed.
    pub fn normalize(&mut self) {
        self.recenter();
        self.synthesize_planar_uvs();
        self.compute_vertex_normals();
        self.compute_tangents();
    }

    /// Triangle index triples, from the index list if present, otherwise by
    /// grouping consecutive vertices. A trailing partial triple is dropped.
    fn triangles(&self) -> Vec<[usize; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
                .collect(),
            None => (0..self.positions.len() / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }

    /// Number of elements a draw call covers: indices when present, vertices
    /// otherwise.
    pub fn num_elements(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.positions.len() as u32,
        }
    }
}
