// src/terrain/mesh/mesh_data.rs

/// Tagged vertex handle. Border vertices ring the renderable extent and
/// only participate in normal accumulation; they are never submitted to
/// the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexId {
    Mesh(u32),
    Border(u32),
}

/// Renderable mesh buffers plus the shadow border geometry used to match
/// edge normals against neighboring chunks that may not exist yet.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
    /// Baked per-vertex normals. Empty when flat shaded; the renderer
    /// recomputes face normals from the duplicated vertices instead.
    pub normals: Vec<[f32; 3]>,

    border_positions: Vec<[f32; 3]>,
    border_triangles: Vec<[VertexId; 3]>,
    flat_shaded: bool,
}

impl MeshData {
    pub(crate) fn new(flat_shaded: bool) -> Self {
        MeshData {
            positions: Vec::new(),
            triangles: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            border_positions: Vec::new(),
            border_triangles: Vec::new(),
            flat_shaded,
        }
    }

    pub fn is_flat_shaded(&self) -> bool {
        self.flat_shaded
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub(crate) fn add_vertex(&mut self, id: VertexId, position: [f32; 3], uv: [f32; 2]) {
        match id {
            VertexId::Mesh(_) => {
                self.positions.push(position);
                self.uvs.push(uv);
            }
            VertexId::Border(_) => {
                self.border_positions.push(position);
            }
        }
    }

    pub(crate) fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        match (a, b, c) {
            (VertexId::Mesh(a), VertexId::Mesh(b), VertexId::Mesh(c)) => {
                self.triangles.extend_from_slice(&[a, b, c]);
            }
            _ => {
                // Any triangle touching the border ring is shadow geometry.
                self.border_triangles.push([a, b, c]);
            }
        }
    }

    /// Finish the buffers: bake smoothed normals, or expand vertices for
    /// flat shading.
    pub(crate) fn finish(&mut self) {
        if self.flat_shaded {
            self.expand_flat_shading();
        } else {
            self.bake_normals();
        }
    }

    fn position(&self, id: VertexId) -> [f32; 3] {
        match id {
            VertexId::Mesh(index) => self.positions[index as usize],
            VertexId::Border(index) => self.border_positions[index as usize],
        }
    }

    // Area-weighted vertex normals: accumulate the unnormalized cross
    // product of each triangle, border triangles included, then normalize
    // interior accumulators in one pass. Border vertices are sources only.
    fn bake_normals(&mut self) {
        let mut accumulated = vec![[0.0_f32; 3]; self.positions.len()];

        for triangle in self.triangles.chunks_exact(3) {
            let normal = triangle_normal(
                self.positions[triangle[0] as usize],
                self.positions[triangle[1] as usize],
                self.positions[triangle[2] as usize],
            );
            for &index in triangle {
                add_assign(&mut accumulated[index as usize], normal);
            }
        }

        for triangle in &self.border_triangles {
            let normal = triangle_normal(
                self.position(triangle[0]),
                self.position(triangle[1]),
                self.position(triangle[2]),
            );
            for &id in triangle {
                if let VertexId::Mesh(index) = id {
                    add_assign(&mut accumulated[index as usize], normal);
                }
            }
        }

        self.normals = accumulated.into_iter().map(normalize).collect();
    }

    // Give every triangle its own vertex triple so the renderer's face
    // normals produce hard edges. Vertex count becomes 3 * triangle count.
    fn expand_flat_shading(&mut self) {
        let mut positions = Vec::with_capacity(self.triangles.len());
        let mut uvs = Vec::with_capacity(self.triangles.len());

        for &index in &self.triangles {
            positions.push(self.positions[index as usize]);
            uvs.push(self.uvs[index as usize]);
        }

        self.triangles = (0..positions.len() as u32).collect();
        self.positions = positions;
        self.uvs = uvs;
        self.normals.clear();
    }
}

fn triangle_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        ab[1] * ac[2] - ab[2] * ac[1],
        ab[2] * ac[0] - ab[0] * ac[2],
        ab[0] * ac[1] - ab[1] * ac[0],
    ]
}

fn add_assign(target: &mut [f32; 3], value: [f32; 3]) {
    target[0] += value[0];
    target[1] += value[1];
    target[2] += value[2];
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length <= f32::EPSILON {
        return [0.0, 1.0, 0.0];
    }
    [v[0] / length, v[1] / length, v[2] / length]
}
