// src/terrain/mesh/tessellator.rs
use serde::{Deserialize, Serialize};

use crate::terrain::height_curve::HeightCurve;
use crate::terrain::height_map::HeightMap;
use crate::terrain::mesh::mesh_data::{MeshData, VertexId};

/// Vertical shaping applied during tessellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSettings {
    pub height_multiplier: f32,
    pub height_curve: HeightCurve,
    pub flat_shading: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        MeshSettings {
            height_multiplier: 20.0,
            height_curve: HeightCurve::linear(),
            flat_shading: false,
        }
    }
}

/// Decimation stride for a LOD index: full resolution at 0, skipping
/// `lod * 2` cells per step above that.
pub fn simplification_increment(lod: u32) -> usize {
    if lod == 0 {
        1
    } else {
        (lod * 2) as usize
    }
}

/// Tessellate a bordered height field into mesh buffers.
///
/// The field is 2 cells larger per axis than the renderable extent; the
/// outer ring becomes border vertices that feed edge normals and nothing
/// else, so lighting matches neighbors that have not been generated yet.
/// Decimation is uniform, not error-driven: the increment must divide the
/// bordered cell count evenly (validated at the configuration boundary).
pub fn generate_terrain_mesh(height_map: &HeightMap, settings: &MeshSettings, lod: u32) -> MeshData {
    // Each call works on its own copy of the curve; jobs running on pool
    // workers share no evaluation state.
    let curve = settings.height_curve.clone();

    let increment = simplification_increment(lod);
    let bordered_size = height_map.width();
    let mesh_size = bordered_size - 2 * increment;
    let mesh_size_full = bordered_size - 2;

    let top_left_x = (mesh_size_full as f32 - 1.0) / -2.0;
    let top_left_z = (mesh_size_full as f32 - 1.0) / 2.0;

    let mut mesh = MeshData::new(settings.flat_shading);

    // First pass: assign tagged indices over the sampled grid.
    let mut vertex_ids = vec![VertexId::Mesh(0); bordered_size * bordered_size];
    let mut mesh_count = 0_u32;
    let mut border_count = 0_u32;
    for y in (0..bordered_size).step_by(increment) {
        for x in (0..bordered_size).step_by(increment) {
            let on_border =
                x == 0 || y == 0 || x == bordered_size - 1 || y == bordered_size - 1;
            let id = if on_border {
                let id = VertexId::Border(border_count);
                border_count += 1;
                id
            } else {
                let id = VertexId::Mesh(mesh_count);
                mesh_count += 1;
                id
            };
            vertex_ids[y * bordered_size + x] = id;
        }
    }

    // Second pass: emit vertices and the two triangles of each cell.
    for y in (0..bordered_size).step_by(increment) {
        for x in (0..bordered_size).step_by(increment) {
            let id = vertex_ids[y * bordered_size + x];

            let percent_x = (x as f32 - increment as f32) / mesh_size as f32;
            let percent_y = (y as f32 - increment as f32) / mesh_size as f32;
            let raw_height = height_map.get(x, y).clamp(0.0, 1.0);
            let height = curve.evaluate(raw_height) * settings.height_multiplier;

            let position = [
                top_left_x + percent_x * mesh_size_full as f32,
                height,
                top_left_z - percent_y * mesh_size_full as f32,
            ];
            mesh.add_vertex(id, position, [percent_x, percent_y]);

            if x < bordered_size - 1 && y < bordered_size - 1 {
                let a = vertex_ids[y * bordered_size + x];
                let b = vertex_ids[y * bordered_size + x + increment];
                let c = vertex_ids[(y + increment) * bordered_size + x];
                let d = vertex_ids[(y + increment) * bordered_size + x + increment];
                mesh.add_triangle(a, d, c);
                mesh.add_triangle(d, a, b);
            }
        }
    }

    mesh.finish();
    mesh
}
