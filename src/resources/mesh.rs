use std::io::{BufReader, Cursor};

use cgmath::{InnerSpace, Point3, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::{bounds::Aabb, model};

/// Geometry of an OBJ file merged into one indexed triangle list.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<model::ModelVertex>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

/**
 * Parse OBJ text. Materials are ignored: both shading programs only need
 * positions and normals. Files without normals get averaged face normals.
 */
pub fn parse_obj(obj_text: &str, file_name: &str) -> anyhow::Result<MeshData> {
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));
    let (models, _materials) = tobj::load_obj_buf(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for m in &models {
        let offset = u32::try_from(vertices.len())?;
        let normals = if m.mesh.normals.len() == m.mesh.positions.len() {
            m.mesh.normals.clone()
        } else {
            log::warn!("{} ({}) has no usable normals, computing them", file_name, m.name);
            face_normals(&m.mesh.positions, &m.mesh.indices)
        };
        vertices.extend((0..m.mesh.positions.len() / 3).map(|i| model::ModelVertex {
            position: [
                m.mesh.positions[i * 3],
                m.mesh.positions[i * 3 + 1],
                m.mesh.positions[i * 3 + 2],
            ],
            normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
        }));
        indices.extend(m.mesh.indices.iter().map(|idx| idx + offset));
    }

    let bounds = Aabb::from_points(vertices.iter().map(|v| Point3::from(v.position)))
        .ok_or_else(|| anyhow::anyhow!("{} contains no vertices", file_name))?;
    Ok(MeshData {
        vertices,
        indices,
        bounds,
    })
}

/// Per-vertex average of the adjacent face normals.
pub fn face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let position = |i: u32| {
        let i = i as usize * 3;
        Vector3::new(positions[i], positions[i + 1], positions[i + 2])
    };
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); positions.len() / 3];
    for triangle in indices.chunks_exact(3) {
        let (a, b, c) = (position(triangle[0]), position(triangle[1]), position(triangle[2]));
        let normal = (b - a).cross(c - a);
        for &idx in triangle {
            sums[idx as usize] += normal;
        }
    }
    sums.into_iter()
        .flat_map(|sum| {
            let n = if sum.magnitude2() > 0.0 {
                sum.normalize()
            } else {
                sum
            };
            [n.x, n.y, n.z]
        })
        .collect()
}

pub fn upload_mesh(device: &wgpu::Device, data: &MeshData, file_name: &str) -> model::Mesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Vertex Buffer", file_name)),
        contents: bytemuck::cast_slice(&data.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Index Buffer", file_name)),
        // The indices are for positions and normals because we set `single_index` to true
        contents: bytemuck::cast_slice(&data.indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    model::Mesh {
        name: file_name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: data.indices.len() as u32,
    }
}
