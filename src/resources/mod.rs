use std::path::Path;

use anyhow::Context;

use crate::data_structures::{
    component::{MeshAsset, MeshHandle},
    model,
};

/**
 * This module contains all logic for loading meshes and textures from external files.
 */
pub mod mesh;
pub mod texture;

pub async fn load_string(asset_dir: &Path, file_name: &str) -> anyhow::Result<String> {
    let path = asset_dir.join(file_name);
    // TODO: switch to tokio::fs once loading happens off the event loop thread
    let txt = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read asset {}", path.display()))?;
    Ok(txt)
}

pub async fn load_binary(asset_dir: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_dir.join(file_name);
    let data =
        std::fs::read(&path).with_context(|| format!("cannot read asset {}", path.display()))?;
    Ok(data)
}

/// Load an OBJ file and upload it. `meshes` receives the GPU mesh; the returned
/// asset refers to it by its index.
pub async fn load_model_obj(
    asset_dir: &Path,
    file_name: &str,
    device: &wgpu::Device,
    meshes: &mut Vec<model::Mesh>,
) -> anyhow::Result<MeshAsset> {
    let obj_text = load_string(asset_dir, file_name).await?;
    let data = mesh::parse_obj(&obj_text, file_name)?;
    log::info!(
        "loaded {} ({} vertices, {} triangles)",
        file_name,
        data.vertices.len(),
        data.indices.len() / 3
    );
    meshes.push(mesh::upload_mesh(device, &data, file_name));
    Ok(MeshAsset {
        mesh: MeshHandle(meshes.len() - 1),
        bounds: data.bounds,
    })
}
