use std::path::Path;

use anyhow::Context as _;

use crate::{data_structures::texture::Texture, resources::load_binary};

/// Load the six skybox faces and upload them as one cube map.
pub async fn load_cube_map(
    asset_dir: &Path,
    faces: &[String; 6],
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let files =
        futures::future::try_join_all(faces.iter().map(|face| load_binary(asset_dir, face)))
            .await?;
    let images = faces
        .iter()
        .zip(files)
        .map(|(face, bytes)| {
            image::load_from_memory(&bytes)
                .with_context(|| format!("cannot decode skybox face {}", face))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let images: [image::DynamicImage; 6] = images
        .try_into()
        .map_err(|_| anyhow::anyhow!("a cube map needs exactly six faces"))?;
    Texture::create_cube_map(device, queue, &images, "skybox")
}
