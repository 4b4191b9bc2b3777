//! Loading of part meshes and the HDR environment from external files.
//!
//! Natively, assets are read from the `assets/` directory next to the
//! binary; on the web they are fetched relative to the page origin. Both
//! paths go through [`load_binary`].

use std::io::{BufReader, Cursor};

use crate::data_structures::geometry::MeshData;

pub mod environment;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> reqwest::Url {
    let window = web_sys::window().unwrap();
    let location = window.location();
    let origin = location.origin().unwrap();
    let base = reqwest::Url::parse(&format!("{}/assets/", origin)).unwrap();
    base.join(file_name).unwrap()
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name);
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(path)?
    };

    Ok(data)
}

/// Fetches a glTF-binary part and returns its primitives as normalized CPU
/// meshes, ready for GPU upload.
///
/// Every primitive runs the full normalization pass (recenter, fallback UVs,
/// normals, tangents). A file without any mesh primitives yields an empty
/// vector; the caller treats that as a no-op.
pub async fn load_part_glb(file_name: &str) -> anyhow::Result<Vec<MeshData>> {
    let glb = load_binary(file_name).await?;
    let glb_cursor = Cursor::new(glb);
    let glb_reader = BufReader::new(glb_cursor);
    let gltf = gltf::Gltf::from_reader(glb_reader)?;

    // Load buffers
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                if let Some(blob) = gltf.blob.as_deref() {
                    buffer_data.push(blob.to_vec());
                };
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri).await?;
                buffer_data.push(bin);
            }
        }
    }

    let mut meshes = Vec::new();
    for mesh in gltf.meshes() {
        let name = mesh.name().unwrap_or("unknown_mesh");
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffer_data[buffer.index()]));

            let Some(positions) = reader.read_positions() else {
                log::warn!("primitive in {file_name:?} has no positions, skipping");
                continue;
            };
            let mut data = MeshData::new(name, positions.collect());

            if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
                data.uvs = Some(tex_coords.collect());
            }
            if let Some(indices) = reader.read_indices() {
                data.indices = Some(indices.into_u32().collect());
            }

            data.normalize();
            meshes.push(data);
        }
    }
    if meshes.is_empty() {
        log::warn!("{file_name:?} contains no drawable meshes");
    }

    Ok(meshes)
}
