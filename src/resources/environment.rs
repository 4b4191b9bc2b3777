//! HDR environment map loading and preparation.
//!
//! The previews light their materials from a single equirectangular radiance
//! panorama. The decoded linear-float image is uploaded twice: at full
//! resolution for mirror-sharp reflections, and box-downsampled for rough
//! reflections and the diffuse-ish ambient term. One environment exists per
//! view session and is shared read-only by all of its materials.

use anyhow::Context as _;
use image::ImageFormat;

use crate::data_structures::texture::Texture;

/// A decoded equirectangular panorama, linear RGBA, one `[f32; 4]` per texel.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    pub pixels: Vec<[f32; 4]>,
    pub width: u32,
    pub height: u32,
}

impl EnvironmentMap {
    /// Decodes a radiance (`.hdr`) file.
    pub fn from_hdr_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Hdr)
            .context("failed to decode radiance HDR image")?;
        let rgba = img.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| p.0).collect();
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Halves the resolution with a 2x2 box filter.
    pub fn halved(&self) -> Self {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let mut acc = [0.0f32; 4];
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let sx = (x * 2 + dx).min(self.width - 1);
                    let sy = (y * 2 + dy).min(self.height - 1);
                    let p = self.pixels[(sy * self.width + sx) as usize];
                    for c in 0..4 {
                        acc[c] += p[c];
                    }
                }
                pixels.push([acc[0] / 4.0, acc[1] / 4.0, acc[2] / 4.0, acc[3] / 4.0]);
            }
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Repeatedly halves until the width drops to `max_width` or below.
    pub fn downsampled_to(&self, max_width: u32) -> Self {
        let mut current = self.clone();
        while current.width > max_width && current.width > 1 {
            current = current.halved();
        }
        current
    }
}

/// Fetches and decodes the panorama.
pub async fn load_environment(file_name: &str) -> anyhow::Result<EnvironmentMap> {
    let bytes = super::load_binary(file_name).await?;
    EnvironmentMap::from_hdr_bytes(&bytes)
}

/// Width of the blurred copy used for rough reflections.
const BLURRED_WIDTH: u32 = 64;

/// The per-session GPU environment: full resolution plus a blurred copy.
#[derive(Debug)]
pub struct EnvironmentResources {
    pub sharp: Texture,
    pub blurred: Texture,
}

impl EnvironmentResources {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, map: &EnvironmentMap) -> Self {
        let sharp = Texture::from_environment(device, queue, map, "environment");
        let blurred = Texture::from_environment(
            device,
            queue,
            &map.downsampled_to(BLURRED_WIDTH),
            "environment_blurred",
        );
        Self { sharp, blurred }
    }
}
