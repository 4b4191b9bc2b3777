//! Clearcoat material parameters and the procedural flake normal map.
//!
//! Every part is shaded with the same physically-based material model:
//! metallic base color, roughness, a clearcoat lobe, environment reflections
//! and a tiling "metal flake" normal map that gives the surfaces their
//! car-paint sparkle. The flake map is generated procedurally from a seeded
//! RNG, so it is deterministic and cheap to test.

use rand::{Rng, SeedableRng, rngs::StdRng};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    resources::environment::EnvironmentResources,
};

/// Tone-mapping exposure applied in the shader (ACES filmic).
pub const TONEMAP_EXPOSURE: f32 = 1.25;

/// How often the flake normal map tiles across the UV unit square.
pub const FLAKE_REPEAT: f32 = 10.0;

/// Pixel size of the generated flake normal map.
pub const FLAKE_MAP_SIZE: u32 = 512;

/// Flake count matching the look the previews were tuned for.
const FLAKE_COUNT: usize = 4000;

/// Material constants for one part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    pub base_color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub normal_scale: f32,
    pub env_intensity: f32,
    /// Render back faces too. Needed for thin shell exports like the spring.
    pub double_sided: bool,
}

impl MaterialParams {
    /// The shared clearcoat baseline; only color and sidedness vary per part.
    pub fn clearcoat(base_color: [f32; 3]) -> Self {
        Self {
            base_color,
            roughness: 0.1,
            metalness: 1.0,
            clearcoat: 1.0,
            clearcoat_roughness: 0.1,
            normal_scale: 0.005,
            env_intensity: 1.5,
            double_sided: false,
        }
    }

    pub fn with_double_side(mut self) -> Self {
        self.double_sided = true;
        self
    }

    fn to_uniform(self) -> MaterialUniform {
        MaterialUniform {
            base_color: [
                self.base_color[0],
                self.base_color[1],
                self.base_color[2],
                1.0,
            ],
            roughness: self.roughness,
            metalness: self.metalness,
            clearcoat: self.clearcoat,
            clearcoat_roughness: self.clearcoat_roughness,
            normal_scale: [self.normal_scale, self.normal_scale],
            env_intensity: self.env_intensity,
            exposure: TONEMAP_EXPOSURE,
            normal_repeat: [FLAKE_REPEAT, FLAKE_REPEAT],
            _padding: [0.0; 2],
        }
    }
}

/// The raw material data as uploaded to the GPU. Field order matches the
/// WGSL struct in `pipelines/physical.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniform {
    base_color: [f32; 4],
    roughness: f32,
    metalness: f32,
    clearcoat: f32,
    clearcoat_roughness: f32,
    normal_scale: [f32; 2],
    env_intensity: f32,
    exposure: f32,
    normal_repeat: [f32; 2],
    _padding: [f32; 2],
}

/// Generates the flake normal map as tightly packed RGBA8 rows.
///
/// The map starts as the neutral normal color (127, 127, 255) and gets
/// `FLAKE_COUNT` filled discs of radius 3..6 px, each tinted by a random
/// normal leaning towards +Z. Same seed, same map.
pub fn flakes_normal_map(width: u32, height: u32, seed: u64) -> Vec<u8> {
    let (w, h) = (width as usize, height as usize);
    let mut data = vec![0u8; w * h * 4];
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&[127, 127, 255, 255]);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..FLAKE_COUNT {
        let cx = rng.r#gen::<f32>() * width as f32;
        let cy = rng.r#gen::<f32>() * height as f32;
        let r = rng.r#gen::<f32>() * 3.0 + 3.0;

        let nx = rng.r#gen::<f32>() * 2.0 - 1.0;
        let ny = rng.r#gen::<f32>() * 2.0 - 1.0;
        let nz = 1.5;
        let len = (nx * nx + ny * ny + nz * nz).sqrt();
        let color = [
            (nx / len * 127.0 + 127.0) as u8,
            (ny / len * 127.0 + 127.0) as u8,
            (nz / len * 255.0).min(255.0) as u8,
            255,
        ];

        let x0 = (cx - r).floor().max(0.0) as usize;
        let x1 = ((cx + r).ceil() as usize).min(w.saturating_sub(1));
        let y0 = (cy - r).floor().max(0.0) as usize;
        let y1 = ((cy + r).ceil() as usize).min(h.saturating_sub(1));
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    data[(y * w + x) * 4..(y * w + x) * 4 + 4].copy_from_slice(&color);
                }
            }
        }
    }
    data
}

/// The bind group layout shared by every material: uniform, flake map with
/// sampler, and the two environment textures (read via `textureLoad`, hence
/// non-filterable and without samplers).
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                },
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}

/// A material instance with its GPU resources, shared by all meshes of one
/// part.
#[derive(Debug)]
pub struct MaterialResources {
    pub params: MaterialParams,
    #[allow(unused)]
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl MaterialResources {
    pub fn new(
        device: &wgpu::Device,
        params: MaterialParams,
        flakes: &Texture,
        environment: &EnvironmentResources,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Buffer"),
            contents: bytemuck::cast_slice(&[params.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let sampler = flakes
            .sampler
            .as_ref()
            .expect("flake texture carries a sampler");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&flakes.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&environment.sharp.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::TextureView(&environment.blurred.view),
                },
            ],
            label: Some("material_bind_group"),
        });
        Self {
            params,
            buffer,
            bind_group,
        }
    }
}
