//! GPU mesh and model types plus the draw trait used by the render pass.

use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::data_structures::geometry::MeshData;

/// Anything with a vertex buffer layout the pipelines can consume.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// The per-vertex data stored in GPU memory.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// One uploaded primitive: vertex buffer, optional index buffer, draw count.
///
/// `index_buffer` stays `None` for unindexed exports; those are drawn with a
/// plain vertex-range draw instead of an indexed one.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: Option<wgpu::Buffer>,
    pub num_elements: u32,
}

/// A loaded part: the meshes of its glTF scene.
#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

impl Model {
    /// Uploads normalized CPU meshes to the GPU.
    pub fn from_mesh_data(device: &wgpu::Device, meshes: &[MeshData]) -> Self {
        let meshes = meshes
            .iter()
            .map(|data| {
                let vertices = to_vertices(data);
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Vertex Buffer", data.name)),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = data.indices.as_ref().map(|indices| {
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("{:?} Index Buffer", data.name)),
                        contents: bytemuck::cast_slice(indices),
                        usage: wgpu::BufferUsages::INDEX,
                    })
                });
                Mesh {
                    name: data.name.clone(),
                    vertex_buffer,
                    index_buffer,
                    num_elements: data.num_elements(),
                }
            })
            .collect();
        Self { meshes }
    }
}

fn to_vertices(data: &MeshData) -> Vec<ModelVertex> {
    let fallback_uvs;
    let uvs = match &data.uvs {
        Some(uvs) => uvs,
        None => {
            fallback_uvs = vec![[0.0; 2]; data.positions.len()];
            &fallback_uvs
        }
    };
    (0..data.positions.len())
        .map(|i| ModelVertex {
            position: data.positions[i],
            tex_coords: uvs[i],
            normal: data.normals[i],
            tangent: data.tangents[i],
            bitangent: data.bitangents[i],
        })
        .collect()
}

/// Issues the draw calls for a model with the material/camera/light bind
/// groups the physical pipeline expects.
pub trait DrawModel<'a> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'a Mesh,
        instances: Range<u32>,
        material: &'a wgpu::BindGroup,
        camera: &'a wgpu::BindGroup,
        light: &'a wgpu::BindGroup,
    );
    fn draw_model_instanced(
        &mut self,
        model: &'a Model,
        instances: Range<u32>,
        material: &'a wgpu::BindGroup,
        camera: &'a wgpu::BindGroup,
        light: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'b Mesh,
        instances: Range<u32>,
        material: &'b wgpu::BindGroup,
        camera: &'b wgpu::BindGroup,
        light: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_bind_group(0, material, &[]);
        self.set_bind_group(1, camera, &[]);
        self.set_bind_group(2, light, &[]);
        match &mesh.index_buffer {
            Some(index_buffer) => {
                self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                self.draw_indexed(0..mesh.num_elements, 0, instances);
            }
            None => self.draw(0..mesh.num_elements, instances),
        }
    }

    fn draw_model_instanced(
        &mut self,
        model: &'b Model,
        instances: Range<u32>,
        material: &'b wgpu::BindGroup,
        camera: &'b wgpu::BindGroup,
        light: &'b wgpu::BindGroup,
    ) {
        for mesh in &model.meshes {
            self.draw_mesh_instanced(mesh, instances.clone(), material, camera, light);
        }
    }
}
