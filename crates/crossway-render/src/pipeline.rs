//! Render pipeline setup

use crate::gpu_mesh::Vertex;
use bytemuck::{Pod, Zeroable};
use crossway_core::{Color, Material, Vec3};

/// Per-draw transform uniforms (bind group 0).
///
/// `mvp` and `model` are submitted separately so the fragment stage can
/// light in world space.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TransformUniforms {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
}

impl TransformUniforms {
    pub fn new(mvp: [[f32; 4]; 4], model: [[f32; 4]; 4], camera_pos: [f32; 3]) -> Self {
        Self {
            mvp,
            model,
            camera_pos: [camera_pos[0], camera_pos[1], camera_pos[2], 1.0],
        }
    }
}

/// Per-draw material uniforms (bind group 0, binding 1)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
    pub _pad: [f32; 3],
}

impl MaterialUniforms {
    pub fn from_material(material: &Material) -> Self {
        Self {
            ambient: material.ambient.to_array(),
            diffuse: material.diffuse.to_array(),
            specular: material.specular.to_array(),
            shininess: material.shininess,
            _pad: [0.0; 3],
        }
    }
}

/// Scene lighting uniforms (bind group 1)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightUniforms {
    pub direction: [f32; 4],
    pub directional_color: [f32; 4],
    pub point_position: [f32; 4],
    pub point_color: [f32; 4],
    pub ambient: [f32; 4],
}

/// CPU-side light settings, mutated by input and read each frame
#[derive(Clone, Copy, Debug)]
pub struct LightSettings {
    pub direction: Vec3,
    pub directional_color: Color,
    pub point_position: Vec3,
    pub point_color: Color,
    pub ambient: Color,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.4, 1.0, 0.3),
            directional_color: Color::new(1.0, 0.98, 0.92, 1.0),
            point_position: Vec3::new(0.0, 8.0, 0.0),
            point_color: Color::new(0.3, 0.3, 0.35, 1.0),
            ambient: Color::new(0.18, 0.18, 0.22, 1.0),
        }
    }
}

impl LightSettings {
    pub fn to_uniforms(&self) -> LightUniforms {
        let d = self.direction.normalized();
        LightUniforms {
            direction: [d.x, d.y, d.z, 0.0],
            directional_color: self.directional_color.to_array(),
            point_position: [
                self.point_position.x,
                self.point_position.y,
                self.point_position.z,
                1.0,
            ],
            point_color: self.point_color.to_array(),
            ambient: self.ambient.to_array(),
        }
    }
}

/// The scene render pipeline and its bind group layouts
pub struct ScenePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub draw_bind_group_layout: wgpu::BindGroupLayout,
    pub light_bind_group_layout: wgpu::BindGroupLayout,
}

impl ScenePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // Bind group 0: per-draw transform + material uniforms
        let draw_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
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
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
                label: Some("Draw Bind Group Layout"),
            });

        // Bind group 1: scene lights
        let light_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Light Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&draw_bind_group_layout, &light_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Hand-authored meshes don't guarantee winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            draw_bind_group_layout,
            light_bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_struct_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<TransformUniforms>(), 144);
        assert_eq!(std::mem::size_of::<MaterialUniforms>(), 64);
        assert_eq!(std::mem::size_of::<LightUniforms>(), 80);
    }

    #[test]
    fn light_direction_is_normalized_for_upload() {
        let settings = LightSettings {
            direction: Vec3::new(0.0, 10.0, 0.0),
            ..Default::default()
        };
        let uniforms = settings.to_uniforms();
        assert!((uniforms.direction[1] - 1.0).abs() < 1e-6);
    }
}
