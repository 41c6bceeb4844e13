//! Scene renderer - turns the scene pool into draw calls
//!
//! Geometry is shared per kind, so the renderer walks the pool one kind at
//! a time: bind that kind's vertex buffer once, then issue one draw per
//! live entity with freshly written transform and material uniforms.
//! Wheels draw as their own batch after the vehicle bodies, using the
//! transforms derived from each vehicle's current position.

use crate::camera::Camera;
use crate::context::RenderContext;
use crate::gpu_mesh::MeshCache;
use crate::pipeline::{
    LightSettings, MaterialUniforms, ScenePipeline, TransformUniforms,
};
use crossway_core::{mat4_mul, Color, Material};
use crossway_mesh::MeshData;
use crossway_scene::{wheel_transforms, EntityKind, ScenePool};
use wgpu::util::DeviceExt;

/// Clear color behind the scene
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.09,
    b: 0.11,
    a: 1.0,
};

const WHEEL_COLOR: Color = Color::new(0.12, 0.12, 0.12, 1.0);

/// Kinds in draw order: statics first, then signals, then moving bodies
const DRAW_ORDER: [EntityKind; 5] = [
    EntityKind::Road,
    EntityKind::Building,
    EntityKind::Destination,
    EntityKind::TrafficLight,
    EntityKind::Vehicle,
];

/// Reusable per-draw GPU resources
struct DrawSlot {
    transform_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One planned draw for this frame
struct PlannedDraw {
    kind: EntityKind,
    transforms: TransformUniforms,
    material: MaterialUniforms,
}

/// Renders a ScenePool to the screen
pub struct SceneRenderer {
    pipeline: ScenePipeline,
    mesh_cache: MeshCache,
    light_settings: LightSettings,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    draw_slots: Vec<DrawSlot>,
}

impl SceneRenderer {
    pub fn new(context: &RenderContext) -> Self {
        let pipeline = ScenePipeline::new(&context.device, context.config.format);
        let light_settings = LightSettings::default();

        let light_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Light Uniform Buffer"),
                contents: bytemuck::bytes_of(&light_settings.to_uniforms()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let light_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &pipeline.light_bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: light_buffer.as_entire_binding(),
                }],
                label: Some("Light Bind Group"),
            });

        Self {
            pipeline,
            mesh_cache: MeshCache::new(),
            light_settings,
            light_buffer,
            light_bind_group,
            draw_slots: Vec::new(),
        }
    }

    /// Upload the shared mesh for one entity kind
    pub fn load_kind_mesh(&mut self, device: &wgpu::Device, kind: EntityKind, mesh: &MeshData) {
        self.mesh_cache.upload(device, kind, mesh);
    }

    pub fn mesh_cache(&self) -> &MeshCache {
        &self.mesh_cache
    }

    /// Light settings read each frame; input handling mutates these
    pub fn light_settings_mut(&mut self) -> &mut LightSettings {
        &mut self.light_settings
    }

    /// Draw the pool into `view`
    pub fn render(
        &mut self,
        context: &RenderContext,
        camera: &Camera,
        pool: &ScenePool,
        view: &wgpu::TextureView,
    ) {
        let view_proj = camera.view_projection_matrix();
        let camera_pos = camera.position_array();
        let wheel_material = Material::matte(WHEEL_COLOR);

        // Plan every draw for the frame before touching the encoder
        let mut planned: Vec<PlannedDraw> = Vec::with_capacity(pool.entity_count());
        for kind in DRAW_ORDER {
            for entity in pool.list(kind) {
                let model = entity.world_matrix();
                planned.push(PlannedDraw {
                    kind,
                    transforms: TransformUniforms::new(
                        mat4_mul(&view_proj, &model),
                        model,
                        camera_pos,
                    ),
                    material: MaterialUniforms::from_material(&entity.material),
                });
            }
        }
        for vehicle in pool.list(EntityKind::Vehicle) {
            let Some(wheels) = wheel_transforms(vehicle) else {
                continue;
            };
            for transform in wheels {
                let model = transform.to_matrix();
                planned.push(PlannedDraw {
                    kind: EntityKind::Wheel,
                    transforms: TransformUniforms::new(
                        mat4_mul(&view_proj, &model),
                        model,
                        camera_pos,
                    ),
                    material: MaterialUniforms::from_material(&wheel_material),
                });
            }
        }

        self.ensure_slots(&context.device, planned.len());

        context.queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::bytes_of(&self.light_settings.to_uniforms()),
        );
        for (slot, draw) in self.draw_slots.iter().zip(&planned) {
            context
                .queue
                .write_buffer(&slot.transform_buffer, 0, bytemuck::bytes_of(&draw.transforms));
            context
                .queue
                .write_buffer(&slot.material_buffer, 0, bytemuck::bytes_of(&draw.material));
        }

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(1, &self.light_bind_group, &[]);

            let mut bound_kind: Option<EntityKind> = None;
            for (slot, draw) in self.draw_slots.iter().zip(&planned) {
                let Some(mesh) = self.mesh_cache.get(draw.kind) else {
                    continue;
                };
                if bound_kind != Some(draw.kind) {
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    bound_kind = Some(draw.kind);
                }
                pass.set_bind_group(0, &slot.bind_group, &[]);
                pass.draw(0..mesh.vertex_count, 0..1);
            }
        }

        context.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Grow the per-draw uniform pool to at least `count` slots
    fn ensure_slots(&mut self, device: &wgpu::Device, count: usize) {
        while self.draw_slots.len() < count {
            let transform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Draw Transform Buffer"),
                size: std::mem::size_of::<TransformUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let material_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Draw Material Buffer"),
                size: std::mem::size_of::<MaterialUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &self.pipeline.draw_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: transform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: material_buffer.as_entire_binding(),
                    },
                ],
                label: Some("Draw Bind Group"),
            });
            self.draw_slots.push(DrawSlot {
                transform_buffer,
                material_buffer,
                bind_group,
            });
        }
    }
}
