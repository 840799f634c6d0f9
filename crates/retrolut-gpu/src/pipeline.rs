//! Render pipeline for full-screen LUT builder draws.

use std::num::NonZeroU64;

use retrolut_core::grading::curve::CURVE_PRECISION;
use retrolut_core::{DrawParameters, ShaderProgram, ShaderProperty};

use crate::error::GpuError;
use crate::uniforms::LutBuilderUniforms;

/// Format of every target the builder renders into.
pub const LUT_TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A compiled builder program with its uniform buffer and curve textures.
///
/// Curve textures are `CURVE_PRECISION x 1` `R32Float` and are rewritten on
/// every draw; the shader interpolates them with `textureLoad`, so no
/// float-filtering feature is required.
pub struct FullscreenPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    curve_textures: [wgpu::Texture; 8],
}

impl FullscreenPipeline {
    /// Compile `program`. Validation errors are returned instead of panicking.
    pub fn compile(device: &wgpu::Device, program: &ShaderProgram) -> Result<Self, GpuError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = Self::create(device, program);
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(GpuError::ShaderCompile {
                name: program.name.to_string(),
                message: error.to_string(),
            });
        }
        tracing::debug!("Compiled pipeline for {}", program.name);
        Ok(pipeline)
    }

    fn create(device: &wgpu::Device, program: &ShaderProgram) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program.name.as_ref()),
            source: wgpu::ShaderSource::Wgsl(program.source.clone()),
        });

        let mut entries = vec![
            // binding 0: builder uniforms
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<LutBuilderUniforms>() as u64,
                    ),
                },
                count: None,
            },
        ];
        // bindings 1-8: curve textures
        entries.extend((1..=8).map(curve_texture_layout_entry));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("retrolut_lut_builder_layout"),
            entries: &entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("retrolut_lut_builder_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("retrolut_lut_builder_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: LUT_TARGET_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("retrolut_lut_builder_uniforms"),
            size: std::mem::size_of::<LutBuilderUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let curve_textures: [wgpu::Texture; 8] =
            std::array::from_fn(|i| create_curve_texture(device, ShaderProperty::CURVES[i]));
        let curve_views: Vec<wgpu::TextureView> = curve_textures
            .iter()
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
            .collect();

        let mut bind_entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }];
        bind_entries.extend(curve_views.iter().enumerate().map(|(i, view)| {
            wgpu::BindGroupEntry {
                binding: i as u32 + 1,
                resource: wgpu::BindingResource::TextureView(view),
            }
        }));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("retrolut_lut_builder_bind_group"),
            layout: &bind_group_layout,
            entries: &bind_entries,
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            curve_textures,
        }
    }

    /// Upload `params` and record a full-screen draw into `target`.
    pub fn draw(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        params: &DrawParameters,
    ) {
        let uniforms = LutBuilderUniforms::from_params(params);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        for (texture, property) in self.curve_textures.iter().zip(ShaderProperty::CURVES) {
            match params.curve(property) {
                Some(curve) if curve.len() == CURVE_PRECISION => {
                    write_curve_texture(queue, texture, curve.samples());
                }
                Some(curve) => tracing::warn!(
                    "{property}: expected {CURVE_PRECISION} samples, got {}; keeping previous contents",
                    curve.len()
                ),
                None => tracing::warn!("{property} not set; keeping previous contents"),
            }
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("retrolut_lut_builder_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn curve_texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn curve_extent() -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: CURVE_PRECISION as u32,
        height: 1,
        depth_or_array_layers: 1,
    }
}

fn create_curve_texture(device: &wgpu::Device, property: ShaderProperty) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(property.name()),
        size: curve_extent(),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R32Float,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn write_curve_texture(queue: &wgpu::Queue, texture: &wgpu::Texture, samples: &[f32]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        bytemuck::cast_slice(samples),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(samples.len() as u32 * 4),
            rows_per_image: None,
        },
        curve_extent(),
    );
}
