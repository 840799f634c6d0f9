//! wgpu implementation of the command-recording seam.
//!
//! [`GpuBackend`] owns everything that outlives a frame: device, queue,
//! compiled pipelines, the transient texture pool and the global bindings.
//! [`FrameRecorder`] borrows it for one frame, records into a single
//! command encoder, and submits on [`FrameRecorder::submit`].

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec4;
use retrolut_core::render::recorder::GlobalBindings;
use retrolut_core::{CommandRecorder, DrawParameters, ShaderProgram, ShaderProperty, TextureDesc, TextureId};

use crate::error::GpuError;
use crate::pipeline::FullscreenPipeline;
use crate::transient::{TransientTexture, TransientTexturePool};

/// Long-lived GPU state shared by every frame.
pub struct GpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    /// Compiled programs by name. `None` marks a program that failed to compile.
    pipelines: HashMap<String, Option<FullscreenPipeline>>,
    textures: TransientTexturePool,
    globals: GlobalBindings,
}

impl GpuBackend {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            pipelines: HashMap::new(),
            textures: TransientTexturePool::default(),
            globals: GlobalBindings::default(),
        }
    }

    /// Request an adapter and device and block until both are ready.
    pub fn create_blocking() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            ..Default::default()
        }))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("retrolut_device"),
            required_limits: adapter.limits(),
            ..Default::default()
        }))?;

        tracing::info!("GPU backend initialized on {}", adapter.get_info().name);
        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Start recording a frame.
    pub fn begin_frame(&mut self) -> FrameRecorder<'_> {
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("retrolut_frame_encoder"),
        });
        FrameRecorder {
            backend: self,
            encoder,
        }
    }

    /// The texture currently bound to `id`, if any.
    pub fn texture(&self, id: TextureId) -> Option<&TransientTexture> {
        self.textures.get(id)
    }

    pub fn textures(&self) -> &TransientTexturePool {
        &self.textures
    }

    /// Free every released transient texture, e.g. after the pass is cleaned up.
    pub fn trim_textures(&mut self) {
        self.textures.trim();
    }

    /// Bindings published by the most recent frames.
    pub fn globals(&self) -> &GlobalBindings {
        &self.globals
    }

    /// Compile `program` on first use. Failures are logged once and cached.
    fn pipeline(&mut self, program: &ShaderProgram) -> Option<&FullscreenPipeline> {
        let device = &self.device;
        self.pipelines
            .entry(program.name.to_string())
            .or_insert_with(|| match FullscreenPipeline::compile(device, program) {
                Ok(pipeline) => Some(pipeline),
                Err(e) => {
                    tracing::error!("{e}");
                    None
                }
            })
            .as_ref()
    }
}

/// Records one frame's commands. Dropping it without [`Self::submit`]
/// abandons the frame.
pub struct FrameRecorder<'a> {
    backend: &'a mut GpuBackend,
    encoder: wgpu::CommandEncoder,
}

impl FrameRecorder<'_> {
    /// Finish the encoder and submit it.
    pub fn submit(self) -> wgpu::SubmissionIndex {
        self.backend.queue.submit(std::iter::once(self.encoder.finish()))
    }
}

impl CommandRecorder for FrameRecorder<'_> {
    fn get_temporary_texture(&mut self, id: TextureId, desc: &TextureDesc) -> bool {
        let backend = &mut *self.backend;
        let max = backend.device.limits().max_texture_dimension_2d;
        if desc.width > max || desc.height > max {
            tracing::error!(
                "{} is {}x{}, above the device limit of {max}",
                id.0,
                desc.width,
                desc.height
            );
            return false;
        }
        backend.textures.acquire(&backend.device, id, desc);
        true
    }

    fn release_temporary_texture(&mut self, id: TextureId) {
        if self.backend.textures.release(id) {
            self.backend.globals.unbind_texture(id);
        } else {
            tracing::warn!("Released {} which is not allocated", id.0);
        }
    }

    fn draw_fullscreen(&mut self, target: TextureId, program: &ShaderProgram, params: &DrawParameters) -> bool {
        let backend = &mut *self.backend;
        if !backend.textures.is_bound(target) {
            tracing::error!("Draw into {} skipped: texture is not allocated", target.0);
            return false;
        }
        // Compile before borrowing the target; both live on the backend.
        if backend.pipeline(program).is_none() {
            return false;
        }

        let (Some(Some(pipeline)), Some(texture)) = (
            backend.pipelines.get(&*program.name),
            backend.textures.get(target),
        ) else {
            return false;
        };
        pipeline.draw(&backend.queue, &mut self.encoder, &texture.view, params);
        tracing::trace!("Recorded {} into {}", program.name, target.0);
        true
    }

    fn set_global_float(&mut self, property: ShaderProperty, value: f32) {
        self.backend.globals.set_float(property, value);
    }

    fn set_global_vector(&mut self, property: ShaderProperty, value: Vec4) {
        self.backend.globals.set_vector(property, value);
    }

    fn set_global_texture(&mut self, property: ShaderProperty, texture: TextureId) {
        self.backend.globals.set_texture(property, texture);
    }
}
