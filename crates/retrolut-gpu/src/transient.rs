//! Frame-scoped render targets with allocation reuse.
//!
//! A texture is bound to a [`TextureId`] between `acquire` and `release`.
//! Released textures go to a free list keyed by [`TextureDesc`] and are
//! handed out again to the next matching request, so a pass that allocates
//! the same target every frame only creates it once.

use std::collections::HashMap;

use retrolut_core::render::recorder::{FilterMode, TextureFormat};
use retrolut_core::{TextureDesc, TextureId};

/// A temporary 2D render target and the sampler downstream passes use for it.
pub struct TransientTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub desc: TextureDesc,
}

impl TransientTexture {
    fn new(device: &wgpu::Device, id: TextureId, desc: &TextureDesc) -> Self {
        let label = id.0.name();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: desc.sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: to_wgpu_format(desc.format),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let filter = match desc.filter {
            FilterMode::Bilinear => wgpu::FilterMode::Linear,
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            desc: *desc,
        }
    }
}

pub(crate) fn to_wgpu_format(format: TextureFormat) -> wgpu::TextureFormat {
    match format {
        TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
    }
}

/// Pool of transient textures.
#[derive(Default)]
pub struct TransientTexturePool {
    bound: HashMap<TextureId, TransientTexture>,
    free: HashMap<TextureDesc, Vec<TransientTexture>>,
}

impl TransientTexturePool {
    /// Bind a texture matching `desc` to `id`, reusing a released one if possible.
    ///
    /// Acquiring an id that is already bound releases the old texture first.
    pub fn acquire(&mut self, device: &wgpu::Device, id: TextureId, desc: &TextureDesc) -> &TransientTexture {
        self.release(id);

        let texture = match self.free.get_mut(desc).and_then(Vec::pop) {
            Some(texture) => texture,
            None => {
                tracing::debug!("Allocating {} {}x{}", id.0, desc.width, desc.height);
                TransientTexture::new(device, id, desc)
            }
        };
        self.bound.insert(id, texture);
        &self.bound[&id]
    }

    /// Unbind `id` and return its texture to the free list. Returns whether it was bound.
    pub fn release(&mut self, id: TextureId) -> bool {
        match self.bound.remove(&id) {
            Some(texture) => {
                self.free.entry(texture.desc).or_default().push(texture);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: TextureId) -> Option<&TransientTexture> {
        self.bound.get(&id)
    }

    pub fn is_bound(&self, id: TextureId) -> bool {
        self.bound.contains_key(&id)
    }

    /// Number of released textures waiting for reuse.
    pub fn free_count(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }

    /// Drop every released texture.
    pub fn trim(&mut self) {
        self.free.clear();
    }
}
