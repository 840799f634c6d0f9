//! GPU-to-CPU readback of RGBA8 transient textures.

use crate::error::GpuError;
use crate::transient::TransientTexture;

/// Download `texture` as tightly packed RGBA8 texels, row-major from the top.
/// Blocks until the copy completes.
pub fn download_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &TransientTexture,
) -> Result<Vec<[u8; 4]>, GpuError> {
    let width = texture.desc.width;
    let height = texture.desc.height;
    let unpadded_row = width * 4;
    let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
        * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("retrolut_readback_staging"),
        size: padded_row as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("retrolut_readback_encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &texture.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: None,
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    staging.slice(..).map_async(wgpu::MapMode::Read, |_| {});
    device.poll(wgpu::PollType::wait_indefinitely())?;

    let data = staging.slice(..).get_mapped_range();
    let mut texels = Vec::with_capacity((width * height) as usize);
    for row in data.chunks_exact(padded_row as usize) {
        texels.extend(
            row[..unpadded_row as usize]
                .chunks_exact(4)
                .map(|px| [px[0], px[1], px[2], px[3]]),
        );
    }
    drop(data);
    staging.unmap();

    Ok(texels)
}
