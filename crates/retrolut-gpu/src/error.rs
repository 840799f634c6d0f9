//! Errors raised while setting up or reading back from the GPU.

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("shader program {name} failed to compile: {message}")]
    ShaderCompile { name: String, message: String },
    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
}
